use anyhow::{Context, Result};
use minigolf_scorecard::args::{self, Command, Settings};
use minigolf_scorecard::geo::StaticGeolocator;
use minigolf_scorecard::model::{MetaData, Permissions, UuidIds};
use minigolf_scorecard::repl::{self, Repl};
use minigolf_scorecard::script;
use minigolf_scorecard::view::{render_game, render_history};
use minigolf_scorecard::{DraftSession, GameStore};
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::args_checks();
    let settings = args::load_settings(&cli).context("load settings")?;
    init_tracing(&settings);

    let store = GameStore::new(Box::new(UuidIds), Arc::new(DefaultClock))
        .auto_advance(settings.auto_advance);

    match cli.command {
        Command::Replay { script: path, json } => {
            let steps = script::load_script(&path)
                .with_context(|| format!("load script {}", path.display()))?;
            let mut store = store;
            let report = script::replay(
                &mut store,
                steps,
                &settings.default_name,
                settings.default_holes,
            );
            let snapshot = store.snapshot();
            if json {
                let text = serde_json::to_string_pretty(&*snapshot).context("encode snapshot")?;
                println!("{text}");
            } else {
                match snapshot.current_game.as_ref() {
                    Some(game) => println!("{}", render_game(game)),
                    None => print!("{}", render_history(&snapshot)),
                }
                println!("{} steps applied, {} skipped", report.applied, report.skipped);
            }
        }
        Command::Repl => {
            let session = DraftSession::new(
                Arc::new(StaticGeolocator::new(settings.position)),
                MetaData {
                    permissions: Permissions {
                        geolocation: settings.permission,
                    },
                },
            );
            repl::run_repl(Repl::new(store, session, settings)).await?;
        }
    }
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = match settings.log_filter.as_deref() {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
