//! JSON replay scripts: a list of steps that address holes by ordinal and
//! players by name, resolved against the live game when each step runs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::AppError;
use crate::model::{Direction, Game, HoleId, Location, NewGame, Player, PlayerId, MAX_HOLES};
use crate::mvu::{GameStore, Msg};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    NewGame {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        holes: Option<u32>,
        players: Vec<String>,
        #[serde(default)]
        location: Option<Location>,
    },
    Score {
        hole: u32,
        player: String,
        direction: Direction,
    },
    ToggleHole {
        hole: u32,
    },
    Focus {
        hole: u32,
    },
    FinishGame,
}

/// What a replay did, step by step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub skipped: usize,
}

/// # Errors
///
/// Returns `AppError::Parse` when the text is not a JSON array of steps.
pub fn parse_script(text: &str) -> Result<Vec<Step>, AppError> {
    Ok(serde_json::from_str(text)?)
}

/// # Errors
///
/// Returns `AppError::Io` or `AppError::Parse` for unreadable or malformed scripts.
pub fn load_script(path: &Path) -> Result<Vec<Step>, AppError> {
    let text = fs::read_to_string(path)?;
    parse_script(&text)
}

/// Runs every step against the store. Steps whose hole or player does not
/// resolve are skipped, matching the store's own no-op policy.
pub fn replay(
    store: &mut GameStore,
    steps: Vec<Step>,
    default_name: &str,
    default_holes: u32,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (index, step) in steps.into_iter().enumerate() {
        match to_msg(store, step, default_name, default_holes) {
            Ok(msg) => {
                store.run(msg);
                report.applied += 1;
            }
            Err(reason) => {
                warn!(step = index, %reason, "replay step skipped");
                report.skipped += 1;
            }
        }
    }
    report
}

fn to_msg(
    store: &GameStore,
    step: Step,
    default_name: &str,
    default_holes: u32,
) -> Result<Msg, AppError> {
    match step {
        Step::NewGame {
            name,
            holes,
            players,
            location,
        } => {
            let ids = store.ids();
            Ok(Msg::CreateGame(NewGame {
                id: ids.game_id(),
                name: name.unwrap_or_else(|| default_name.to_string()),
                holes: holes.unwrap_or(default_holes).min(MAX_HOLES),
                players: players
                    .into_iter()
                    .map(|name| Player::new(ids.player_id(), name))
                    .collect(),
                location,
            }))
        }
        Step::Score {
            hole,
            player,
            direction,
        } => {
            let game = running(store)?;
            Ok(Msg::AdjustScore {
                direction,
                hole_id: hole_id(game, hole)?,
                player_id: player_id(game, &player)?,
            })
        }
        Step::ToggleHole { hole } => Ok(Msg::ToggleHoleFinished(hole_id(running(store)?, hole)?)),
        Step::Focus { hole } => Ok(Msg::FocusHole(hole_id(running(store)?, hole)?)),
        Step::FinishGame => Ok(Msg::FinishGame),
    }
}

fn running(store: &GameStore) -> Result<&Game, AppError> {
    store
        .current_game()
        .ok_or_else(|| AppError::Script("no game running".into()))
}

pub(crate) fn hole_id(game: &Game, ordinal: u32) -> Result<HoleId, AppError> {
    game.hole_by_ordinal(ordinal)
        .map(|h| h.id.clone())
        .ok_or_else(|| AppError::Script(format!("no hole {ordinal}")))
}

pub(crate) fn player_id(game: &Game, name: &str) -> Result<PlayerId, AppError> {
    game.player_by_name(name)
        .map(|p| p.id.clone())
        .ok_or_else(|| AppError::Script(format!("no player named `{name}`")))
}
