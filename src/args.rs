use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::model::{Location, PermissionState, MAX_HOLES};

pub const DEFAULT_GAME_NAME: &str = "New game";

#[derive(Parser, Debug)]
#[command(author, version, about = "Minigolf scorecard: replay scripted rounds or keep score interactively")]
pub struct Cli {
    /// Optional TOML file; flags given here win over its values
    #[arg(long = "config", value_name = "TOML")]
    pub config_toml: Option<PathBuf>,
    /// tracing filter directive, e.g. `info` or `minigolf_scorecard=debug`
    #[arg(long)]
    pub log_filter: Option<String>,
    /// Move the cursor to the next hole after finishing one
    #[arg(long)]
    pub auto_advance: Option<bool>,
    /// Geolocation permission: granted, prompt or denied
    #[arg(long)]
    pub location_permission: Option<PermissionState>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a JSON replay script and print the result
    Replay {
        #[arg(long)]
        script: PathBuf,
        /// Print the final snapshot as JSON instead of standings
        #[arg(long)]
        json: bool,
    },
    /// Keep score from an interactive prompt
    Repl,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub auto_advance: Option<bool>,
    pub log_filter: Option<String>,
    pub game: Option<GameSection>,
    pub location: Option<LocationSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameSection {
    pub default_name: Option<String>,
    pub default_holes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationSection {
    pub permission: Option<PermissionState>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub auto_advance: bool,
    /// `None` defers to `RUST_LOG`.
    pub log_filter: Option<String>,
    pub default_name: String,
    pub default_holes: u32,
    pub permission: PermissionState,
    pub position: Option<Location>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            log_filter: None,
            default_name: DEFAULT_GAME_NAME.to_string(),
            default_holes: 1,
            permission: PermissionState::Prompt,
            position: None,
        }
    }
}

pub fn args_checks() -> Cli {
    Cli::parse()
}

/// Merges flags, the optional config file and defaults, in that order of precedence.
///
/// # Errors
///
/// Returns `AppError::Io` when the file cannot be read and `AppError::Config`
/// when it does not parse or holds an incomplete or out-of-range position.
pub fn load_settings(cli: &Cli) -> Result<Settings, AppError> {
    let file_config = match cli.config_toml.as_deref() {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };
    merge(cli, file_config)
}

/// # Errors
///
/// Returns `AppError::Io` or `AppError::Config` for unreadable or malformed files.
pub fn read_file_config(path: &Path) -> Result<FileConfig, AppError> {
    let contents = fs::read_to_string(path)?;
    toml::from_str::<FileConfig>(&contents)
        .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
}

fn merge(cli: &Cli, file_config: FileConfig) -> Result<Settings, AppError> {
    let defaults = Settings::default();
    let game = file_config.game.unwrap_or_default();
    let location = file_config.location.unwrap_or_default();

    let position = match (location.latitude, location.longitude) {
        (Some(latitude), Some(longitude)) => Some(checked_location(latitude, longitude)?),
        (None, None) => None,
        _ => {
            return Err(AppError::Config(
                "location needs both latitude and longitude".into(),
            ));
        }
    };

    Ok(Settings {
        auto_advance: cli
            .auto_advance
            .or(file_config.auto_advance)
            .unwrap_or(defaults.auto_advance),
        log_filter: cli.log_filter.clone().or(file_config.log_filter),
        default_name: game.default_name.unwrap_or(defaults.default_name),
        default_holes: game
            .default_holes
            .unwrap_or(defaults.default_holes)
            .clamp(1, MAX_HOLES),
        permission: cli
            .location_permission
            .or(location.permission)
            .unwrap_or(defaults.permission),
        position,
    })
}

fn checked_location(latitude: f64, longitude: f64) -> Result<Location, AppError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::Config(format!("latitude {latitude} out of range")));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::Config(format!("longitude {longitude} out of range")));
    }
    Ok(Location {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("minigolf").chain(args.iter().copied()))
    }

    #[test]
    fn flags_win_over_file() {
        let cli = cli(&["--auto-advance", "false", "--location-permission", "denied", "repl"]);
        let file: FileConfig = toml::from_str(
            "auto_advance = true\n[location]\npermission = \"granted\"\n",
        )
        .unwrap();
        let settings = merge(&cli, file).unwrap();
        assert!(!settings.auto_advance);
        assert_eq!(settings.permission, PermissionState::Denied);
    }

    #[test]
    fn half_a_position_is_rejected() {
        let cli = cli(&["repl"]);
        let file: FileConfig = toml::from_str("[location]\nlatitude = 60.1\n").unwrap();
        assert!(matches!(merge(&cli, file), Err(AppError::Config(_))));
    }

    #[test]
    fn zero_default_holes_becomes_one() {
        let cli = cli(&["repl"]);
        let file: FileConfig = toml::from_str("[game]\ndefault_holes = 0\n").unwrap();
        assert_eq!(merge(&cli, file).unwrap().default_holes, 1);
    }
}
