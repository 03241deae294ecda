use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{GameId, HoleId, PlayerId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub total_score: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total_score: 0,
        }
    }
}

/// One player's score on a single hole.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerScore {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hole {
    pub id: HoleId,
    pub hole: u32,
    pub scores: Vec<PlayerScore>,
    pub is_active: bool,
}

impl Hole {
    #[must_use]
    pub fn score_of(&self, player_id: &PlayerId) -> Option<u32> {
        self.scores
            .iter()
            .find(|s| &s.id == player_id)
            .map(|s| s.score)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub players: Vec<Player>,
    pub holes: u32,
    pub hole_list: Vec<Hole>,
    pub current_hole: HoleId,
    pub location: Option<Location>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Everything the view renders from: the live game and the archive.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_game: Option<Game>,
    pub history: Vec<Game>,
}

/// Input for starting a game, typically produced by submitting a draft.
#[derive(Clone, Debug, PartialEq)]
pub struct NewGame {
    pub id: GameId,
    pub name: String,
    pub holes: u32,
    pub players: Vec<Player>,
    pub location: Option<Location>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    #[default]
    Prompt,
    Denied,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionState::Granted => "granted",
            PermissionState::Prompt => "prompt",
            PermissionState::Denied => "denied",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PermissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(PermissionState::Granted),
            "prompt" => Ok(PermissionState::Prompt),
            "denied" => Ok(PermissionState::Denied),
            other => Err(format!("unknown permission state `{other}`")),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Permissions {
    pub geolocation: PermissionState,
}

/// Session-level facts the view uses to enable or disable controls.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetaData {
    pub permissions: Permissions,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(alias = "increment")]
    Inc,
    #[serde(alias = "decrement")]
    Dec,
}
