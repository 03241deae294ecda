use tracing::{debug, warn};

use crate::geo::GeoError;
use crate::model::{
    GameId, IdSource, Location, NewGame, PermissionState, Player, PlayerId, MAX_HOLES,
};

/// The new-game form before it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDraft {
    pub id: GameId,
    pub name: String,
    /// `None` while the holes field is empty.
    pub holes: Option<u32>,
    pub players: Vec<Player>,
    pub location: Option<Location>,
    pub location_pending: bool,
}

impl GameDraft {
    /// A fresh form with one blank player.
    pub fn new(name: impl Into<String>, holes: u32, ids: &dyn IdSource) -> Self {
        Self {
            id: ids.game_id(),
            name: name.into(),
            holes: Some(holes.clamp(1, MAX_HOLES)),
            players: vec![Player::new(ids.player_id(), "")],
            location: None,
            location_pending: false,
        }
    }

    /// Turns the form into store input. An empty or zero holes field becomes one hole.
    #[must_use]
    pub fn submit(self) -> NewGame {
        NewGame {
            id: self.id,
            name: self.name,
            holes: self.holes.unwrap_or(0).max(1),
            players: self.players,
            location: self.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftMsg {
    SetName(String),
    /// Raw text of the holes field.
    SetHoles(String),
    /// The holes field lost focus.
    CommitHoles,
    AddPlayer,
    RenamePlayer { id: PlayerId, name: String },
    RemovePlayer(PlayerId),
    ToggleLocation,
    LocationResolved(Result<Location, GeoError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEffect {
    RequestLocation,
    /// Record that the user turned the location prompt down.
    PermissionDenied,
}

pub fn update(
    draft: GameDraft,
    msg: DraftMsg,
    permission: PermissionState,
    ids: &dyn IdSource,
) -> (GameDraft, Vec<DraftEffect>) {
    match msg {
        DraftMsg::SetName(name) => (GameDraft { name, ..draft }, vec![]),
        DraftMsg::SetHoles(text) => {
            let holes = parse_holes_input(&text).unwrap_or(draft.holes);
            (GameDraft { holes, ..draft }, vec![])
        }
        DraftMsg::CommitHoles => {
            let holes = match draft.holes {
                None | Some(0) => Some(1),
                some => some,
            };
            (GameDraft { holes, ..draft }, vec![])
        }
        DraftMsg::AddPlayer => {
            let mut players = draft.players;
            players.push(Player::new(ids.player_id(), ""));
            (GameDraft { players, ..draft }, vec![])
        }
        DraftMsg::RenamePlayer { id, name } => {
            let players = draft
                .players
                .into_iter()
                .map(|p| if p.id == id { Player { name: name.clone(), ..p } } else { p })
                .collect();
            (GameDraft { players, ..draft }, vec![])
        }
        DraftMsg::RemovePlayer(id) => {
            if draft.players.first().is_some_and(|p| p.id == id) {
                debug!(player = %id, "the first player cannot be removed");
                return (draft, vec![]);
            }
            let players = draft.players.into_iter().filter(|p| p.id != id).collect();
            (GameDraft { players, ..draft }, vec![])
        }
        DraftMsg::ToggleLocation => {
            if permission == PermissionState::Denied {
                debug!("location toggle ignored: permission denied");
                return (draft, vec![]);
            }
            if draft.location.is_some() {
                return (
                    GameDraft {
                        location: None,
                        location_pending: false,
                        ..draft
                    },
                    vec![],
                );
            }
            (
                GameDraft {
                    location_pending: true,
                    ..draft
                },
                vec![DraftEffect::RequestLocation],
            )
        }
        DraftMsg::LocationResolved(Ok(location)) => {
            debug!(%location, "location resolved");
            (
                GameDraft {
                    location: Some(location),
                    location_pending: false,
                    ..draft
                },
                vec![],
            )
        }
        DraftMsg::LocationResolved(Err(err)) => {
            warn!(error = %err, %permission, "location request failed");
            let effects = if permission == PermissionState::Prompt {
                vec![DraftEffect::PermissionDenied]
            } else {
                vec![]
            };
            (
                GameDraft {
                    location_pending: false,
                    ..draft
                },
                effects,
            )
        }
    }
}

/// Reads the holes field: `Ok(None)` for an empty field, negatives become one,
/// anything above `MAX_HOLES` becomes `MAX_HOLES`, `Err(())` for text that is
/// not a whole number.
fn parse_holes_input(text: &str) -> Result<Option<u32>, ()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<i64>() {
        Ok(n) if n < 0 => Ok(Some(1)),
        Ok(n) => Ok(Some(u32::try_from(n).map_or(MAX_HOLES, |n| n.min(MAX_HOLES)))),
        Err(_) => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holes_input_parsing() {
        assert_eq!(parse_holes_input(""), Ok(None));
        assert_eq!(parse_holes_input("  "), Ok(None));
        assert_eq!(parse_holes_input("-4"), Ok(Some(1)));
        assert_eq!(parse_holes_input("0"), Ok(Some(0)));
        assert_eq!(parse_holes_input(" 18 "), Ok(Some(18)));
        assert_eq!(parse_holes_input("abc"), Err(()));
        assert_eq!(parse_holes_input("120"), Ok(Some(MAX_HOLES)));
        assert_eq!(parse_holes_input("99999999999"), Ok(Some(MAX_HOLES)));
    }
}
