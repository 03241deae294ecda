use mockable::Clock;
use tracing::{debug, info};

use crate::model::{Direction, Game, GameState, Hole, HoleId, IdSource, NewGame, PlayerId};

/// Everything a transition may ask of the outside world.
#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub ids: &'a dyn IdSource,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    CreateGame(NewGame),
    AdjustScore {
        direction: Direction,
        hole_id: HoleId,
        player_id: PlayerId,
    },
    /// Flip a hole between open and finished, landing the cursor on it.
    ToggleHoleActive(HoleId),
    /// Append a fresh hole when `HoleId` is the last one.
    EnsureNextHole(HoleId),
    /// `ToggleHoleActive` followed by `EnsureNextHole`.
    ToggleHoleFinished(HoleId),
    FocusHole(HoleId),
    FinishGame,
}

/// Follow-ups the view may act on; the store itself never requires them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A hole was just finished; the hole after it is the natural next focus.
    Advance { to: HoleId },
}

pub fn update(state: &mut GameState, msg: Msg, deps: Deps<'_>) -> Vec<Effect> {
    match msg {
        Msg::CreateGame(new_game) => {
            let game = Game::create(new_game, deps.ids, deps.clock.utc());
            info!(
                game = %game.id,
                name = %game.name,
                players = game.players.len(),
                holes = game.hole_list.len(),
                "game started"
            );
            state.current_game = Some(game);
            vec![]
        }
        Msg::AdjustScore {
            direction,
            hole_id,
            player_id,
        } => {
            if let Some(game) = state.current_game.as_mut() {
                adjust_score(game, direction, &hole_id, &player_id);
            } else {
                debug!(hole = %hole_id, player = %player_id, "score ignored: no game running");
            }
            vec![]
        }
        Msg::ToggleHoleActive(hole_id) => {
            with_game(state, "toggle hole", |game| {
                toggle_hole_active(game, &hole_id);
            });
            vec![]
        }
        Msg::EnsureNextHole(hole_id) => {
            with_game(state, "next hole", |game| {
                ensure_next_hole(game, &hole_id, deps.ids);
            });
            vec![]
        }
        Msg::ToggleHoleFinished(hole_id) => {
            let mut effects = vec![];
            with_game(state, "finish hole", |game| {
                let Some(index) = game.hole_index(&hole_id) else {
                    debug!(hole = %hole_id, "finish hole ignored: unknown hole");
                    return;
                };
                let finishing = game.hole_list.get(index).is_some_and(|h| h.is_active);
                toggle_hole_active(game, &hole_id);
                ensure_next_hole(game, &hole_id, deps.ids);
                if finishing {
                    if let Some(next) = game.hole_list.get(index + 1) {
                        effects.push(Effect::Advance {
                            to: next.id.clone(),
                        });
                    }
                }
            });
            effects
        }
        Msg::FocusHole(hole_id) => {
            with_game(state, "focus", |game| {
                if game.hole(&hole_id).is_some() {
                    game.current_hole = hole_id;
                } else {
                    debug!(hole = %hole_id, "focus ignored: unknown hole");
                }
            });
            vec![]
        }
        Msg::FinishGame => {
            match state.current_game.take() {
                Some(mut game) => {
                    game.end_time = Some(deps.clock.utc());
                    info!(
                        game = %game.id,
                        holes = game.hole_list.len(),
                        leader = game.leader().map_or("", |p| p.name.as_str()),
                        "game finished"
                    );
                    state.history.insert(0, game);
                }
                None => debug!("finish game ignored: no game running"),
            }
            vec![]
        }
    }
}

fn with_game(state: &mut GameState, action: &str, f: impl FnOnce(&mut Game)) {
    match state.current_game.as_mut() {
        Some(game) => f(game),
        None => debug!(%action, "ignored: no game running"),
    }
}

fn adjust_score(game: &mut Game, direction: Direction, hole_id: &HoleId, player_id: &PlayerId) {
    if game.player(player_id).is_none() {
        debug!(player = %player_id, "score ignored: unknown player");
        return;
    }
    let Some(entry) = game
        .hole_list
        .iter_mut()
        .find(|h| &h.id == hole_id)
        .and_then(|h| h.scores.iter_mut().find(|s| &s.id == player_id))
    else {
        debug!(hole = %hole_id, player = %player_id, "score ignored: unknown hole");
        return;
    };

    entry.score = match direction {
        Direction::Inc => entry.score.saturating_add(1),
        Direction::Dec => entry.score.saturating_sub(1),
    };
    debug!(hole = %hole_id, player = %player_id, score = entry.score, ?direction, "score adjusted");
    // totals always follow the hole scores, so a clamped hole leaves the total alone
    game.recompute_totals();
}

fn toggle_hole_active(game: &mut Game, hole_id: &HoleId) {
    let Some(hole) = game.hole_list.iter_mut().find(|h| &h.id == hole_id) else {
        debug!(hole = %hole_id, "toggle ignored: unknown hole");
        return;
    };
    hole.is_active = !hole.is_active;
    debug!(hole = hole.hole, active = hole.is_active, "hole toggled");
    game.current_hole = hole_id.clone();
}

fn ensure_next_hole(game: &mut Game, hole_id: &HoleId, ids: &dyn IdSource) {
    let Some(last) = game.last_hole().filter(|h| &h.id == hole_id) else {
        return;
    };
    let mut scores = last.scores.clone();
    for score in &mut scores {
        score.score = 0;
    }
    let next = Hole {
        id: ids.hole_id(),
        hole: last.hole + 1,
        scores,
        is_active: true,
    };
    debug!(hole = next.hole, id = %next.id, "hole appended");
    game.hole_list.push(next);
}
