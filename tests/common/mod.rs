#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone, Utc};
use minigolf_scorecard::model::{Direction, Game, HoleId, NewGame, Player, PlayerId, SequentialIds};
use minigolf_scorecard::mvu::{GameStore, Msg};
use mockable::Clock;
use std::sync::Arc;

pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 17, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Store with deterministic ids and a frozen clock; auto advance off so the
/// cursor stays where the store puts it.
pub fn test_store() -> GameStore {
    GameStore::new(
        Box::new(SequentialIds::new()),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    )
    .auto_advance(false)
}

pub fn new_game(store: &GameStore, names: &[&str], holes: u32) -> NewGame {
    let ids = store.ids();
    NewGame {
        id: ids.game_id(),
        name: "Test round".to_string(),
        holes,
        players: names
            .iter()
            .map(|name| Player::new(ids.player_id(), *name))
            .collect(),
        location: None,
    }
}

pub fn start_game(store: &mut GameStore, names: &[&str], holes: u32) -> Game {
    let new_game = new_game(store, names, holes);
    store.run(Msg::CreateGame(new_game));
    current(store)
}

pub fn current(store: &GameStore) -> Game {
    store.current_game().cloned().expect("a game should be running")
}

pub fn player(game: &Game, name: &str) -> PlayerId {
    game.player_by_name(name).expect("player in roster").id.clone()
}

pub fn hole(game: &Game, ordinal: u32) -> HoleId {
    game.hole_by_ordinal(ordinal).expect("hole exists").id.clone()
}

pub fn adjust(store: &mut GameStore, direction: Direction, ordinal: u32, name: &str) {
    let game = current(store);
    store.run(Msg::AdjustScore {
        direction,
        hole_id: hole(&game, ordinal),
        player_id: player(&game, name),
    });
}

pub fn toggle(store: &mut GameStore, ordinal: u32) {
    let game = current(store);
    store.run(Msg::ToggleHoleFinished(hole(&game, ordinal)));
}

pub fn assert_sum_invariant(game: &Game) {
    for p in &game.players {
        assert_eq!(
            p.total_score,
            game.hole_score_sum(&p.id),
            "total of {} drifted from its hole scores",
            p.name
        );
    }
}

pub fn assert_ordinals(game: &Game) {
    for (i, h) in game.hole_list.iter().enumerate() {
        assert_eq!(h.hole as usize, i + 1, "hole at index {i} has ordinal {}", h.hole);
    }
}
