mod common;
use crate::common::{
    adjust, assert_ordinals, current, hole, start_game, test_store, toggle, FixtureClock,
    fixture_timestamp,
};

use minigolf_scorecard::model::{Direction, HoleId, SequentialIds};
use minigolf_scorecard::mvu::{Effect, GameStore, Msg};
use std::sync::Arc;

#[test]
fn finishing_the_last_hole_appends_a_fresh_one() {
    let mut store = test_store();
    start_game(&mut store, &["A", "B"], 1);
    adjust(&mut store, Direction::Inc, 1, "A");
    adjust(&mut store, Direction::Inc, 1, "A");

    toggle(&mut store, 1);

    let game = current(&store);
    assert_eq!(game.hole_list.len(), 2);
    assert!(!game.hole_list[0].is_active);
    let appended = &game.hole_list[1];
    assert_eq!(appended.hole, 2);
    assert!(appended.is_active);
    assert!(appended.scores.iter().all(|s| s.score == 0));
    let roster: Vec<_> = game.players.iter().map(|p| &p.id).collect();
    let scored: Vec<_> = appended.scores.iter().map(|s| &s.id).collect();
    assert_eq!(scored, roster);
    assert_eq!(game.current_hole, game.hole_list[0].id);
    assert_eq!(game.players[0].total_score, 2);
}

#[test]
fn reopening_the_last_hole_still_appends() {
    let mut store = test_store();
    let game = start_game(&mut store, &["A"], 1);
    let first = hole(&game, 1);
    store.run(Msg::ToggleHoleActive(first.clone()));
    assert_eq!(current(&store).hole_list.len(), 1);

    let effects = store.dispatch(Msg::ToggleHoleFinished(first.clone()));

    let game = current(&store);
    assert!(effects.is_empty());
    assert_eq!(game.hole_list.len(), 2);
    assert!(game.hole_list[0].is_active);
    assert_eq!(game.current_hole, first);
    assert_ordinals(&game);
}

#[test]
fn the_tail_keeps_moving_as_holes_are_finished() {
    let mut store = test_store();
    start_game(&mut store, &["A"], 1);

    toggle(&mut store, 1);
    toggle(&mut store, 2);
    toggle(&mut store, 2);

    let game = current(&store);
    assert_eq!(game.hole_list.len(), 3);
    assert!(!game.hole_list[0].is_active);
    assert!(game.hole_list[1].is_active);
    assert!(game.hole_list[2].is_active);
    assert_eq!(game.current_hole, game.hole_list[1].id);
}

#[test]
fn inner_holes_toggle_without_growing() {
    let mut store = test_store();
    start_game(&mut store, &["A"], 3);

    toggle(&mut store, 2);
    assert_eq!(current(&store).hole_list.len(), 3);
    assert!(!current(&store).hole_list[1].is_active);

    toggle(&mut store, 2);
    let game = current(&store);
    assert_eq!(game.hole_list.len(), 3);
    assert!(game.hole_list[1].is_active);
    assert_eq!(game.current_hole, game.hole_list[1].id);
}

#[test]
fn ordinals_stay_sequential() {
    let mut store = test_store();
    start_game(&mut store, &["A", "B"], 2);

    for ordinal in [1, 2, 3, 1, 4, 4, 2, 6] {
        let game = current(&store);
        if game.hole_by_ordinal(ordinal).is_some() {
            toggle(&mut store, ordinal);
        }
        assert_ordinals(&current(&store));
    }
}

#[test]
fn decomposed_operations_match_the_fused_one() {
    let mut fused = test_store();
    let mut split = test_store();
    start_game(&mut fused, &["A"], 1);
    let game = start_game(&mut split, &["A"], 1);
    let first = hole(&game, 1);

    fused.run(Msg::ToggleHoleFinished(first.clone()));
    split.run(Msg::ToggleHoleActive(first.clone()));
    split.run(Msg::EnsureNextHole(first));

    assert_eq!(*fused.snapshot(), *split.snapshot());
}

#[test]
fn finishing_an_open_hole_suggests_the_next_one() {
    let mut store = test_store();
    let game = start_game(&mut store, &["A"], 2);
    let first = hole(&game, 1);
    let second = hole(&game, 2);

    let effects = store.dispatch(Msg::ToggleHoleFinished(first.clone()));
    assert_eq!(effects, vec![Effect::Advance { to: second }]);

    // reopening suggests nothing
    let effects = store.dispatch(Msg::ToggleHoleFinished(first));
    assert!(effects.is_empty());
}

#[test]
fn auto_advance_follows_the_suggestion() {
    let mut store = GameStore::new(
        Box::new(SequentialIds::new()),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    );
    start_game(&mut store, &["A"], 1);

    toggle(&mut store, 1);

    let game = current(&store);
    assert_eq!(game.hole_list.len(), 2);
    assert_eq!(game.current_hole, game.hole_list[1].id);
}

#[test]
fn focus_moves_the_cursor_only_to_known_holes() {
    let mut store = test_store();
    let game = start_game(&mut store, &["A"], 3);

    store.run(Msg::FocusHole(hole(&game, 3)));
    assert_eq!(current(&store).current_hole, hole(&game, 3));
    assert_eq!(current(&store).previous_hole().map(|h| h.hole), Some(2));
    assert!(current(&store).next_hole().is_none());

    let before = store.snapshot();
    store.run(Msg::FocusHole(HoleId::new("missing")));
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}

#[test]
fn toggling_an_unknown_hole_is_ignored() {
    let mut store = test_store();
    start_game(&mut store, &["A"], 1);
    let before = store.snapshot();

    let effects = store.dispatch(Msg::ToggleHoleFinished(HoleId::new("missing")));

    assert!(effects.is_empty());
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
}
