mod common;
use crate::common::{assert_sum_invariant, test_store};

use minigolf_scorecard::AppError;
use minigolf_scorecard::model::MAX_HOLES;
use minigolf_scorecard::script::{parse_script, replay, ReplayReport, Step};

const EXAMPLE: &str = r#"[
    { "step": "new_game", "name": "Sunday", "holes": 1, "players": ["A", "B"] },
    { "step": "score", "hole": 1, "player": "A", "direction": "inc" },
    { "step": "score", "hole": 1, "player": "a", "direction": "increment" },
    { "step": "toggle_hole", "hole": 1 },
    { "step": "finish_game" }
]"#;

#[test]
fn example_script_archives_the_round() -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_script(EXAMPLE)?;
    let mut store = test_store();

    let report = replay(&mut store, steps, "New game", 1);

    assert_eq!(
        report,
        ReplayReport {
            applied: 5,
            skipped: 0
        }
    );
    assert!(store.current_game().is_none());
    let game = &store.history()[0];
    assert_eq!(game.name, "Sunday");
    assert_eq!(game.hole_list.len(), 2);
    assert_eq!(game.players[0].total_score, 2);
    assert_sum_invariant(game);
    Ok(())
}

#[test]
fn unresolved_references_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_script(
        r#"[
            { "step": "score", "hole": 1, "player": "A", "direction": "inc" },
            { "step": "new_game", "players": ["A"] },
            { "step": "score", "hole": 4, "player": "A", "direction": "inc" },
            { "step": "score", "hole": 1, "player": "Zed", "direction": "dec" },
            { "step": "focus", "hole": 1 }
        ]"#,
    )?;
    let mut store = test_store();

    let report = replay(&mut store, steps, "Default name", 3);

    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped, 3);
    let game = store.current_game().expect("game running");
    assert_eq!(game.name, "Default name");
    assert_eq!(game.hole_list.len(), 3);
    assert_eq!(game.players[0].total_score, 0);
    Ok(())
}

#[test]
fn huge_hole_counts_are_capped() -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_script(
        r#"[{ "step": "new_game", "holes": 4000000000, "players": ["A"] }]"#,
    )?;
    let mut store = test_store();

    let report = replay(&mut store, steps, "Default name", 1);

    assert_eq!(report.applied, 1);
    let game = store.current_game().expect("game running");
    assert_eq!(game.hole_list.len(), MAX_HOLES as usize);
    Ok(())
}

#[test]
fn optional_fields_default() -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_script(r#"[{ "step": "new_game", "players": [] }]"#)?;
    assert_eq!(
        steps,
        vec![Step::NewGame {
            name: None,
            holes: None,
            players: vec![],
            location: None
        }]
    );
    Ok(())
}

#[test]
fn malformed_scripts_are_parse_errors() {
    assert!(matches!(
        parse_script(r#"[{ "step": "teleport" }]"#),
        Err(AppError::Parse(_))
    ));
    assert!(matches!(parse_script("{"), Err(AppError::Parse(_))));
}

#[test]
fn demo_script_replays_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let steps = minigolf_scorecard::script::load_script(std::path::Path::new("demos/sunday.json"))?;
    let mut store = test_store();

    let report = replay(&mut store, steps, "New game", 1);

    assert_eq!(report.skipped, 0);
    let game = store.current_game().expect("demo leaves the game running");
    assert_eq!(game.hole_list.len(), 4);
    let totals: Vec<_> = game.players.iter().map(|p| p.total_score).collect();
    assert_eq!(totals, vec![3, 2, 4]);
    assert_eq!(game.leader().map(|p| p.name.as_str()), Some("Bo"));
    assert_sum_invariant(game);
    Ok(())
}
