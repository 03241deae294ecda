//! Plain-text rendering of a snapshot for the terminal driver.

use std::fmt::Write;

use crate::model::{Game, GameState, Hole};

#[must_use]
pub fn render_standings(game: &Game) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} holes)", game.name, game.hole_list.len());
    if let Some(location) = game.location {
        let _ = writeln!(out, "  at {location}");
    }
    let leader = game.leader().map(|p| &p.id);
    for (position, player) in game.standings().into_iter().enumerate() {
        let marker = if Some(&player.id) == leader { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker}{:>2}. {:<16} {:>4}",
            position + 1,
            display_name(&player.name),
            player.total_score
        );
    }
    out
}

#[must_use]
pub fn render_hole(hole: &Hole, is_current: bool) -> String {
    let mut out = String::new();
    let cursor = if is_current { ">" } else { " " };
    let status = if hole.is_active { "open" } else { "done" };
    let _ = writeln!(out, "{cursor} hole {} [{status}]", hole.hole);
    for score in &hole.scores {
        let _ = writeln!(out, "    {:<16} {:>3}", display_name(&score.name), score.score);
    }
    out
}

#[must_use]
pub fn render_game(game: &Game) -> String {
    let mut out = render_standings(game);
    for hole in &game.hole_list {
        out.push_str(&render_hole(hole, hole.id == game.current_hole));
    }
    out
}

#[must_use]
pub fn render_history(state: &GameState) -> String {
    if state.history.is_empty() {
        return "No finished games.\n".to_string();
    }
    let mut out = String::new();
    for game in &state.history {
        let finished = game
            .end_time
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let winner = game.leader().map_or("-", |p| display_name(&p.name));
        let _ = writeln!(out, "{finished}  {:<20} winner: {winner}", game.name);
    }
    out
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() { "(unnamed)" } else { name }
}
