use chrono::{DateTime, Utc};

use super::ids::{HoleId, IdSource, PlayerId};
use super::types::{Game, Hole, NewGame, Player, PlayerScore};

/// Most holes a game is created with; larger requests are clamped. Finishing
/// the last hole still appends past it one hole at a time.
pub const MAX_HOLES: u32 = 99;

impl Game {
    /// Builds a fresh game with `holes` clamped to `1..=MAX_HOLES` open holes
    /// and the cursor on the first.
    pub fn create(new_game: NewGame, ids: &dyn IdSource, now: DateTime<Utc>) -> Self {
        let NewGame {
            id,
            name,
            holes,
            mut players,
            location,
        } = new_game;
        let holes = holes.clamp(1, MAX_HOLES);
        // a new game starts every player at zero
        for player in &mut players {
            player.total_score = 0;
        }

        let current_hole = ids.hole_id();
        let hole_list: Vec<Hole> = std::iter::once(current_hole.clone())
            .chain((2..=holes).map(|_| ids.hole_id()))
            .zip(1..)
            .map(|(id, ordinal)| Hole {
                id,
                hole: ordinal,
                scores: roster_snapshot(&players),
                is_active: true,
            })
            .collect();

        let mut game = Self {
            id,
            name,
            players,
            holes,
            hole_list,
            current_hole,
            location,
            start_time: now,
            end_time: None,
        };
        game.recompute_totals();
        game
    }

    #[must_use]
    pub fn hole(&self, hole_id: &HoleId) -> Option<&Hole> {
        self.hole_list.iter().find(|h| &h.id == hole_id)
    }

    #[must_use]
    pub fn hole_index(&self, hole_id: &HoleId) -> Option<usize> {
        self.hole_list.iter().position(|h| &h.id == hole_id)
    }

    #[must_use]
    pub fn hole_by_ordinal(&self, ordinal: u32) -> Option<&Hole> {
        self.hole_list.iter().find(|h| h.hole == ordinal)
    }

    #[must_use]
    pub fn last_hole(&self) -> Option<&Hole> {
        self.hole_list.last()
    }

    /// Index of the cursor, falling back to the first hole.
    #[must_use]
    pub fn current_hole_index(&self) -> usize {
        self.hole_index(&self.current_hole).unwrap_or(0)
    }

    #[must_use]
    pub fn next_hole(&self) -> Option<&Hole> {
        self.hole_list.get(self.current_hole_index() + 1)
    }

    #[must_use]
    pub fn previous_hole(&self) -> Option<&Hole> {
        self.current_hole_index()
            .checked_sub(1)
            .and_then(|i| self.hole_list.get(i))
    }

    #[must_use]
    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    /// First roster entry whose name matches, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim();
        self.players
            .iter()
            .find(|p| p.name.trim().eq_ignore_ascii_case(name))
    }

    /// Sum of a player's per-hole scores.
    #[must_use]
    pub fn hole_score_sum(&self, player_id: &PlayerId) -> u32 {
        self.hole_list
            .iter()
            .filter_map(|h| h.score_of(player_id))
            .sum()
    }

    /// Player with the lowest total; ties go to the earlier roster entry.
    #[must_use]
    pub fn leader(&self) -> Option<&Player> {
        self.players
            .iter()
            .reduce(|lowest, p| if p.total_score < lowest.total_score { p } else { lowest })
    }

    /// Roster ordered by total score, lowest first, roster order kept on ties.
    #[must_use]
    pub fn standings(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by_key(|p| p.total_score);
        players
    }

    pub(crate) fn recompute_totals(&mut self) {
        let totals: Vec<u32> = self
            .players
            .iter()
            .map(|p| self.hole_score_sum(&p.id))
            .collect();
        for (player, total) in self.players.iter_mut().zip(totals) {
            player.total_score = total;
        }
    }
}

/// Per-hole copy of the roster, each entry seeded with the player's running total.
fn roster_snapshot(players: &[Player]) -> Vec<PlayerScore> {
    players
        .iter()
        .map(|p| PlayerScore {
            id: p.id.clone(),
            name: p.name.clone(),
            score: p.total_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_snapshot_keeps_roster_order() {
        let players = vec![
            Player::new(PlayerId::new("b"), "B"),
            Player::new(PlayerId::new("a"), "A"),
        ];
        let ids: Vec<_> = roster_snapshot(&players)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![PlayerId::new("b"), PlayerId::new("a")]);
    }

    #[test]
    fn leader_prefers_earlier_roster_entry_on_ties() {
        let ids = crate::model::SequentialIds::new();
        let new_game = NewGame {
            id: ids.game_id(),
            name: String::new(),
            holes: 1,
            players: vec![Player::new(ids.player_id(), "X"), Player::new(ids.player_id(), "Y")],
            location: None,
        };
        let game = Game::create(new_game, &ids, Utc::now());
        assert_eq!(game.leader().map(|p| p.name.as_str()), Some("X"));
    }
}
