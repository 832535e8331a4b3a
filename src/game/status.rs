//! Read-only game snapshots.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use super::{GameId, GamePhase, HalfInning, Lineup, Score, Scoreboard, Side, Strategies};
use crate::roster::TeamId;

/// Snapshot of a game derived from its aggregate. Not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    id: GameId,
    /// Version token to send back with the next change.
    version: i64,
    visiting_team: TeamId,
    home_team: TeamId,
    phase: GamePhase,
    inning: u8,
    half_inning: HalfInning,
    outs: u8,
    score: Score,
    winner: Option<Side>,
    visiting_lineup: Lineup,
    home_lineup: Lineup,
    strategies: Strategies,
    action_count: usize,
}

impl GameStatus {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: GameId,
        version: i64,
        visiting_team: TeamId,
        home_team: TeamId,
        phase: GamePhase,
        board: Scoreboard,
        visiting_lineup: Lineup,
        home_lineup: Lineup,
        strategies: Strategies,
        action_count: usize,
    ) -> Self {
        Self {
            id,
            version,
            visiting_team,
            home_team,
            phase,
            inning: *board.inning(),
            half_inning: *board.half(),
            outs: *board.outs(),
            score: *board.score(),
            winner: board.winner(),
            visiting_lineup,
            home_lineup,
            strategies,
            action_count,
        }
    }

    /// Lineup for one side.
    pub fn lineup(&self, side: Side) -> &Lineup {
        match side {
            Side::Visiting => &self.visiting_lineup,
            Side::Home => &self.home_lineup,
        }
    }

    /// Checks whether the game is over.
    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }
}
