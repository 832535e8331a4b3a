//! The game aggregate: fixed teams plus everything recorded about the game.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{
    ActionId, ActionLog, Directive, GameId, GameStatus, Lineup, RegulationRule, Role, Scoreboard,
    Side, Strategies, ValidatedAction,
};
use crate::error::GameError;
use crate::roster::TeamId;

/// Where a game is in its lifecycle. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// No lineups and no actions yet.
    Created,
    /// At least one side has a lineup; no actions yet.
    LineupsSet,
    /// Actions have been recorded and the game is not over.
    InProgress,
    /// The regulation condition is met.
    Complete,
}

/// The mutable part of a game: lineups, strategies and the play log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Scorebook {
    visiting_lineup: Lineup,
    home_lineup: Lineup,
    strategies: Strategies,
    actions: ActionLog,
}

/// Aggregate root for one game.
///
/// Team ids are fixed at creation. Everything else lives in the
/// [`Scorebook`], which is saved and loaded as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Game {
    id: GameId,
    visiting_team: TeamId,
    home_team: TeamId,
    book: Scorebook,
}

impl Game {
    /// Creates a game with empty lineups, strategies and log.
    #[instrument]
    pub fn new(id: GameId, visiting_team: TeamId, home_team: TeamId) -> Self {
        Self::from_parts(id, visiting_team, home_team, Scorebook::default())
    }

    /// Reassembles a game from stored parts.
    pub fn from_parts(
        id: GameId,
        visiting_team: TeamId,
        home_team: TeamId,
        book: Scorebook,
    ) -> Self {
        Self {
            id,
            visiting_team,
            home_team,
            book,
        }
    }

    /// Team assigned to a side.
    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::Visiting => self.visiting_team,
            Side::Home => self.home_team,
        }
    }

    /// Current lineup for a side.
    pub fn lineup(&self, side: Side) -> &Lineup {
        match side {
            Side::Visiting => &self.book.visiting_lineup,
            Side::Home => &self.book.home_lineup,
        }
    }

    /// Folds the play log under the given rule.
    pub fn scoreboard(&self, rule: &RegulationRule) -> Scoreboard {
        Scoreboard::replay(&self.book.actions, rule)
    }

    /// Lifecycle phase under the given rule.
    pub fn phase(&self, rule: &RegulationRule) -> GamePhase {
        self.phase_from(&self.scoreboard(rule))
    }

    fn phase_from(&self, board: &Scoreboard) -> GamePhase {
        if *board.complete() {
            GamePhase::Complete
        } else if !self.book.actions.is_empty() {
            GamePhase::InProgress
        } else if !self.book.visiting_lineup.is_empty() || !self.book.home_lineup.is_empty() {
            GamePhase::LineupsSet
        } else {
            GamePhase::Created
        }
    }

    /// Fails with [`GameError::GameClosed`] if the game is complete and the
    /// rule closes completed games.
    pub fn ensure_open(&self, rule: &RegulationRule) -> Result<(), GameError> {
        self.check_open(&self.scoreboard(rule), rule)
    }

    fn check_open(&self, board: &Scoreboard, rule: &RegulationRule) -> Result<(), GameError> {
        if *rule.close_on_completion() && *board.complete() {
            warn!(game_id = %self.id, "Change rejected on completed game");
            return Err(GameError::GameClosed(self.id));
        }
        Ok(())
    }

    /// Replaces a side's lineup wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameClosed`] if the game no longer accepts changes.
    #[instrument(skip(self, lineup, rule), fields(game_id = %self.id, count = lineup.participants().len()))]
    pub fn put_lineup(
        &mut self,
        side: Side,
        lineup: Lineup,
        rule: &RegulationRule,
    ) -> Result<(), GameError> {
        self.ensure_open(rule)?;
        match side {
            Side::Visiting => self.book.visiting_lineup = lineup,
            Side::Home => self.book.home_lineup = lineup,
        }
        info!("Lineup replaced");
        Ok(())
    }

    /// Stores the latest directive for a role.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameClosed`] if the game no longer accepts changes.
    #[instrument(skip(self, directive, rule), fields(game_id = %self.id))]
    pub fn post_strategy(
        &mut self,
        role: Role,
        directive: Directive,
        rule: &RegulationRule,
    ) -> Result<Option<Directive>, GameError> {
        self.ensure_open(rule)?;
        let previous = self.book.strategies.post(role, directive);
        info!(replaced = previous.is_some(), "Strategy posted");
        Ok(previous)
    }

    /// Appends a validated play tree to the log.
    ///
    /// The top-level action must be in the inning and half the log is
    /// currently in, so its runs and outs land on the right side.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameClosed`] if the game no longer accepts
    /// changes, or [`GameError::Validation`] if the action is for another
    /// half inning.
    #[instrument(skip(self, action, rule), fields(game_id = %self.id, size = action.size()))]
    pub fn append_action(
        &mut self,
        action: ValidatedAction,
        rule: &RegulationRule,
    ) -> Result<ActionId, GameError> {
        let board = self.scoreboard(rule);
        self.check_open(&board, rule)?;
        if !*board.complete() {
            let expected = (*board.inning(), *board.half());
            let submitted = (*action.record().inning(), *action.record().half_inning());
            if submitted != expected {
                warn!(
                    inning = submitted.0,
                    half = %submitted.1,
                    current_inning = expected.0,
                    current_half = %expected.1,
                    "Action does not match the current half inning"
                );
                return Err(GameError::validation(format!(
                    "Action is for the {} of inning {}, but the game is in the {} of inning {}",
                    submitted.1, submitted.0, expected.1, expected.0
                )));
            }
        }
        self.book.actions.check_progression(&action);
        let id = self.book.actions.append(action);
        info!(action = %id, "Action recorded");
        Ok(id)
    }

    /// Derives a read-only snapshot.
    pub fn status(&self, version: i64, rule: &RegulationRule) -> GameStatus {
        let board = self.scoreboard(rule);
        let phase = self.phase_from(&board);
        GameStatus::new(
            self.id,
            version,
            self.visiting_team,
            self.home_team,
            phase,
            board,
            self.book.visiting_lineup.clone(),
            self.book.home_lineup.clone(),
            self.book.strategies.clone(),
            self.book.actions.len(),
        )
    }
}
