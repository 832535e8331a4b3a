//! Game operations over a store and a roster directory.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{EntityKind, GameError};
use crate::game::{
    ActionSubmission, Directive, Game, GameId, GameStatus, Lineup, LineupEntry, RegulationRule,
    Role, Side,
};
use crate::roster::{PlayerId, RosterResolver, Team, TeamId};
use crate::store::{GameRecord, GameStore};

/// Service layer for recording games.
///
/// Validation that only depends on immutable data (rosters, team ids) runs
/// before the store's serialized update, so the critical section only
/// checks the game state and writes.
#[derive(Debug)]
pub struct GameService<S, R> {
    store: Arc<S>,
    roster: Arc<R>,
    rule: RegulationRule,
}

impl<S, R> Clone for GameService<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            roster: Arc::clone(&self.roster),
            rule: self.rule,
        }
    }
}

impl<S, R> GameService<S, R>
where
    S: GameStore,
    R: RosterResolver,
{
    /// Creates a service owning its store and roster.
    #[instrument(skip(store, roster))]
    pub fn new(store: S, roster: R, rule: RegulationRule) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(roster), rule)
    }

    /// Creates a service over shared collaborators.
    #[instrument(skip(store, roster))]
    pub fn from_shared(store: Arc<S>, roster: Arc<R>, rule: RegulationRule) -> Self {
        info!(
            regulation_innings = rule.regulation_innings(),
            allow_ties = rule.allow_ties(),
            close_on_completion = rule.close_on_completion(),
            "Creating GameService"
        );
        Self {
            store,
            roster,
            rule,
        }
    }

    /// Returns the regulation rule in force.
    pub fn rule(&self) -> &RegulationRule {
        &self.rule
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists every game's status, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameStatus>, GameError> {
        let statuses: Vec<GameStatus> = self
            .store
            .list()?
            .iter()
            .map(|record| self.status_of(record))
            .collect();
        debug!(count = statuses.len(), "Games listed");
        Ok(statuses)
    }

    /// Returns one game's status.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: GameId) -> Result<GameStatus, GameError> {
        let record = self.load(id)?;
        Ok(self.status_of(&record))
    }

    /// Creates a game between two teams.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if either team does not exist, or
    /// [`GameError::Validation`] if a team would play itself.
    #[instrument(skip(self))]
    pub fn create_game(&self, visiting: TeamId, home: TeamId) -> Result<GameId, GameError> {
        self.resolve_team(visiting)?;
        self.resolve_team(home)?;
        if visiting == home {
            warn!(team_id = %home, "Team scheduled against itself");
            return Err(GameError::validation(format!(
                "Team {} cannot play itself",
                home
            )));
        }

        let record = self.store.create(visiting, home)?;
        let id = *record.game().id();
        info!(game_id = %id, visiting = %visiting, home = %home, "Game created");
        Ok(id)
    }

    /// Replaces the lineup for one side.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if the lineup is inconsistent or
    /// names players outside the side's team, [`GameError::GameClosed`] if
    /// the game is over, and [`GameError::Conflict`] if `expected_version`
    /// is stale. The previous lineup is kept on any error.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub fn put_lineup(
        &self,
        id: GameId,
        side: Side,
        entries: &[LineupEntry],
        expected_version: Option<i64>,
    ) -> Result<GameStatus, GameError> {
        let current = self.load(id)?;
        let team = self.resolve_team(current.game().team(side))?;
        let lineup = Lineup::build(entries, &team, self.roster.as_ref())?;

        let rule = self.rule;
        let record = self.store.update(id, expected_version, &mut |game: &mut Game| {
            game.put_lineup(side, lineup.clone(), &rule)
        })?;
        info!(game_id = %id, side = %side, version = record.version(), "Lineup stored");
        Ok(self.status_of(&record))
    }

    /// Posts the latest directive for a role.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for a blank directive,
    /// [`GameError::GameClosed`] if the game is over, and
    /// [`GameError::Conflict`] if `expected_version` is stale.
    #[instrument(skip(self, directive))]
    pub fn post_strategy(
        &self,
        id: GameId,
        role: Role,
        directive: String,
        expected_version: Option<i64>,
    ) -> Result<GameStatus, GameError> {
        let directive = Directive::new(directive)?;
        let rule = self.rule;
        let record = self.store.update(id, expected_version, &mut |game: &mut Game| {
            game.post_strategy(role, directive.clone(), &rule).map(|_| ())
        })?;
        info!(game_id = %id, role = %role, version = record.version(), "Strategy stored");
        Ok(self.status_of(&record))
    }

    /// Appends a play and its result chain to the log.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if any node of the tree is
    /// malformed or involves a player from neither team,
    /// [`GameError::GameClosed`] if the game is over, and
    /// [`GameError::Conflict`] if `expected_version` is stale.
    #[instrument(skip(self, action), fields(outcome = %action.outcome))]
    pub fn append_action(
        &self,
        id: GameId,
        action: ActionSubmission,
        expected_version: Option<i64>,
    ) -> Result<GameStatus, GameError> {
        let current = self.load(id)?;
        let visiting = self.resolve_team(current.game().team(Side::Visiting))?;
        let home = self.resolve_team(current.game().team(Side::Home))?;
        let validated = action.validate(|player| self.check_participant(player, &visiting, &home))?;

        let rule = self.rule;
        let record = self.store.update(id, expected_version, &mut |game: &mut Game| {
            game.append_action(validated.clone(), &rule).map(|_| ())
        })?;
        info!(
            game_id = %id,
            version = record.version(),
            actions = record.game().book().actions().len(),
            "Action stored"
        );
        Ok(self.status_of(&record))
    }

    fn load(&self, id: GameId) -> Result<GameRecord, GameError> {
        self.store.load(id)?.ok_or_else(|| {
            debug!(game_id = %id, "Game not found");
            GameError::not_found(EntityKind::Game, id.get())
        })
    }

    fn resolve_team(&self, id: TeamId) -> Result<Team, GameError> {
        self.roster.team(id)?.ok_or_else(|| {
            warn!(team_id = %id, "Team not found");
            GameError::not_found(EntityKind::Team, id.get())
        })
    }

    fn check_participant(
        &self,
        player: PlayerId,
        visiting: &Team,
        home: &Team,
    ) -> Result<(), GameError> {
        if self.roster.player(player)?.is_none() {
            return Err(GameError::validation(format!("Unknown player {}", player)));
        }
        if !visiting.has_player(player) && !home.has_player(player) {
            return Err(GameError::validation(format!(
                "Player {} plays for neither {} nor {}",
                player,
                visiting.display_name(),
                home.display_name()
            )));
        }
        Ok(())
    }

    fn status_of(&self, record: &GameRecord) -> GameStatus {
        record.game().status(*record.version(), &self.rule)
    }
}
