//! In-memory roster directory.

use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use super::{
    Player, PlayerId, PlayerProfile, RosterFile, RosterResolver, Team, TeamId, TeamProfile,
};
use crate::store::StoreError;

/// Roster directory held entirely in memory.
///
/// Populated up front, then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    teams: BTreeMap<TeamId, Team>,
    players: BTreeMap<PlayerId, Player>,
    next_team: i32,
    next_player: i32,
}

impl InMemoryRoster {
    /// Creates an empty roster directory.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a parsed roster file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a player cannot be signed.
    #[instrument(skip(file), fields(teams = file.teams().len()))]
    pub fn from_seed(file: &RosterFile) -> Result<Self, StoreError> {
        let mut roster = Self::new();
        for seed in file.teams() {
            let team = roster.add_team(seed.profile().clone());
            for player in seed.players() {
                roster.add_player(team, player.clone())?;
            }
        }
        info!(teams = roster.teams.len(), players = roster.players.len(), "Roster loaded");
        Ok(roster)
    }

    /// Adds a team with an empty roster and returns its id.
    #[instrument(skip(self))]
    pub fn add_team(&mut self, profile: TeamProfile) -> TeamId {
        self.next_team += 1;
        let id = TeamId::from(self.next_team);
        debug!(team_id = %id, "Adding team");
        self.teams.insert(id, Team::new(id, profile, Vec::new()));
        id
    }

    /// Signs a player to a team and returns the new player id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the team does not exist.
    #[instrument(skip(self, profile))]
    pub fn add_player(
        &mut self,
        team: TeamId,
        profile: PlayerProfile,
    ) -> Result<PlayerId, StoreError> {
        if !self.teams.contains_key(&team) {
            return Err(StoreError::new(format!("Team {} does not exist", team)));
        }
        self.next_player += 1;
        let id = PlayerId::from(self.next_player);

        let existing = &self.teams[&team];
        let mut players = existing.players().clone();
        players.push(id);
        let updated = Team::new(team, existing.profile().clone(), players);
        self.teams.insert(team, updated);
        self.players.insert(id, Player::new(id, team, profile));

        debug!(team_id = %team, player_id = %id, "Player signed");
        Ok(id)
    }

    /// Returns every team, ordered by id.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }
}

impl RosterResolver for InMemoryRoster {
    fn team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.get(&id).cloned())
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.players.get(&id).cloned())
    }
}
