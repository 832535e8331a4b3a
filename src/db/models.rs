//! Database rows and their conversions to domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::instrument;

use crate::db::schema;
use crate::game::{Game, GameId, Scorebook};
use crate::roster::{
    Handedness, Player, PlayerId, PlayerProfile, Team, TeamId, TeamProfile,
};
use crate::store::{GameRecord, StoreError};

/// Team database row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::teams)]
pub struct TeamRow {
    id: i32,
    city: String,
    name: String,
    owner_first_name: String,
    owner_last_name: String,
}

impl TeamRow {
    /// Combines the row with its player ids.
    pub fn into_team(self, players: Vec<i32>) -> Team {
        Team::new(
            TeamId::from(self.id),
            TeamProfile::new(
                self.city,
                self.name,
                self.owner_first_name,
                self.owner_last_name,
            ),
            players.into_iter().map(PlayerId::from).collect(),
        )
    }
}

/// Insertable team row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::teams)]
pub struct NewTeamRow {
    city: String,
    name: String,
    owner_first_name: String,
    owner_last_name: String,
}

impl From<&TeamProfile> for NewTeamRow {
    fn from(profile: &TeamProfile) -> Self {
        Self::new(
            profile.city().clone(),
            profile.name().clone(),
            profile.owner_first_name().clone(),
            profile.owner_last_name().clone(),
        )
    }
}

/// Player database row.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::players)]
#[diesel(belongs_to(TeamRow, foreign_key = team_id))]
pub struct PlayerRow {
    id: i32,
    team_id: i32,
    first_name: String,
    last_name: String,
    season: i32,
    primary_position: i32,
    bats: String,
    throws: String,
    batting_average: i32,
    weight: Option<i32>,
}

impl PlayerRow {
    /// Converts the row into a domain player.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a stored value is out of range.
    #[instrument(skip(self), fields(player_id = self.id))]
    pub fn into_player(self) -> Result<Player, StoreError> {
        let bats = parse_hand(&self.bats)?;
        let throws = parse_hand(&self.throws)?;
        let profile = PlayerProfile::new(
            self.first_name,
            self.last_name,
            narrow(self.season, "season")?,
            narrow(self.primary_position, "primary_position")?,
            bats,
            throws,
            narrow(self.batting_average, "batting_average")?,
            self.weight.map(|w| narrow(w, "weight")).transpose()?,
        );
        Ok(Player::new(
            PlayerId::from(self.id),
            TeamId::from(self.team_id),
            profile,
        ))
    }
}

fn parse_hand(raw: &str) -> Result<Handedness, StoreError> {
    Handedness::from_str(raw).map_err(|_| StoreError::new(format!("Invalid handedness: '{}'", raw)))
}

fn narrow<T: TryFrom<i32>>(value: i32, column: &str) -> Result<T, StoreError> {
    T::try_from(value)
        .map_err(|_| StoreError::new(format!("Column {} out of range: {}", column, value)))
}

/// Insertable player row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayerRow {
    team_id: i32,
    first_name: String,
    last_name: String,
    season: i32,
    primary_position: i32,
    bats: String,
    throws: String,
    batting_average: i32,
    weight: Option<i32>,
}

impl NewPlayerRow {
    /// Builds a row signing `profile` to `team`.
    pub fn from_profile(team: TeamId, profile: &PlayerProfile) -> Self {
        Self::new(
            team.get(),
            profile.first_name().clone(),
            profile.last_name().clone(),
            i32::from(*profile.season()),
            i32::from(*profile.primary_position()),
            profile.bats().code().to_string(),
            profile.throws().code().to_string(),
            i32::from(*profile.batting_average()),
            profile.weight().map(i32::from),
        )
    }
}

/// Game database row. The scorebook is stored as JSON in `body`.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: i32,
    visiting_team_id: i32,
    home_team_id: i32,
    version: i64,
    body: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the row into a versioned game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the body is not a valid scorebook.
    #[instrument(skip(self), fields(game_id = self.id, version = self.version))]
    pub fn into_record(self) -> Result<GameRecord, StoreError> {
        let book: Scorebook = serde_json::from_str(&self.body)?;
        let game = Game::from_parts(
            GameId::from(self.id),
            TeamId::from(self.visiting_team_id),
            TeamId::from(self.home_team_id),
            book,
        );
        Ok(GameRecord::new(game, self.version))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    visiting_team_id: i32,
    home_team_id: i32,
    version: i64,
    body: String,
}
