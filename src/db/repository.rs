//! SQLite repository for rosters and game aggregates.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{GameRow, NewGameRow, NewPlayerRow, NewTeamRow, PlayerRow, TeamRow, schema};
use crate::error::{EntityKind, GameError};
use crate::game::{GameId, Scorebook};
use crate::roster::{Player, PlayerId, RosterFile, RosterResolver, Team, TeamId};
use crate::store::{GameRecord, GameStore, Mutation, StoreError, check_version};

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for teams, players and games.
///
/// Each call opens its own connection, so clones can be used from any
/// thread. Game updates run inside `BEGIN IMMEDIATE` transactions, which
/// SQLite serializes.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: String,
}

impl SqliteRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, StoreError> {
        if db_path.trim().is_empty() {
            return Err(StoreError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating SqliteRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts every team and player from a roster file in one transaction.
    ///
    /// Returns the new team ids in file order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any insert fails; nothing is kept in that case.
    #[instrument(skip(self, file), fields(teams = file.teams().len()))]
    pub fn seed(&self, file: &RosterFile) -> Result<Vec<TeamId>, StoreError> {
        let mut conn = self.connection()?;
        let ids = conn.transaction::<_, StoreError, _>(|conn| {
            let mut ids = Vec::with_capacity(file.teams().len());
            for seed in file.teams() {
                let team: TeamRow = diesel::insert_into(schema::teams::table)
                    .values(&NewTeamRow::from(seed.profile()))
                    .returning(TeamRow::as_returning())
                    .get_result(conn)?;
                let team_id = TeamId::from(*team.id());

                let rows: Vec<NewPlayerRow> = seed
                    .players()
                    .iter()
                    .map(|p| NewPlayerRow::from_profile(team_id, p))
                    .collect();
                if !rows.is_empty() {
                    diesel::insert_into(schema::players::table)
                        .values(&rows)
                        .execute(conn)?;
                }

                debug!(team_id = %team_id, players = rows.len(), "Team seeded");
                ids.push(team_id);
            }
            Ok(ids)
        })?;
        info!(teams = ids.len(), "Roster seeded");
        Ok(ids)
    }

    /// Lists all teams with their players, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_teams(&self) -> Result<Vec<Team>, StoreError> {
        let mut conn = self.connection()?;
        let teams = schema::teams::table
            .order(schema::teams::id.asc())
            .select(TeamRow::as_select())
            .load(&mut conn)?;
        let players = PlayerRow::belonging_to(&teams)
            .order(schema::players::id.asc())
            .select(PlayerRow::as_select())
            .load(&mut conn)?;

        let result: Vec<Team> = players
            .grouped_by(&teams)
            .into_iter()
            .zip(teams)
            .map(|(players, team)| team.into_team(players.iter().map(|p| *p.id()).collect()))
            .collect();
        info!(count = result.len(), "Teams loaded");
        Ok(result)
    }

    fn player_ids(conn: &mut SqliteConnection, team: i32) -> Result<Vec<i32>, StoreError> {
        Ok(schema::players::table
            .filter(schema::players::team_id.eq(team))
            .order(schema::players::id.asc())
            .select(schema::players::id)
            .load::<i32>(conn)?)
    }
}

impl RosterResolver for SqliteRepository {
    #[instrument(skip(self))]
    fn team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::teams::table
            .find(id.get())
            .select(TeamRow::as_select())
            .first(&mut conn)
            .optional()?;
        match row {
            Some(row) => {
                let players = Self::player_ids(&mut conn, id.get())?;
                Ok(Some(row.into_team(players)))
            }
            None => {
                debug!(team_id = %id, "Team not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let mut conn = self.connection()?;
        schema::players::table
            .find(id.get())
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(PlayerRow::into_player)
            .transpose()
    }
}

impl GameStore for SqliteRepository {
    #[instrument(skip(self))]
    fn create(&self, visiting: TeamId, home: TeamId) -> Result<GameRecord, StoreError> {
        let mut conn = self.connection()?;
        let body = serde_json::to_string(&Scorebook::default())?;
        let row = diesel::insert_into(schema::games::table)
            .values(&NewGameRow::new(visiting.get(), home.get(), 1, body))
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;
        info!(game_id = row.id(), "Game created");
        row.into_record()
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Option<GameRecord>, StoreError> {
        let mut conn = self.connection()?;
        schema::games::table
            .find(id.get())
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(GameRow::into_record)
            .transpose()
    }

    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
        let mut conn = self.connection()?;
        let rows = schema::games::table
            .order(schema::games::id.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;
        debug!(count = rows.len(), "Games loaded");
        rows.into_iter().map(GameRow::into_record).collect()
    }

    #[instrument(skip(self, mutate))]
    fn update(
        &self,
        id: GameId,
        expected_version: Option<i64>,
        mutate: &mut Mutation<'_>,
    ) -> Result<GameRecord, GameError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction::<_, GameError, _>(|conn| {
            let row = schema::games::table
                .find(id.get())
                .select(GameRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| GameError::not_found(EntityKind::Game, id.get()))?;
            let current = *row.version();
            check_version(id, expected_version, current)?;

            let mut game = row.into_record()?.into_game();
            if let Err(err) = mutate(&mut game) {
                warn!(game_id = %id, error = %err, "Update rejected");
                return Err(err);
            }

            let body = serde_json::to_string(game.book()).map_err(StoreError::from)?;
            let next = current + 1;
            let written = diesel::update(
                schema::games::table
                    .filter(schema::games::id.eq(id.get()))
                    .filter(schema::games::version.eq(current)),
            )
            .set((
                schema::games::body.eq(body),
                schema::games::version.eq(next),
                schema::games::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)?;
            if written != 1 {
                return Err(StoreError::new(format!(
                    "Game {} changed during a serialized update",
                    id
                ))
                .into());
            }

            debug!(game_id = %id, version = next, "Game saved");
            Ok(GameRecord::new(game, next))
        })
    }
}
