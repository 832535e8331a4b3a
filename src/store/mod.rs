//! Game persistence.
//!
//! A game is always read and written whole. Every write bumps its version,
//! and [`GameStore::update`] runs read-modify-write serialized per game id.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::InMemoryStore;

use derive_getters::Getters;
use derive_new::new;

use crate::error::GameError;
use crate::game::{Game, GameId};
use crate::roster::TeamId;

/// A stored game and the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameRecord {
    game: Game,
    version: i64,
}

impl GameRecord {
    /// Consumes the record, returning the game.
    pub fn into_game(self) -> Game {
        self.game
    }
}

/// Mutation applied inside a serialized update.
pub type Mutation<'a> = dyn FnMut(&mut Game) -> Result<(), GameError> + 'a;

/// Durable storage for game aggregates.
pub trait GameStore: Send + Sync {
    /// Creates an empty game for two teams and returns it at version 1.
    fn create(&self, visiting: TeamId, home: TeamId) -> Result<GameRecord, StoreError>;

    /// Loads a game, or `None` if it does not exist.
    fn load(&self, id: GameId) -> Result<Option<GameRecord>, StoreError>;

    /// Loads every game, ordered by id.
    fn list(&self) -> Result<Vec<GameRecord>, StoreError>;

    /// Applies `mutate` to the current state of a game and saves the result.
    ///
    /// Concurrent updates to the same game run one at a time. When
    /// `expected_version` is given and differs from the stored version the
    /// update fails with [`GameError::Conflict`]. If `mutate` fails nothing
    /// is written and its error is returned.
    fn update(
        &self,
        id: GameId,
        expected_version: Option<i64>,
        mutate: &mut Mutation<'_>,
    ) -> Result<GameRecord, GameError>;
}

/// Checks a caller-supplied version against the stored one.
pub(crate) fn check_version(
    id: GameId,
    expected: Option<i64>,
    actual: i64,
) -> Result<(), GameError> {
    match expected {
        Some(expected) if expected != actual => {
            tracing::warn!(game_id = %id, expected, actual, "Stale version");
            Err(GameError::Conflict {
                game: id,
                expected,
                actual,
            })
        }
        _ => Ok(()),
    }
}
