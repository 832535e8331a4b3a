//! Error taxonomy for game operations.

use crate::game::GameId;
use crate::store::StoreError;

/// Kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum EntityKind {
    /// A recorded game.
    Game,
    /// A team in the roster directory.
    Team,
    /// A player in the roster directory.
    Player,
}

/// Errors raised by game operations.
///
/// Every variant is reported before anything is written, so a failed
/// operation never leaves a game partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// A game, team or player id did not resolve.
    #[display("{} {} not found", kind, id)]
    NotFound {
        /// What kind of entity was looked up.
        kind: EntityKind,
        /// The id that failed to resolve.
        id: i32,
    },

    /// Submitted lineup or action data was malformed or inconsistent.
    #[display("Validation failed: {}", _0)]
    Validation(String),

    /// A strategy role outside the recognized set.
    #[display("Unknown strategy role '{}'", _0)]
    UnknownRole(String),

    /// The game is complete and no longer accepts changes.
    #[display("Game {} is complete and closed to changes", _0)]
    GameClosed(GameId),

    /// The caller's version token does not match the stored game.
    #[display("Game {} was modified concurrently: expected version {}, found {}", game, expected, actual)]
    Conflict {
        /// Game being updated.
        game: GameId,
        /// Version the caller read.
        expected: i64,
        /// Version currently stored.
        actual: i64,
    },

    /// The backing store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl GameError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not-found error for the given entity.
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<diesel::result::Error> for GameError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}
