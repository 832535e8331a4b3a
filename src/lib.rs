//! Cardball library - a recorder for baseball games
//!
//! Keeps, per game, the two lineups, the latest directive of each coaching
//! role and a log of plays with nested result chains. Score, outs and
//! inning are always derived by folding the log.
//!
//! # Architecture
//!
//! - **Game**: the aggregate, its lineups, strategies and action log
//! - **Store**: versioned persistence, in memory or SQLite
//! - **Roster**: read-only team and player directory
//! - **Service**: the operations, validated and serialized per game
//! - **Api**: axum routes over the service
//!
//! # Example
//!
//! ```no_run
//! use cardball::{GameService, InMemoryRoster, InMemoryStore, RegulationRule, TeamProfile};
//!
//! # fn example() -> Result<(), cardball::GameError> {
//! let mut roster = InMemoryRoster::new();
//! let rockies = roster.add_team(TeamProfile::new(
//!     "Denver".to_string(),
//!     "Rockies".to_string(),
//!     "Dick".to_string(),
//!     "Monfort".to_string(),
//! ));
//! let phillies = roster.add_team(TeamProfile::new(
//!     "Philadelphia".to_string(),
//!     "Phillies".to_string(),
//!     "John".to_string(),
//!     "Middleton".to_string(),
//! ));
//!
//! let service = GameService::new(InMemoryStore::new(), roster, RegulationRule::default());
//! let game = service.create_game(phillies, rockies)?;
//! let status = service.get_game(game)?;
//! assert_eq!(*status.version(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod config;
mod db;
mod error;
mod game;
mod roster;
mod service;
mod store;

// Crate-level exports - Errors
pub use error::{EntityKind, GameError};

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, DATABASE_ENV, HOST_ENV, PORT_ENV};

// Crate-level exports - Game model
pub use game::{
    ActionId, ActionLog, ActionNode, ActionRecord, ActionSubmission, BattingSlot,
    Directive, FieldingPosition, Game, GameId, GamePhase, GameStatus, HalfInning, Lineup,
    LineupDefinition, LineupEntry, MAX_RESULT_DEPTH, OutcomeCode, Participant, PlayOrder,
    RegulationRule, Role, Score, Scoreboard, Scorebook, Side, Strategies, ValidatedAction,
};

// Crate-level exports - Roster directory
pub use roster::{
    Handedness, InMemoryRoster, Player, PlayerId, PlayerProfile, RosterFile, RosterResolver,
    Team, TeamId, TeamProfile, TeamSeed,
};

// Crate-level exports - Persistence
pub use db::{MIGRATIONS, SqliteRepository};
pub use store::{GameRecord, GameStore, InMemoryStore, Mutation, StoreError};

// Crate-level exports - Service and HTTP
pub use api::{ApiError, CreatedGame, GameDefinition, VersionQuery, router};
pub use service::GameService;
