//! Game state and event model.

mod action;
mod aggregate;
mod lineup;
mod scoring;
mod status;
mod strategy;
mod types;

pub use action::{
    ActionId, ActionLog, ActionNode, ActionRecord, ActionSubmission, MAX_RESULT_DEPTH,
    OutcomeCode, PlayOrder, ValidatedAction,
};
pub use aggregate::{Game, GamePhase, Scorebook};
pub use lineup::{Lineup, LineupDefinition, LineupEntry, Participant};
pub use scoring::{RegulationRule, Score, Scoreboard};
pub use status::GameStatus;
pub use strategy::{Directive, Strategies};
pub use types::{BattingSlot, FieldingPosition, GameId, HalfInning, Role, Side};
