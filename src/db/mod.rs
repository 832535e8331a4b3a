//! SQLite persistence for rosters and games.

mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use models::{GameRow, NewGameRow, NewPlayerRow, NewTeamRow, PlayerRow, TeamRow};
pub use repository::{MIGRATIONS, SqliteRepository};
