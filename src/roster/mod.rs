//! Team and player directory.
//!
//! The game core only needs to turn ids into [`Team`]s and [`Player`]s and to
//! ask whether a player is on a team's roster. Anything that can answer those
//! questions implements [`RosterResolver`].

mod memory;
mod seed;
mod types;

pub use memory::InMemoryRoster;
pub use seed::{RosterFile, TeamSeed};
pub use types::{Handedness, Player, PlayerId, PlayerProfile, Team, TeamId, TeamProfile};

use crate::store::StoreError;

/// Resolves roster ids into teams and players.
///
/// Lookups have no side effects; a failed lookup leaves nothing behind.
pub trait RosterResolver: Send + Sync {
    /// Looks up a team, including its player list.
    fn team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;

    /// Looks up a single player.
    fn player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;
}
