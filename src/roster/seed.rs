//! Roster seed files.
//!
//! A seed file lists teams and their players in TOML:
//!
//! ```toml
//! [[teams]]
//! city = "Colorado"
//! name = "Rockies"
//! owner_first_name = "Ned"
//! owner_last_name = "Gladstone"
//!
//! [[teams.players]]
//! first_name = "Todd"
//! last_name = "Helton"
//! season = 2003
//! primary_position = 3
//! bats = "L"
//! throws = "L"
//! batting_average = 358
//! ```

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use super::{PlayerProfile, TeamProfile};
use crate::config::ConfigError;

/// One team entry of a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TeamSeed {
    #[serde(flatten)]
    profile: TeamProfile,
    #[serde(default)]
    players: Vec<PlayerProfile>,
}

/// Parsed roster seed file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct RosterFile {
    #[serde(default)]
    teams: Vec<TeamSeed>,
}

impl RosterFile {
    /// Parses a seed file from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not a valid roster.
    #[instrument(skip(content), fields(len = content.len()))]
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse roster: {}", e)))?;
        debug!(teams = file.teams.len(), "Roster parsed");
        Ok(file)
    }

    /// Loads a seed file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read roster file: {}", e)))?;
        let file = Self::parse(&content)?;
        info!(teams = file.teams.len(), "Roster file loaded");
        Ok(file)
    }
}
