//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::game::RegulationRule;

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "CARDBALL_DATABASE";
/// Environment variable overriding the bind host.
pub const HOST_ENV: &str = "CARDBALL_HOST";
/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "CARDBALL_PORT";

/// Server and rules configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Address to bind the HTTP server to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind the HTTP server to.
    #[serde(default = "default_port")]
    port: u16,

    /// When games end and whether they close.
    #[serde(default)]
    regulation: RegulationRule,
}

#[instrument]
fn default_database_path() -> String {
    "cardball.db".to_string()
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: default_host(),
            port: default_port(),
            regulation: RegulationRule::default(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::parse(&content)?;
        info!(database = %config.database_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise defaults, then applies
    /// `CARDBALL_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is malformed or an override is
    /// not valid.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the port override is not a number.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATABASE_ENV) {
            debug!(database = %path, "Database path overridden");
            self.database_path = path;
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port.parse().map_err(|_| {
                warn!(port = %port, "Invalid port override");
                ConfigError::new(format!("{} is not a valid port: '{}'", PORT_ENV, port))
            })?;
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
