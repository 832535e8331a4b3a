//! Command-line interface for cardball.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cardball - baseball game recorder with a REST interface
#[derive(Parser, Debug)]
#[command(name = "cardball")]
#[command(about = "Records lineups, strategies and plays for baseball games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults are used if it is missing)
    #[arg(short, long, global = true, default_value = "cardball.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to, overriding the configuration
        #[arg(long)]
        host: Option<String>,
    },

    /// Apply pending database migrations
    Migrate,

    /// Load teams and players from a roster file
    Seed {
        /// TOML roster file with [[teams]] and [[teams.players]] tables
        #[arg(short, long)]
        roster: PathBuf,
    },

    /// Print game status as JSON
    Status {
        /// Game id; all games are listed if omitted
        #[arg(short, long)]
        game: Option<i32>,
    },
}
