//! Cardball - unified CLI
//!
//! Runs the HTTP server and the database maintenance commands.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use cardball::{AppConfig, GameId, GameService, RosterFile, SqliteRepository, router};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cardball=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Serve { port, host } => run_server(config, host, port).await,
        Command::Migrate => run_migrate(&config),
        Command::Seed { roster } => run_seed(&config, &roster),
        Command::Status { game } => run_status(config, game),
    }
}

/// Opens the configured database and brings its schema up to date.
fn open_repository(config: &AppConfig) -> Result<SqliteRepository> {
    let repo = SqliteRepository::new(config.database_path().clone())?;
    repo.run_migrations()?;
    Ok(repo)
}

/// Run the HTTP game server
#[instrument(skip(config))]
async fn run_server(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let repo = open_repository(&config)?;
    let service = GameService::new(repo.clone(), repo, *config.regulation());
    let app = router(service);

    let host = host.unwrap_or_else(|| config.host().clone());
    let port = port.unwrap_or(*config.port());
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    info!(host = %host, port, database = %config.database_path(), "Server ready");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Apply pending migrations
#[instrument(skip(config))]
fn run_migrate(config: &AppConfig) -> Result<()> {
    open_repository(config)?;
    info!(database = %config.database_path(), "Database is up to date");
    Ok(())
}

/// Load a roster file into the directory tables
#[instrument(skip(config), fields(roster = %roster.display()))]
fn run_seed(config: &AppConfig, roster: &std::path::Path) -> Result<()> {
    let file = RosterFile::from_file(roster)?;
    let repo = open_repository(config)?;
    let ids = repo.seed(&file)?;
    for team in repo.list_teams()? {
        if ids.contains(team.id()) {
            println!("{}\t{}\t{} players", team.id(), team.display_name(), team.players().len());
        }
    }
    Ok(())
}

/// Print one game or all games as JSON
#[instrument(skip(config))]
fn run_status(config: AppConfig, game: Option<i32>) -> Result<()> {
    let repo = open_repository(&config)?;
    let service = GameService::new(repo.clone(), repo, *config.regulation());
    let json = match game {
        Some(id) => serde_json::to_string_pretty(&service.get_game(GameId::from(id))?)?,
        None => serde_json::to_string_pretty(&service.list_games()?)?,
    };
    println!("{}", json);
    Ok(())
}
