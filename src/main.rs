//! tictacterm - terminal tic-tac-toe
//!
//! Reads the configuration, takes over the terminal and plays one game.

#![warn(missing_docs)]

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use ratatui::DefaultTerminal;
use tictacterm::{
    CliRenderer, ConfigRegistry, GameConfig, InputRegistry, Session, USERS_AMOUNT,
    enter_terminal, restore_terminal, shutdown_signal, spawn_keyboard_reader,
};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut registry = ConfigRegistry::new();
    if let Some(path) = &cli.config {
        registry
            .load_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    match cli.command {
        Command::Play { players } => {
            if let Some(players) = players {
                registry.set_var(USERS_AMOUNT, &players.to_string());
            }
            let config = GameConfig::from_registry(&mut registry).context("Invalid configuration")?;
            play(&config).await
        }
        Command::ShowConfig => {
            let config = GameConfig::from_registry(&mut registry).context("Invalid configuration")?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Sends logs to a file so they never reach the game screen.
fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

/// Plays one game on the terminal.
#[instrument(skip_all, fields(players = config.players()))]
async fn play(config: &GameConfig) -> Result<()> {
    info!("Starting tictacterm");

    let terminal = enter_terminal().context("Failed to set up the terminal")?;
    let result = run_game(config, terminal).await;
    restore_terminal();

    match result {
        Ok(summary) => {
            println!("{summary}");
            Ok(())
        }
        Err(err) => {
            error!(error = ?err, "Game failed");
            Err(err)
        }
    }
}

async fn run_game(config: &GameConfig, terminal: DefaultTerminal) -> Result<String> {
    let mut inputs = InputRegistry::new();
    let mut session = Session::start(config, &mut inputs, CliRenderer::new(terminal))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let reader = spawn_keyboard_reader(inputs, tx);

    let outcome = tokio::select! {
        outcome = session.run(&mut rx) => Some(outcome),
        signal = shutdown_signal() => {
            info!(signal, "Shutdown signal received");
            None
        }
    };
    drop(rx);
    reader.stop().await?;

    let Some(outcome) = outcome else {
        return Ok("Game interrupted.".to_string());
    };
    let phase = outcome?;
    let summary = match session.state().winner() {
        Some(winner) => format!("Player {} ({}) won.", winner + 1, tictacterm::symbol(winner)),
        None => format!("Game ended: {phase}."),
    };
    Ok(summary)
}
