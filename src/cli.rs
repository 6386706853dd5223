//! Command-line interface for tictacterm.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tictacterm - tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "tictacterm")]
#[command(about = "Tic-tac-toe in the terminal for 2 to 10 players", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with a [vars] table of configuration variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// File receiving the log output
    #[arg(long, default_value = "tictacterm.log", global = true)]
    pub log_file: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game
    Play {
        /// Number of players, overrides users_amount
        #[arg(short, long)]
        players: Option<usize>,
    },

    /// Print the resolved configuration as TOML
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_with_players() {
        let cli = Cli::try_parse_from(["tictacterm", "play", "--players", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Play { players: Some(3) }));
        assert_eq!(cli.log_file, PathBuf::from("tictacterm.log"));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["tictacterm", "show-config", "--config", "game.toml"])
            .unwrap();
        assert!(matches!(cli.command, Command::ShowConfig));
        assert_eq!(cli.config, Some(PathBuf::from("game.toml")));
    }
}
