//! Command-line interface for strictly_games.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Games - tic-tac-toe against a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_games")]
#[command(about = "Play tic-tac-toe against a minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the session configuration file
    #[arg(short, long, global = true, default_value = "strictly_games.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play(PlayArgs),

    /// Show persisted statistics
    Stats {
        /// Zero all counters
        #[arg(long)]
        reset: bool,

        /// Stats file (overrides the config file)
        #[arg(long)]
        stats_file: Option<PathBuf>,
    },
}

/// Options for `play`; each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Opponent strength: easy, medium, hard or expert
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Stats file
    #[arg(long)]
    pub stats_file: Option<PathBuf>,

    /// Seed for the opponent's random choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause before the computer answers, in milliseconds
    #[arg(long)]
    pub think_ms: Option<u64>,

    /// Pause before a finished game is cleared, in milliseconds
    #[arg(long)]
    pub restart_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_overrides() {
        let cli = Cli::try_parse_from([
            "strictly_games",
            "play",
            "--difficulty",
            "hard",
            "--seed",
            "4",
            "--think-ms",
            "0",
        ])
        .unwrap();
        match cli.command {
            Command::Play(args) => {
                assert_eq!(args.difficulty.as_deref(), Some("hard"));
                assert_eq!(args.seed, Some(4));
                assert_eq!(args.think_ms, Some(0));
                assert_eq!(args.restart_ms, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("strictly_games.toml"));
    }

    #[test]
    fn test_parse_stats_reset() {
        let cli = Cli::try_parse_from(["strictly_games", "stats", "--reset", "-c", "x.toml"])
            .unwrap();
        assert!(matches!(cli.command, Command::Stats { reset: true, .. }));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }
}
