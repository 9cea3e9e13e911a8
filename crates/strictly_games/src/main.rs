//! Strictly Games - unified CLI

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use strictly_games::{Cli, Command, PlayArgs, SessionConfig, Timings, run_play};
use strictly_tictactoe::{Difficulty, GameController, GameSession, JsonFileStore, StatsTracker};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the board output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Play(args) => run_game(config, args).await,
        Command::Stats { reset, stats_file } => show_stats(&config, stats_file, reset),
    }
}

/// Applies command-line overrides on top of the file configuration.
fn apply_overrides(mut config: SessionConfig, args: PlayArgs) -> SessionConfig {
    if let Some(tier) = args.difficulty {
        config = config.with_difficulty(Difficulty::parse_or_default(&tier));
    }
    if let Some(path) = args.stats_file {
        config = config.with_stats_path(path);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(ms) = args.think_ms {
        config = config.with_think_delay_ms(ms);
    }
    if let Some(ms) = args.restart_ms {
        config = config.with_restart_delay_ms(ms);
    }
    config
}

/// Run an interactive game in the terminal
#[instrument(skip_all)]
async fn run_game(config: SessionConfig, args: PlayArgs) -> Result<()> {
    let config = apply_overrides(config, args);
    info!(
        difficulty = %config.difficulty(),
        stats_path = %config.stats_path().display(),
        "Starting terminal game"
    );

    let controller = match config.seed() {
        Some(seed) => GameController::with_seed(*config.difficulty(), *seed),
        None => GameController::new(*config.difficulty()),
    };
    let tracker = StatsTracker::load(JsonFileStore::open(config.stats_path()));
    let session = GameSession::new(controller, tracker);
    let timings = Timings::new(config.think_delay(), config.restart_delay());

    let session = run_play(session, timings).await?;
    println!("{}", session.stats());
    Ok(())
}

/// Print (or zero) the persisted counters
#[instrument(skip(config))]
fn show_stats(config: &SessionConfig, stats_file: Option<PathBuf>, reset: bool) -> Result<()> {
    let path = stats_file.unwrap_or_else(|| config.stats_path().clone());
    let mut tracker = StatsTracker::load(JsonFileStore::open(&path));

    if reset {
        tracker.clear();
        info!(path = %path.display(), "Stats cleared");
    }

    print_stats(&path, &tracker);
    Ok(())
}

fn print_stats(path: &Path, tracker: &StatsTracker<JsonFileStore>) {
    let stats = tracker.stats();
    println!("Stats file: {}", path.display());
    println!("  Played:   {}", stats.played());
    println!("  Won:      {}", stats.won());
    println!("  Lost:     {}", stats.lost());
    println!("  Draws:    {}", stats.draws());
    println!("  Win rate: {}%", stats.win_rate_display());
}
