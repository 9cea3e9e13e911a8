//! Line-based terminal front end.
//!
//! Reads commands from stdin, forwards them to the [`Orchestrator`] and
//! prints its events. Logging goes to stderr so it never interleaves with
//! the board.

use crate::orchestrator::{Command, GameEvent, Orchestrator, Timings};
use anyhow::Result;
use strictly_tictactoe::{GameSession, Position, StatsStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const HELP: &str = "\
Commands:
  0-8 or a square name (\"center\", \"top left\")  place your X
  r, reset                                       start a new game
  d, difficulty <easy|medium|hard|expert>        change opponent
  s, stats                                       show your record
  h, help                                        show this help
  q, quit                                        leave";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Forward to the orchestrator.
    Command(Command),
    /// Print [`HELP`].
    Help,
    /// Blank line.
    Empty,
    /// Anything unrecognized.
    Unknown(String),
}

/// Parses a line typed by the user.
///
/// Bare numbers are passed through unchecked so the engine reports
/// out-of-range squares itself.
pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Input::Command(Command::Quit),
        "r" | "reset" | "new" => Input::Command(Command::Reset),
        "s" | "stats" => Input::Command(Command::ShowStats),
        "h" | "help" | "?" => Input::Help,
        "d" | "difficulty" if !rest.is_empty() => {
            Input::Command(Command::SetDifficulty(rest.to_string()))
        }
        _ => {
            if let Ok(index) = line.parse::<usize>() {
                return Input::Command(Command::HumanMove(index));
            }
            match Position::from_label_or_number(line) {
                Some(position) => Input::Command(Command::HumanMove(position.index())),
                None => Input::Unknown(line.to_string()),
            }
        }
    }
}

/// Text to print for an event, if any.
pub fn render_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::StateChanged { board, status } => Some(format!("\n{}\n\n{}", board, status)),
        GameEvent::MoveMade { mark, position } => Some(format!("{} takes {}", mark, position)),
        GameEvent::MoveRejected(reason) => Some(format!("Move rejected: {}", reason)),
        GameEvent::GameOver { line, stats, .. } => {
            let line = line
                .map(|[a, b, c]| format!(" (line {}-{}-{})", a, b, c))
                .unwrap_or_default();
            Some(format!("Game over{}. {}", line, stats))
        }
        GameEvent::DifficultyChanged(difficulty) => Some(format!("Difficulty: {}", difficulty)),
        GameEvent::Restarted => Some("New game.".to_string()),
        GameEvent::Stats(stats) => Some(stats.to_string()),
    }
}

/// Plays in the terminal until the user quits or stdin closes.
///
/// Returns the session so the caller can inspect the final counters.
#[instrument(skip_all)]
pub async fn run_play<S>(session: GameSession<S>, timings: Timings) -> Result<GameSession<S>>
where
    S: StatsStore + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    println!("Tic-Tac-Toe: you are X. Type 'help' for commands.");
    println!("Difficulty: {}", session.state().difficulty());

    let orchestrator = Orchestrator::new(session, timings, command_rx, event_tx);
    let game = tokio::spawn(orchestrator.run());

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Some(text) = render_event(&event) {
                println!("{}", text);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Input::Command(command) => {
                let quit = command == Command::Quit;
                if command_tx.send(command).is_err() {
                    warn!("Game loop stopped unexpectedly");
                    break;
                }
                if quit {
                    break;
                }
            }
            Input::Help => println!("{}", HELP),
            Input::Empty => {}
            Input::Unknown(text) => {
                debug!(input = %text, "Unrecognized input");
                println!("Unrecognized input '{}'. Type 'help' for commands.", text);
            }
        }
    }
    drop(command_tx);

    let session = game.await?;
    printer.await?;
    info!(stats = %session.stats(), "Terminal session ended");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_tictactoe::{Board, GameOutcome, SessionStats};

    #[test]
    fn test_parse_moves() {
        assert_eq!(parse_line("4"), Input::Command(Command::HumanMove(4)));
        assert_eq!(parse_line(" 12 "), Input::Command(Command::HumanMove(12)));
        assert_eq!(parse_line("top left"), Input::Command(Command::HumanMove(0)));
        assert_eq!(parse_line("Center"), Input::Command(Command::HumanMove(4)));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("q"), Input::Command(Command::Quit));
        assert_eq!(parse_line("RESET"), Input::Command(Command::Reset));
        assert_eq!(parse_line("stats"), Input::Command(Command::ShowStats));
        assert_eq!(
            parse_line("d medium"),
            Input::Command(Command::SetDifficulty("medium".to_string()))
        );
        assert_eq!(parse_line("help"), Input::Help);
        assert_eq!(parse_line("   "), Input::Empty);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_line("difficulty"), Input::Unknown("difficulty".to_string()));
        assert_eq!(parse_line("castle"), Input::Unknown("castle".to_string()));
    }

    #[test]
    fn test_render_game_over_with_line() {
        let event = GameEvent::GameOver {
            outcome: GameOutcome::Loss,
            line: Some([2, 4, 6]),
            stats: SessionStats::new(1, 0, 1),
        };
        let text = render_event(&event).unwrap();
        assert!(text.starts_with("Game over (line 2-4-6)."));
    }

    #[test]
    fn test_render_state_includes_status() {
        let event = GameEvent::StateChanged {
            board: Board::new(),
            status: "Your Turn",
        };
        let text = render_event(&event).unwrap();
        assert!(text.contains("0|1|2"));
        assert!(text.ends_with("Your Turn"));
    }
}
