//! Strictly Games - terminal tic-tac-toe
//!
//! Wraps the [`strictly_tictactoe`] engine with a TOML configuration layer,
//! a tokio orchestrator that paces the computer's replies, and a line-based
//! terminal front end.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod terminal;

pub use cli::{Cli, Command, PlayArgs};
pub use config::{ConfigError, SessionConfig};
pub use orchestrator::{Command as GameCommand, GameEvent, Orchestrator, Timings};
pub use terminal::{Input, parse_line, render_event, run_play};
