//! Tic-tac-toe against a minimax opponent.
//!
//! # Architecture
//!
//! - **Board** ([`Board`], [`rules`]): nine squares, win and draw detection
//! - **Search** ([`best_move`]): exhaustive minimax with an optional depth bound
//! - **Difficulty** ([`Difficulty`]): maps a tier to a move-selection strategy
//! - **Controller** ([`GameController`]): turn-taking state machine with
//!   generation-stamped tickets for deferred computer moves
//! - **Stats** ([`StatsTracker`]): played/won/lost counters kept in a
//!   [`StatsStore`]
//!
//! # Example
//!
//! ```
//! use strictly_tictactoe::{GameSession, MemoryStore, Transition};
//!
//! let mut session = GameSession::with_store(MemoryStore::new());
//! session.set_difficulty("expert");
//!
//! if let Transition::AwaitingComputer { ticket, .. } = session.report_human_move(4) {
//!     // A caller would normally wait a moment before replying.
//!     session.computer_move(ticket);
//! }
//! assert_eq!(session.state().board().empty_indices().len(), 7);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod controller;
mod difficulty;
mod outcome;
mod position;
pub mod rules;
mod search;
mod session;
mod stats;
mod store;
mod types;

pub use action::{Move, MoveError};
pub use controller::{Activity, GameController, GameState, MoveTicket, Transition};
pub use difficulty::{Difficulty, HARD_SEARCH_PROBABILITY, MEDIUM_DEPTH, Strategy, random_move};
pub use outcome::GameOutcome;
pub use position::Position;
pub use rules::{Evaluation, WIN_LINES, WinLine};
pub use search::{
    DRAW_SCORE, DepthLimit, LOSS_SCORE, SearchReport, WIN_SCORE, best_move, position_score,
};
pub use session::GameSession;
pub use stats::{LOST_KEY, PLAYED_KEY, SessionStats, StatsTracker, WON_KEY};
pub use store::{JsonFileStore, MemoryStore, StatsStore, StoreError};
pub use types::{BOARD_SIZE, Board, Mark, Square};
