//! Moves and the reasons a move can be refused.

use crate::position::Position;
use crate::types::Mark;
use serde::{Deserialize, Serialize};

/// A mark placed at a board index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// The mark that was placed.
    pub mark: Mark,
    /// Board index (0-8).
    pub index: usize,
}

impl Move {
    /// Named position of this move.
    pub fn position(&self) -> Option<Position> {
        Position::from_index(self.index)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position() {
            Some(pos) => write!(f, "{} -> {}", self.mark, pos.label()),
            None => write!(f, "{} -> {}", self.mark, self.index),
        }
    }
}

/// Why a move was not applied.
///
/// None of these are fatal: the controller reports them and leaves the game
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Position {} is off the board", _0)]
    OutOfRange(usize),

    /// The square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The game has finished.
    #[display("Game is already over")]
    GameOver,

    /// It is the other mark's turn.
    #[display("It's not {}'s turn", _0)]
    OutOfTurn(Mark),

    /// A deferred computer move outlived the game it was scheduled for.
    #[display("Move ticket from generation {} is stale (current {})", issued, current)]
    StaleGeneration {
        /// Generation the ticket was issued for.
        issued: u64,
        /// Generation of the game now in play.
        current: u64,
    },

    /// No empty square is left to choose from.
    #[display("No move available")]
    NoMoveAvailable,
}

impl std::error::Error for MoveError {}
