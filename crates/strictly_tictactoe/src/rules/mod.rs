//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board storage
//! so the controller and the search share one definition of "game over".

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WIN_LINES, WinLine, check_winner};

use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Evaluation {
    /// Moves remain and nobody has three in a row.
    Ongoing,
    /// `mark` completed `line`.
    Win {
        /// The winning mark.
        mark: Mark,
        /// The completed line.
        line: WinLine,
    },
    /// Board is full without a winner.
    Draw,
}

impl Evaluation {
    /// True for wins and draws.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Evaluation::Ongoing)
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Evaluation::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

/// Evaluates the board.
///
/// Lines are scanned in the fixed order of [`WIN_LINES`]; the first complete
/// line decides the winner.
pub fn evaluate(board: &Board) -> Evaluation {
    if let Some((mark, line)) = check_winner(board) {
        Evaluation::Win { mark, line }
    } else if is_full(board) {
        Evaluation::Draw
    } else {
        Evaluation::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_ongoing() {
        assert_eq!(evaluate(&Board::new()), Evaluation::Ongoing);
        assert!(!Evaluation::Ongoing.is_terminal());
    }

    #[test]
    fn test_win_reports_line() {
        let mut board = Board::new();
        let moves = [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)];
        for (index, mark) in moves {
            board.place(index, mark).unwrap();
        }
        assert_eq!(
            evaluate(&board),
            Evaluation::Win {
                mark: Mark::X,
                line: [0, 1, 2]
            }
        );
    }
}
