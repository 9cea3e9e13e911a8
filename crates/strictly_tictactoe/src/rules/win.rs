//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Mark, Square};
use tracing::instrument;

/// Three board indices that win when they hold the same mark.
pub type WinLine = [usize; 3];

/// Every winning line: rows, then columns, then diagonals.
pub const WIN_LINES: [WinLine; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the board.
///
/// Returns the mark and the first line (in [`WIN_LINES`] order) it completed.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<(Mark, WinLine)> {
    let squares = board.squares();
    WIN_LINES.iter().find_map(|&[a, b, c]| match squares[a] {
        Square::Occupied(mark) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some((mark, [a, b, c]))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.place(0, Mark::X).unwrap();
        board.place(1, Mark::X).unwrap();
        board.place(2, Mark::X).unwrap();
        assert_eq!(check_winner(&board), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let mut board = Board::new();
        board.place(2, Mark::O).unwrap();
        board.place(4, Mark::O).unwrap();
        board.place(6, Mark::O).unwrap();
        assert_eq!(check_winner(&board), Some((Mark::O, [2, 4, 6])));
    }

    #[test]
    fn test_winner_column() {
        let mut board = Board::new();
        board.place(1, Mark::O).unwrap();
        board.place(4, Mark::O).unwrap();
        board.place(7, Mark::O).unwrap();
        assert_eq!(check_winner(&board), Some((Mark::O, [1, 4, 7])));
    }

    #[test]
    fn test_no_winner_mixed_line() {
        let mut board = Board::new();
        board.place(0, Mark::X).unwrap();
        board.place(1, Mark::X).unwrap();
        board.place(2, Mark::O).unwrap();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // X holds both the top row and the left column.
        let mut board = Board::new();
        for index in [0, 1, 2, 3, 6] {
            board.place(index, Mark::X).unwrap();
        }
        assert_eq!(check_winner(&board), Some((Mark::X, [0, 1, 2])));
    }
}
