//! Minimax search for the computer opponent.
//!
//! The search is exhaustive: every empty square is tried at every ply, with
//! no pruning and no memoization. Scores are fixed per outcome and do not
//! depend on how deep the outcome was found, so the engine does not prefer
//! quick wins over slow ones. Unbounded search never loses.

use crate::rules::Evaluation;
use crate::types::{Board, Mark};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Score of a finished game won by the searching side.
pub const WIN_SCORE: i32 = 10;
/// Score of a finished game lost by the searching side.
pub const LOSS_SCORE: i32 = -10;
/// Score of a draw, and of any position cut off by the depth bound.
pub const DRAW_SCORE: i32 = 0;

/// How many plies below the root the search may look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthLimit {
    /// Stop at this depth and score the position as a draw.
    Bounded(u32),
    /// Search to the end of the game.
    Unbounded,
}

impl DepthLimit {
    fn reached(self, depth: u32) -> bool {
        match self {
            DepthLimit::Bounded(limit) => depth >= limit,
            DepthLimit::Unbounded => false,
        }
    }
}

impl std::fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthLimit::Bounded(limit) => write!(f, "{limit}"),
            DepthLimit::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// The move chosen by [`best_move`] and what it cost to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SearchReport {
    /// Chosen board index.
    index: usize,
    /// Minimax score of the chosen move for the searching side.
    score: i32,
    /// Positions visited.
    nodes: u64,
}

struct Search {
    me: Mark,
    limit: DepthLimit,
    nodes: u64,
}

impl Search {
    fn new(me: Mark, limit: DepthLimit) -> Self {
        Self { me, limit, nodes: 0 }
    }

    /// Scores `board` for `self.me`; `maximizing` is true when `self.me` moves next.
    fn minimax(&mut self, board: &mut Board, depth: u32, maximizing: bool) -> i32 {
        self.nodes += 1;

        match board.evaluate() {
            Evaluation::Win { mark, .. } if mark == self.me => return WIN_SCORE,
            Evaluation::Win { .. } => return LOSS_SCORE,
            Evaluation::Draw => return DRAW_SCORE,
            Evaluation::Ongoing => {}
        }

        if self.limit.reached(depth) {
            return DRAW_SCORE;
        }

        let mark = if maximizing { self.me } else { self.me.opponent() };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for index in board.empty_indices() {
            if board.place(index, mark).is_err() {
                continue;
            }
            let score = self.minimax(board, depth + 1, !maximizing);
            board.clear(index);

            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        best
    }
}

/// Finds the best square for `me`.
///
/// Each empty square is tried in ascending order and scored with the
/// opponent to move at depth 0. The first square reaching the highest score
/// wins ties. Returns `None` when the board has no empty square.
#[instrument(skip(board), fields(empty = board.empty_indices().len()))]
pub fn best_move(board: &Board, me: Mark, limit: DepthLimit) -> Option<SearchReport> {
    let mut scratch = board.clone();
    let mut search = Search::new(me, limit);
    let mut best: Option<(usize, i32)> = None;

    for index in board.empty_indices() {
        if scratch.place(index, me).is_err() {
            continue;
        }
        let score = search.minimax(&mut scratch, 0, false);
        scratch.clear(index);

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    let (index, score) = best?;
    debug!(index, score, nodes = search.nodes, "Search complete");
    Some(SearchReport {
        index,
        score,
        nodes: search.nodes,
    })
}

/// Minimax value of `board` for `me` when `to_move` plays next.
///
/// Terminal boards score immediately; otherwise this is the value the
/// search assigns at depth 0.
pub fn position_score(board: &Board, me: Mark, to_move: Mark, limit: DepthLimit) -> i32 {
    let mut scratch = board.clone();
    Search::new(me, limit).minimax(&mut scratch, 0, to_move == me)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(x: &[usize], o: &[usize]) -> Board {
        let mut board = Board::new();
        for &index in x {
            board.place(index, Mark::X).unwrap();
        }
        for &index in o {
            board.place(index, Mark::O).unwrap();
        }
        board
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = board_with(&[0, 2, 4, 5, 7], &[1, 3, 6, 8]);
        assert_eq!(best_move(&board, Mark::O, DepthLimit::Unbounded), None);
    }

    #[test]
    fn test_takes_immediate_win() {
        // X threatens 6 along the bottom row, O can win at 5 first.
        let board = board_with(&[0, 7, 8], &[3, 4]);
        let report = best_move(&board, Mark::O, DepthLimit::Unbounded).unwrap();
        assert_eq!(*report.index(), 5);
        assert_eq!(*report.score(), WIN_SCORE);
    }

    #[test]
    fn test_blocks_immediate_threat() {
        let board = board_with(&[0, 1], &[4]);
        let report = best_move(&board, Mark::O, DepthLimit::Unbounded).unwrap();
        assert_eq!(*report.index(), 2);
    }

    #[test]
    fn test_depth_two_still_sees_the_win() {
        let board = board_with(&[0, 7, 8], &[3, 4]);
        let report = best_move(&board, Mark::O, DepthLimit::Bounded(2)).unwrap();
        assert_eq!(*report.index(), 5);
    }

    #[test]
    fn test_depth_zero_picks_first_empty_square() {
        // With no lookahead every non-winning move scores as a draw.
        let board = board_with(&[4], &[]);
        let report = best_move(&board, Mark::O, DepthLimit::Bounded(0)).unwrap();
        assert_eq!(*report.index(), 0);
        assert_eq!(*report.score(), DRAW_SCORE);
    }

    #[test]
    fn test_corner_opening_answered_by_center() {
        let board = board_with(&[0], &[]);
        let report = best_move(&board, Mark::O, DepthLimit::Unbounded).unwrap();
        assert_eq!(*report.index(), 4);
        assert_eq!(*report.score(), DRAW_SCORE);
    }

    #[test]
    fn test_position_score_terminal() {
        let board = board_with(&[0, 1, 2], &[3, 4]);
        assert_eq!(position_score(&board, Mark::O, Mark::O, DepthLimit::Unbounded), LOSS_SCORE);
        assert_eq!(position_score(&board, Mark::X, Mark::O, DepthLimit::Unbounded), WIN_SCORE);
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let board = board_with(&[0, 8], &[4]);
        let before = board.clone();
        let _ = best_move(&board, Mark::O, DepthLimit::Unbounded);
        assert_eq!(board, before);
    }
}
