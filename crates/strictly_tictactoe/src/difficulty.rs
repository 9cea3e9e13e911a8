//! Difficulty tiers and how each one picks the computer's move.

use crate::search::{self, DepthLimit};
use crate::types::{Board, Mark};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// Probability that [`Difficulty::Hard`] plays the searched move.
pub const HARD_SEARCH_PROBABILITY: f64 = 0.8;

/// Depth bound used by [`Difficulty::Medium`].
pub const MEDIUM_DEPTH: u32 = 2;

/// Named strength of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random empty square.
    Easy,
    /// Minimax looking two plies past the candidate move.
    Medium,
    /// Perfect play most of the time, a random square otherwise.
    Hard,
    /// Perfect play.
    #[default]
    Expert,
}

/// How a move is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Uniform choice among empty squares.
    Random,
    /// Minimax with the given bound.
    Search(DepthLimit),
    /// Minimax with probability `search_probability`, random otherwise.
    Mixed {
        /// Chance of searching instead of picking at random.
        search_probability: f64,
        /// Bound used when searching.
        limit: DepthLimit,
    },
}

impl Difficulty {
    /// Parses a tier name, falling back to [`Difficulty::Expert`] for
    /// anything unrecognized.
    #[instrument]
    pub fn parse_or_default(tier: &str) -> Self {
        Self::from_str(tier.trim()).unwrap_or_else(|_| {
            warn!(tier, "Unknown difficulty, using expert");
            Self::default()
        })
    }

    /// The move-selection strategy for this tier.
    pub fn strategy(self) -> Strategy {
        match self {
            Difficulty::Easy => Strategy::Random,
            Difficulty::Medium => Strategy::Search(DepthLimit::Bounded(MEDIUM_DEPTH)),
            Difficulty::Hard => Strategy::Mixed {
                search_probability: HARD_SEARCH_PROBABILITY,
                limit: DepthLimit::Unbounded,
            },
            Difficulty::Expert => Strategy::Search(DepthLimit::Unbounded),
        }
    }

    /// Picks a square for `mark`, or `None` if the board is full.
    #[instrument(skip(board, rng))]
    pub fn choose_move<R: Rng + ?Sized>(
        self,
        board: &Board,
        mark: Mark,
        rng: &mut R,
    ) -> Option<usize> {
        self.strategy().choose_move(board, mark, rng)
    }
}

impl Strategy {
    /// Picks a square for `mark`, or `None` if the board is full.
    pub fn choose_move<R: Rng + ?Sized>(
        self,
        board: &Board,
        mark: Mark,
        rng: &mut R,
    ) -> Option<usize> {
        match self {
            Strategy::Random => random_move(board, rng),
            Strategy::Search(limit) => search::best_move(board, mark, limit).map(|r| *r.index()),
            Strategy::Mixed {
                search_probability,
                limit,
            } => {
                if rng.gen_bool(search_probability) {
                    search::best_move(board, mark, limit).map(|r| *r.index())
                } else {
                    debug!("Mixed strategy fell back to a random move");
                    random_move(board, rng)
                }
            }
        }
    }
}

/// Uniformly random empty square.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.empty_indices().choose(rng).copied()
}
