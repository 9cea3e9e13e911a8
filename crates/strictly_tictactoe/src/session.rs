//! The engine's outward interface: one game plus the persisted stats.

use crate::controller::{GameController, GameState, MoveTicket, Transition};
use crate::difficulty::Difficulty;
use crate::stats::{SessionStats, StatsTracker};
use crate::store::StatsStore;
use tracing::{debug, instrument};

/// A human-versus-computer session.
///
/// Wraps a [`GameController`] and records every finished game in a
/// [`StatsTracker`] before the caller sees the transition.
#[derive(Debug, Clone)]
pub struct GameSession<S> {
    controller: GameController,
    tracker: StatsTracker<S>,
}

impl<S: StatsStore> GameSession<S> {
    /// Creates a session from its parts.
    pub fn new(controller: GameController, tracker: StatsTracker<S>) -> Self {
        Self {
            controller,
            tracker,
        }
    }

    /// Expert-level session with stats loaded from `store`.
    pub fn with_store(store: S) -> Self {
        Self::new(
            GameController::new(Difficulty::default()),
            StatsTracker::load(store),
        )
    }

    /// The human clicked square `index`.
    #[instrument(skip(self))]
    pub fn report_human_move(&mut self, index: usize) -> Transition {
        let transition = self.controller.human_move(index);
        self.observe(&transition);
        transition
    }

    /// Plays a deferred computer move issued with `ticket`.
    #[instrument(skip(self))]
    pub fn computer_move(&mut self, ticket: MoveTicket) -> Transition {
        let transition = self.controller.computer_move(ticket);
        self.observe(&transition);
        transition
    }

    /// Plays the computer move for the game in play.
    pub fn request_computer_move(&mut self) -> Transition {
        let ticket = self.controller.ticket();
        self.computer_move(ticket)
    }

    /// Selects a tier by name; unknown names select expert.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, tier: &str) -> Difficulty {
        let difficulty = Difficulty::parse_or_default(tier);
        self.controller.set_difficulty(difficulty);
        difficulty
    }

    /// Starts a new game; pending computer moves become stale.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Current counters.
    pub fn stats(&self) -> SessionStats {
        self.tracker.stats()
    }

    /// Zeroes and persists the counters.
    pub fn clear_stats(&mut self) {
        self.tracker.clear();
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        self.controller.state()
    }

    /// Generation of the game in play.
    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    fn observe(&mut self, transition: &Transition) {
        if let Some(outcome) = transition.outcome() {
            debug!(%outcome, "Recording finished game");
            self.tracker.record_outcome(outcome);
        }
    }
}
