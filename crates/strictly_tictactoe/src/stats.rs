//! Session statistics: games played, won and lost, persisted between runs.

use crate::outcome::GameOutcome;
use crate::store::StatsStore;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Store key for the games-played counter.
pub const PLAYED_KEY: &str = "ttt-played";
/// Store key for the games-won counter.
pub const WON_KEY: &str = "ttt-won";
/// Store key for the games-lost counter.
pub const LOST_KEY: &str = "ttt-lost";

/// Win/loss counters from the human's perspective.
///
/// Draws are whatever is left over: `won + lost <= played`.
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
    Getters,
    derive_new::new,
)]
pub struct SessionStats {
    played: u64,
    won: u64,
    lost: u64,
}

impl SessionStats {
    /// Games that ended without a winner.
    pub fn draws(&self) -> u64 {
        self.played.saturating_sub(self.won.saturating_add(self.lost))
    }

    /// Calculates win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            (self.won as f64 / self.played as f64) * 100.0
        }
    }

    /// Win rate with one decimal place, e.g. `"75.0"`.
    pub fn win_rate_display(&self) -> String {
        format!("{:.1}", self.win_rate())
    }

    /// Counts one finished game.
    ///
    /// Returns `false`, leaving the counters as they were, once `played`
    /// has reached `u64::MAX`.
    pub fn record(&mut self, outcome: GameOutcome) -> bool {
        let Some(played) = self.played.checked_add(1) else {
            return false;
        };
        self.played = played;
        match outcome {
            GameOutcome::Win => self.won = self.won.saturating_add(1),
            GameOutcome::Loss => self.lost = self.lost.saturating_add(1),
            GameOutcome::Draw => {}
        }
        true
    }
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Played {} | Won {} | Lost {} | Win rate {}%",
            self.played,
            self.won,
            self.lost,
            self.win_rate_display()
        )
    }
}

/// Owns the counters and keeps them in sync with a [`StatsStore`].
#[derive(Debug, Clone)]
pub struct StatsTracker<S> {
    store: S,
    stats: SessionStats,
}

impl<S: StatsStore> StatsTracker<S> {
    /// Loads the counters from `store`.
    ///
    /// Missing or non-numeric values count as 0. Counters where wins and
    /// losses exceed games played are repaired by raising `played`; if wins
    /// plus losses does not fit in a `u64`, both are treated as corrupted and
    /// reset to 0.
    #[instrument(skip(store))]
    pub fn load(store: S) -> Self {
        let played = read_counter(&store, PLAYED_KEY);
        let won = read_counter(&store, WON_KEY);
        let lost = read_counter(&store, LOST_KEY);

        let stats = match won.checked_add(lost) {
            None => {
                warn!(played, won, lost, "Stored wins and losses overflow, resetting them");
                SessionStats::new(played, 0, 0)
            }
            Some(decided) if decided > played => {
                warn!(played, won, lost, "Stored wins and losses exceed games played, repairing");
                SessionStats::new(decided, won, lost)
            }
            Some(_) => SessionStats::new(played, won, lost),
        };
        info!(%stats, "Stats loaded");
        Self { store, stats }
    }

    /// Current counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Counts a finished game and persists the counters.
    #[instrument(skip(self))]
    pub fn record_outcome(&mut self, outcome: GameOutcome) -> SessionStats {
        if !self.stats.record(outcome) {
            warn!(%outcome, stats = %self.stats, "Played counter is full, outcome not counted");
            return self.stats;
        }
        info!(%outcome, stats = %self.stats, "Outcome recorded");
        self.persist();
        self.stats
    }

    /// Zeroes every counter and persists the result.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.stats = SessionStats::default();
        info!("Stats cleared");
        self.persist();
    }

    /// Writes all three counters. Failures are logged; the in-memory
    /// counters stay authoritative for the rest of the session.
    fn persist(&mut self) {
        let entries = [
            (PLAYED_KEY, self.stats.played),
            (WON_KEY, self.stats.won),
            (LOST_KEY, self.stats.lost),
        ];
        for (key, value) in entries {
            if let Err(e) = self.store.write(key, &value.to_string()) {
                warn!(key, error = %e, "Failed to persist counter");
            }
        }
    }
}

fn read_counter<S: StatsStore>(store: &S, key: &str) -> u64 {
    match store.read(key) {
        None => {
            debug!(key, "Counter missing, defaulting to 0");
            0
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Counter is not a non-negative integer, defaulting to 0");
            0
        }),
    }
}
