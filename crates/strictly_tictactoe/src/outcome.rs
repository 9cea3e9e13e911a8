//! Finished-game outcomes seen from the human's side of the board.

use crate::rules::Evaluation;
use crate::types::Mark;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Game outcome from the human player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// The human won.
    Win,
    /// The computer won.
    Loss,
    /// Nobody won.
    Draw,
}

impl GameOutcome {
    /// Maps a terminal evaluation onto the human's result; `None` while the
    /// game is still ongoing.
    #[instrument(level = "trace")]
    pub fn from_evaluation(evaluation: Evaluation, human: Mark) -> Option<Self> {
        match evaluation {
            Evaluation::Ongoing => None,
            Evaluation::Draw => Some(Self::Draw),
            Evaluation::Win { mark, .. } if mark == human => Some(Self::Win),
            Evaluation::Win { .. } => Some(Self::Loss),
        }
    }

    /// Stable lowercase name (`"win"`, `"loss"`, `"draw"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }

    /// Status line shown when a game ends this way.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Win => "You Win!",
            Self::Loss => "AI Wins!",
            Self::Draw => "It's a Draw!",
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_evaluation_human_perspective() {
        let human_win = Evaluation::Win {
            mark: Mark::X,
            line: [0, 1, 2],
        };
        let computer_win = Evaluation::Win {
            mark: Mark::O,
            line: [2, 4, 6],
        };
        assert_eq!(
            GameOutcome::from_evaluation(human_win, Mark::X),
            Some(GameOutcome::Win)
        );
        assert_eq!(
            GameOutcome::from_evaluation(computer_win, Mark::X),
            Some(GameOutcome::Loss)
        );
        assert_eq!(
            GameOutcome::from_evaluation(Evaluation::Draw, Mark::X),
            Some(GameOutcome::Draw)
        );
        assert_eq!(GameOutcome::from_evaluation(Evaluation::Ongoing, Mark::X), None);
    }
}
