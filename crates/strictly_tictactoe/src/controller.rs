//! Turn-taking state machine for a human playing the computer.
//!
//! The controller exclusively owns the board. Every request that would
//! break a rule (wrong turn, occupied square, finished game, stale ticket)
//! leaves the state untouched and comes back as [`Transition::Ignored`].

use crate::action::{Move, MoveError};
use crate::difficulty::Difficulty;
use crate::outcome::GameOutcome;
use crate::rules::{Evaluation, WinLine};
use crate::types::{Board, Mark};
use derive_getters::Getters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Whether moves are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    /// Moves are accepted.
    Active,
    /// A win or draw has been reached.
    Finished,
}

/// Snapshot of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Mark that moves next.
    #[getter(copy)]
    current_mark: Mark,
    /// Active or finished.
    #[getter(copy)]
    activity: Activity,
    /// Tier used for the next computer turn.
    #[getter(copy)]
    difficulty: Difficulty,
    /// Latest board evaluation.
    #[getter(copy)]
    evaluation: Evaluation,
}

impl GameState {
    /// Empty board, human to move.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            current_mark: Mark::HUMAN,
            activity: Activity::Active,
            difficulty,
            evaluation: Evaluation::Ongoing,
        }
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        self.activity == Activity::Active
    }

    /// Result for the human once the game is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        GameOutcome::from_evaluation(self.evaluation, Mark::HUMAN)
    }

    /// Completed line, if the game was won.
    pub fn winning_line(&self) -> Option<WinLine> {
        match self.evaluation {
            Evaluation::Win { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Status line for display.
    pub fn status_message(&self) -> &'static str {
        match (self.outcome(), self.current_mark) {
            (Some(outcome), _) => outcome.message(),
            (None, Mark::X) => "Your Turn",
            (None, Mark::O) => "AI is thinking...",
        }
    }
}

/// Permission to play one computer move in a specific game.
///
/// Tickets are issued when the human's move hands the turn to the computer.
/// Resetting the controller starts a new generation, which voids every
/// ticket issued before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters)]
pub struct MoveTicket {
    generation: u64,
}

/// What a request did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Human move applied; the computer plays next.
    AwaitingComputer {
        /// The move just applied.
        applied: Move,
        /// Ticket for the computer's reply.
        ticket: MoveTicket,
    },
    /// Computer move applied; the human plays next.
    AwaitingHuman {
        /// The move just applied.
        applied: Move,
    },
    /// The move ended the game.
    Finished {
        /// The move just applied.
        applied: Move,
        /// Result for the human.
        outcome: GameOutcome,
        /// Completed line, if the game was won.
        line: Option<WinLine>,
    },
    /// Nothing changed.
    Ignored(MoveError),
}

impl Transition {
    /// The move applied, unless the request was ignored.
    pub fn applied(&self) -> Option<Move> {
        match self {
            Transition::AwaitingComputer { applied, .. }
            | Transition::AwaitingHuman { applied }
            | Transition::Finished { applied, .. } => Some(*applied),
            Transition::Ignored(_) => None,
        }
    }

    /// Result for the human, if this transition ended the game.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            Transition::Finished { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// True when the request changed nothing.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }
}

/// Game controller: owns the state, the generation counter and the RNG used
/// by randomized tiers.
#[derive(Debug, Clone)]
pub struct GameController {
    state: GameState,
    generation: u64,
    rng: StdRng,
}

impl GameController {
    /// New controller seeded from the OS.
    #[instrument]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::from_rng(difficulty, StdRng::from_entropy())
    }

    /// New controller with a reproducible RNG.
    #[instrument]
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn from_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        info!(%difficulty, "Creating game controller");
        Self {
            state: GameState::new(difficulty),
            generation: 0,
            rng,
        }
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Generation of the game in play.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket valid for the game in play.
    pub fn ticket(&self) -> MoveTicket {
        MoveTicket {
            generation: self.generation,
        }
    }

    /// Applies the human's move.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn human_move(&mut self, index: usize) -> Transition {
        self.apply(index, Mark::HUMAN)
    }

    /// Plays the computer's move if `ticket` still belongs to this game.
    #[instrument(
        skip(self),
        fields(generation = self.generation, difficulty = %self.state.difficulty)
    )]
    pub fn computer_move(&mut self, ticket: MoveTicket) -> Transition {
        if ticket.generation != self.generation {
            return ignored(MoveError::StaleGeneration {
                issued: ticket.generation,
                current: self.generation,
            });
        }
        if let Err(e) = self.check_turn(Mark::COMPUTER) {
            return ignored(e);
        }

        let difficulty = self.state.difficulty;
        match difficulty.choose_move(&self.state.board, Mark::COMPUTER, &mut self.rng) {
            Some(index) => self.apply(index, Mark::COMPUTER),
            None => ignored(MoveError::NoMoveAvailable),
        }
    }

    /// Plays the computer's move for the game in play.
    pub fn request_computer_move(&mut self) -> Transition {
        let ticket = self.ticket();
        self.computer_move(ticket)
    }

    /// Changes the tier used from the next computer turn on.
    ///
    /// The generation is left alone, so a ticket issued before the change
    /// stays valid and its move is chosen by the new tier. Callers that want
    /// a tier change to start over call [`GameController::reset`] as well.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(from = %self.state.difficulty, to = %difficulty, "Difficulty changed");
        self.state.difficulty = difficulty;
    }

    /// Starts a fresh game, keeping the difficulty, and voids outstanding
    /// tickets.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = GameState::new(self.state.difficulty);
        info!(generation = self.generation, "Game reset");
    }

    fn check_turn(&self, mark: Mark) -> Result<(), MoveError> {
        if !self.state.is_active() {
            Err(MoveError::GameOver)
        } else if self.state.current_mark != mark {
            Err(MoveError::OutOfTurn(mark))
        } else {
            Ok(())
        }
    }

    fn apply(&mut self, index: usize, mark: Mark) -> Transition {
        if let Err(e) = self.check_turn(mark) {
            return ignored(e);
        }
        if let Err(e) = self.state.board.place(index, mark) {
            return ignored(e);
        }

        let applied = Move::new(mark, index);
        let evaluation = self.state.board.evaluate();
        self.state.evaluation = evaluation;
        debug!(%applied, ?evaluation, "Move applied");

        if let Some(outcome) = GameOutcome::from_evaluation(evaluation, Mark::HUMAN) {
            self.state.activity = Activity::Finished;
            info!(%outcome, generation = self.generation, "Game finished");
            return Transition::Finished {
                applied,
                outcome,
                line: self.state.winning_line(),
            };
        }

        self.state.current_mark = mark.opponent();
        if self.state.current_mark == Mark::COMPUTER {
            Transition::AwaitingComputer {
                applied,
                ticket: self.ticket(),
            }
        } else {
            Transition::AwaitingHuman { applied }
        }
    }
}

fn ignored(reason: MoveError) -> Transition {
    debug!(%reason, "Request ignored");
    Transition::Ignored(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> GameController {
        GameController::with_seed(Difficulty::Expert, 0)
    }

    #[test]
    fn test_initial_state() {
        let game = controller();
        assert_eq!(game.state().board(), &Board::new());
        assert_eq!(game.state().current_mark(), Mark::X);
        assert_eq!(game.state().activity(), Activity::Active);
        assert_eq!(game.state().status_message(), "Your Turn");
    }

    #[test]
    fn test_human_move_hands_turn_to_computer() {
        let mut game = controller();
        let transition = game.human_move(4);
        assert_eq!(
            transition,
            Transition::AwaitingComputer {
                applied: Move::new(Mark::X, 4),
                ticket: game.ticket(),
            }
        );
        assert_eq!(game.state().current_mark(), Mark::O);
    }

    #[test]
    fn test_human_cannot_move_twice() {
        let mut game = controller();
        game.human_move(4);
        let before = game.state().clone();
        assert_eq!(game.human_move(0), Transition::Ignored(MoveError::OutOfTurn(Mark::X)));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_computer_cannot_move_first() {
        let mut game = controller();
        assert_eq!(
            game.request_computer_move(),
            Transition::Ignored(MoveError::OutOfTurn(Mark::O))
        );
        assert_eq!(game.state(), &GameState::new(Difficulty::Expert));
    }

    #[test]
    fn test_occupied_and_out_of_range_are_ignored() {
        let mut game = controller();
        game.human_move(4);
        game.request_computer_move();
        let before = game.state().clone();
        assert_eq!(game.human_move(4), Transition::Ignored(MoveError::SquareOccupied(4)));
        assert_eq!(game.human_move(9), Transition::Ignored(MoveError::OutOfRange(9)));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_stale_ticket_is_ignored_after_reset() {
        let mut game = controller();
        let ticket = match game.human_move(4) {
            Transition::AwaitingComputer { ticket, .. } => ticket,
            other => panic!("unexpected transition {other:?}"),
        };
        game.reset();
        assert_eq!(
            game.computer_move(ticket),
            Transition::Ignored(MoveError::StaleGeneration {
                issued: 0,
                current: 1
            })
        );
        assert_eq!(game.state(), &GameState::new(Difficulty::Expert));
    }

    #[test]
    fn test_reset_twice_is_idempotent() {
        let mut game = controller();
        game.human_move(0);
        game.request_computer_move();
        game.reset();
        let first = game.state().clone();
        game.reset();
        assert_eq!(game.state(), &first);
        assert_eq!(first, GameState::new(Difficulty::Expert));
    }

    #[test]
    fn test_difficulty_survives_reset() {
        let mut game = controller();
        game.set_difficulty(Difficulty::Easy);
        game.reset();
        assert_eq!(game.state().difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_expert_wins_against_lowest_square_strategy() {
        // X0 O4 X1 O2 X3 O6: the computer completes the 2-4-6 diagonal.
        let mut game = controller();
        let mut last = Transition::Ignored(MoveError::GameOver);
        while game.state().is_active() {
            let index = game.state().board().empty_indices()[0];
            last = game.human_move(index);
            if game.state().is_active() {
                last = game.request_computer_move();
            }
        }
        assert_eq!(
            last,
            Transition::Finished {
                applied: Move::new(Mark::O, 6),
                outcome: GameOutcome::Loss,
                line: Some([2, 4, 6]),
            }
        );
        assert_eq!(game.state().status_message(), "AI Wins!");
        assert_eq!(game.human_move(5), Transition::Ignored(MoveError::GameOver));
    }

    #[test]
    fn test_finished_game_ignores_every_request() {
        let mut game = controller();
        let old_ticket = match game.human_move(8) {
            Transition::AwaitingComputer { ticket, .. } => ticket,
            other => panic!("unexpected transition {other:?}"),
        };
        game.reset();

        while game.state().is_active() {
            let index = game.state().board().empty_indices()[0];
            if let Transition::AwaitingComputer { ticket, .. } = game.human_move(index) {
                game.computer_move(ticket);
            }
        }
        let finished = game.state().clone();
        assert_eq!(finished.activity(), Activity::Finished);

        assert_eq!(game.human_move(5), Transition::Ignored(MoveError::GameOver));
        assert_eq!(game.request_computer_move(), Transition::Ignored(MoveError::GameOver));
        assert_eq!(
            game.computer_move(game.ticket()),
            Transition::Ignored(MoveError::GameOver)
        );
        assert_eq!(
            game.computer_move(old_ticket),
            Transition::Ignored(MoveError::StaleGeneration {
                issued: 0,
                current: 1
            })
        );
        assert_eq!(game.state(), &finished);
        assert_eq!(game.generation(), 1);
    }

    #[test]
    fn test_difficulty_change_keeps_outstanding_ticket() {
        let mut game = controller();
        let ticket = match game.human_move(0) {
            Transition::AwaitingComputer { ticket, .. } => ticket,
            other => panic!("unexpected transition {other:?}"),
        };
        game.set_difficulty(Difficulty::Medium);

        // Expert answers a corner opening in the center; medium sees no
        // difference within two plies and takes the first free square.
        let transition = game.computer_move(ticket);
        assert_eq!(transition.applied(), Some(Move::new(Mark::O, 1)));
        assert_eq!(game.generation(), 0);
    }
}
