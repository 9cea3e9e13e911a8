//! Drives a session from UI commands and deferred timers.
//!
//! The orchestrator task is the only owner of the [`GameSession`]. UI input
//! arrives as [`Command`]s, output leaves as [`GameEvent`]s, and the
//! computer's "thinking" pause and the post-game restart are spawned sleep
//! tasks that post back to the same loop. Each deferred message carries the
//! generation it was scheduled for; after a reset it no longer matches and
//! is dropped.

use derive_getters::Getters;
use std::time::Duration;
use strictly_tictactoe::{
    Board, Difficulty, GameOutcome, GameSession, Mark, MoveError, MoveTicket, Position,
    SessionStats, StatsStore, Transition, WinLine,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Requests from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The human picked a square.
    HumanMove(usize),
    /// Start a new game.
    Reset,
    /// Change the opponent's tier; also starts a new game.
    SetDifficulty(String),
    /// Ask for the current counters.
    ShowStats,
    /// Stop the orchestrator.
    Quit,
}

/// Messages sent from orchestrator to UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Board or turn changed.
    StateChanged {
        /// Board after the change.
        board: Board,
        /// Status line for display.
        status: &'static str,
    },
    /// A mark was placed.
    MoveMade {
        /// Who moved.
        mark: Mark,
        /// Where.
        position: Position,
    },
    /// A human move was refused; nothing changed.
    MoveRejected(MoveError),
    /// The game ended.
    GameOver {
        /// Result for the human.
        outcome: GameOutcome,
        /// Completed line, if the game was won.
        line: Option<WinLine>,
        /// Counters including this game.
        stats: SessionStats,
    },
    /// Opponent tier changed.
    DifficultyChanged(Difficulty),
    /// A new game started.
    Restarted,
    /// Reply to [`Command::ShowStats`].
    Stats(SessionStats),
}

/// Delays owned by the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Timings {
    think_delay: Duration,
    restart_delay: Duration,
}

impl Timings {
    /// Pause before the computer answers, and before a finished game is cleared.
    pub fn new(think_delay: Duration, restart_delay: Duration) -> Self {
        Self {
            think_delay,
            restart_delay,
        }
    }
}

/// Deferred work posted back by sleep tasks.
#[derive(Debug, Clone, Copy)]
enum Timer {
    ComputerTurn(MoveTicket),
    Restart { generation: u64 },
}

/// Orchestrates one human against the computer.
pub struct Orchestrator<S> {
    session: GameSession<S>,
    timings: Timings,
    commands: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
    timer_tx: mpsc::UnboundedSender<Timer>,
    timer_rx: mpsc::UnboundedReceiver<Timer>,
}

impl<S: StatsStore> Orchestrator<S> {
    /// Creates a new orchestrator.
    pub fn new(
        session: GameSession<S>,
        timings: Timings,
        commands: mpsc::UnboundedReceiver<Command>,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            session,
            timings,
            commands,
            event_tx,
            timer_tx,
            timer_rx,
        }
    }

    /// Runs until [`Command::Quit`] or until every command sender is dropped,
    /// then hands the session back.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> GameSession<S> {
        info!("Starting game orchestration");
        self.publish_state();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(timer) = self.timer_rx.recv() => self.handle_timer(timer),
            }
        }

        info!(stats = %self.session.stats(), "Orchestration finished");
        self.session
    }

    fn handle_command(&mut self, command: Command) {
        debug!(?command, "Command received");
        match command {
            Command::HumanMove(index) => {
                let transition = self.session.report_human_move(index);
                self.handle_transition(transition);
            }
            Command::Reset => self.restart(),
            Command::SetDifficulty(tier) => {
                let difficulty = self.session.set_difficulty(&tier);
                self.emit(GameEvent::DifficultyChanged(difficulty));
                self.restart();
            }
            Command::ShowStats => self.emit(GameEvent::Stats(self.session.stats())),
            Command::Quit => {}
        }
    }

    fn handle_timer(&mut self, timer: Timer) {
        match timer {
            Timer::ComputerTurn(ticket) => {
                let transition = self.session.computer_move(ticket);
                self.handle_transition(transition);
            }
            Timer::Restart { generation } => {
                if generation == self.session.generation() && !self.session.state().is_active() {
                    self.restart();
                } else {
                    debug!(generation, "Skipping stale restart");
                }
            }
        }
    }

    fn handle_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Ignored(MoveError::StaleGeneration { issued, current }) => {
                debug!(issued, current, "Dropped computer move from an earlier game");
            }
            Transition::Ignored(reason) => self.emit(GameEvent::MoveRejected(reason)),
            Transition::AwaitingComputer { applied, ticket } => {
                self.emit_move(applied.mark, applied.index);
                self.publish_state();
                self.schedule(self.timings.think_delay, Timer::ComputerTurn(ticket));
            }
            Transition::AwaitingHuman { applied } => {
                self.emit_move(applied.mark, applied.index);
                self.publish_state();
            }
            Transition::Finished {
                applied,
                outcome,
                line,
            } => {
                self.emit_move(applied.mark, applied.index);
                self.publish_state();
                self.emit(GameEvent::GameOver {
                    outcome,
                    line,
                    stats: self.session.stats(),
                });
                let generation = self.session.generation();
                self.schedule(self.timings.restart_delay, Timer::Restart { generation });
            }
        }
    }

    fn restart(&mut self) {
        self.session.reset();
        self.emit(GameEvent::Restarted);
        self.publish_state();
    }

    fn schedule(&self, delay: Duration, timer: Timer) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only closes when the orchestrator has stopped.
            let _ = tx.send(timer);
        });
    }

    fn emit_move(&self, mark: Mark, index: usize) {
        if let Some(position) = Position::from_index(index) {
            self.emit(GameEvent::MoveMade { mark, position });
        }
    }

    fn publish_state(&self) {
        let state = self.session.state();
        self.emit(GameEvent::StateChanged {
            board: state.board().clone(),
            status: state.status_message(),
        });
    }

    fn emit(&self, event: GameEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("UI stopped listening, event dropped");
        }
    }
}
