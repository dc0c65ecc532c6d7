//! Session worker that owns the authoritative [`horde_core::GameState`].
//!
//! Drives [`horde_core::GameEngine`] until it waits on a decision or the
//! game ends, receives commands from [`SessionHandle`](crate::SessionHandle)
//! and publishes events to the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use horde_core::{
    Advance, Answer, DecisionRequest, DynQuest, EngineError, GameEngine, GameOver, GameState,
};

use crate::api::{DecisionAnswer, Result, RuntimeError, SeatRegistry, SessionStatus};
use crate::events::{DecisionEvent, EventBus, SessionEvent, StaleReason};
use crate::history::{Snapshot, SnapshotHistory};

/// Commands that can be sent to the session worker
pub enum Command {
    /// Answer the pending decision of an external seat.
    Answer {
        answer: DecisionAnswer,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    /// Roll back to the snapshot taken before the last external answer.
    Undo { reply: oneshot::Sender<Result<u32>> },
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that plays one session.
pub struct SessionWorker {
    state: GameState,
    quest: Box<dyn DynQuest>,
    seats: SeatRegistry,
    answers: mpsc::UnboundedSender<Answer>,
    history: SnapshotHistory,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    steps_per_yield: usize,
    status: SessionStatus,
    next_ticket: u64,
    stopping: bool,
}

impl SessionWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: GameState,
        quest: Box<dyn DynQuest>,
        seats: SeatRegistry,
        answers: mpsc::UnboundedSender<Answer>,
        history: SnapshotHistory,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        steps_per_yield: usize,
    ) -> Self {
        info!(
            target: "horde::runtime",
            seed = state.seed(),
            players = state.players.len(),
            actors = state.actors.len(),
            "session worker initialized"
        );

        Self {
            state,
            quest,
            seats,
            answers,
            history,
            command_rx,
            event_bus,
            steps_per_yield: steps_per_yield.max(1),
            status: SessionStatus::Running,
            next_ticket: 0,
            stopping: false,
        }
    }

    /// Main worker loop.
    ///
    /// Plays in slices of `steps_per_yield` engine steps, serving queued
    /// commands between slices; once the session settles it sleeps on the
    /// command channel. Exits on shutdown or when every handle is gone.
    pub async fn run(mut self) {
        while !self.stopping {
            if self.status.is_running() {
                self.play();
                while let Ok(cmd) = self.command_rx.try_recv() {
                    self.handle_command(cmd);
                }
                tokio::task::yield_now().await;
                continue;
            }
            match self.command_rx.recv().await {
                Some(cmd) => self.handle_command(cmd),
                None => break,
            }
        }
        info!(target: "horde::runtime", round = self.state.round.number, "session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Answer { answer, reply } => {
                let result = self.answer(answer);
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::Status { reply } => {
                let _ = reply.send(self.status.clone());
            }
            Command::Undo { reply } => {
                let result = self.undo();
                let _ = reply.send(result);
            }
            Command::Shutdown { reply } => {
                self.stopping = true;
                let _ = reply.send(());
            }
        }
    }

    fn play(&mut self) {
        for _ in 0..self.steps_per_yield {
            let phase = self.state.phases.top().tag();
            let step =
                GameEngine::new(&mut self.state).advance(&mut self.seats, self.quest.hooks());
            match step {
                Ok(Advance::Progressed) => {
                    self.event_bus.publish(SessionEvent::Progressed {
                        phase,
                        round: self.state.round.number,
                    });
                }
                Ok(Advance::Waiting(request)) => {
                    self.wait_on(request);
                    return;
                }
                Ok(Advance::Finished(outcome)) => {
                    self.finish(outcome);
                    return;
                }
                Err(err) => {
                    self.fail(err);
                    return;
                }
            }
        }
    }

    fn wait_on(&mut self, request: DecisionRequest) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        debug!(
            target: "horde::runtime",
            ticket,
            phase = %request.phase,
            player = ?request.player,
            options = request.options.len(),
            "waiting on decision"
        );
        self.event_bus.publish(DecisionEvent::Requested {
            ticket,
            request: request.clone(),
        });
        self.status = SessionStatus::Waiting { ticket, request };
    }

    fn finish(&mut self, outcome: GameOver) {
        let round = self.state.round.number;
        info!(target: "horde::runtime", round, %outcome, "session finished");
        self.event_bus.publish(SessionEvent::GameOver {
            outcome: outcome.clone(),
            round,
        });
        self.status = SessionStatus::Finished(outcome);
    }

    fn fail(&mut self, err: EngineError) {
        error!(
            target: "horde::runtime",
            round = self.state.round.number,
            error = %err,
            "session stopped on an engine error"
        );
        self.event_bus.publish(SessionEvent::Failed {
            error: err.to_string(),
        });
        self.status = SessionStatus::Failed(err);
    }

    fn stale(&self, answer: DecisionAnswer, reason: StaleReason) {
        warn!(
            target: "horde::runtime",
            ticket = answer.ticket,
            answer = ?answer.answer,
            %reason,
            "stale answer dropped"
        );
        self.event_bus.publish(DecisionEvent::Stale {
            ticket: answer.ticket,
            answer: answer.answer,
            reason,
        });
    }

    fn answer(&mut self, answer: DecisionAnswer) -> Result<()> {
        let SessionStatus::Waiting { ticket, request } = &self.status else {
            self.stale(answer, StaleReason::NoRequest);
            return Err(RuntimeError::NoPendingDecision);
        };
        let ticket = *ticket;
        if answer.ticket != ticket {
            self.stale(answer, StaleReason::OldTicket);
            return Err(RuntimeError::StaleTicket {
                expected: ticket,
                got: answer.ticket,
            });
        }
        if !request.accepts(answer.answer) {
            self.stale(answer, StaleReason::OutOfRange);
            return Err(RuntimeError::AnswerOutOfRange {
                ticket,
                answer: answer.answer,
            });
        }
        if !self.seats.is_external(request.player) {
            return Err(RuntimeError::NotExternalSeat {
                ticket,
                player: request.player,
            });
        }

        self.history
            .push(Snapshot::capture(&self.state, &*self.quest));
        // the external seat picks it up on the next engine step
        if self.answers.send(answer.answer).is_err() {
            warn!(target: "horde::runtime", ticket, "external seat is gone");
        }
        self.status = SessionStatus::Running;
        Ok(())
    }

    fn undo(&mut self) -> Result<u32> {
        let snapshot = self.history.pop().ok_or(RuntimeError::NothingToUndo)?;
        self.state = snapshot.state;
        self.quest = snapshot.quest;
        self.seats.clear_inbox();
        self.status = SessionStatus::Running;

        let round = self.state.round.number;
        let remaining = self.history.len();
        info!(target: "horde::runtime", round, remaining, "undo");
        self.event_bus
            .publish(SessionEvent::Undone { round, remaining });
        Ok(round)
    }
}
