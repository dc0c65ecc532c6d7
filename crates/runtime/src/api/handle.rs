//! Cloneable façade for issuing commands to the session worker.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! answering decisions, inspecting the session or streaming events from
//! specific topics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};

use horde_core::{Answer, DecisionRequest, EngineError, GameOver, GameState};

use super::errors::{Result, RuntimeError};
use crate::events::{DecisionEvent, Event, EventBus, SessionEvent, Topic};
use crate::workers::Command;

/// An answer to the decision announced under `ticket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionAnswer {
    pub ticket: u64,
    pub answer: Answer,
}

impl DecisionAnswer {
    pub fn pick(ticket: u64, index: usize) -> Self {
        Self {
            ticket,
            answer: Answer::Pick(index),
        }
    }

    pub fn back(ticket: u64) -> Self {
        Self {
            ticket,
            answer: Answer::Back,
        }
    }
}

/// Where the session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The engine is working through phases.
    Running,
    /// The engine waits on a decision.
    Waiting {
        ticket: u64,
        request: DecisionRequest,
    },
    Finished(GameOver),
    Failed(EngineError),
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }
}

/// Client-facing handle to interact with a session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Answer the pending decision of an external seat.
    ///
    /// Answers quoting an old ticket or an invalid option are rejected with
    /// a recoverable error and the session keeps waiting.
    pub async fn answer(&self, answer: DecisionAnswer) -> Result<()> {
        self.request(|reply| Command::Answer { answer, reply })
            .await?
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn status(&self) -> Result<SessionStatus> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Roll back to the state before the most recent external answer.
    /// Returns the round the session is back in.
    pub async fn undo(&self) -> Result<u32> {
        self.request(|reply| Command::Undo { reply }).await?
    }

    /// Waits until the session stops running: a decision is pending, the
    /// game is over, or the engine failed.
    pub async fn settled(&self) -> Result<SessionStatus> {
        // subscribe before asking so nothing published in between is missed
        let mut session_rx = self.subscribe(Topic::Session);
        let mut decision_rx = self.subscribe(Topic::Decision);
        loop {
            let status = self.status().await?;
            if !status.is_running() {
                return Ok(status);
            }
            loop {
                let event = tokio::select! {
                    event = session_rx.recv() => event,
                    event = decision_rx.recv() => event,
                };
                match event {
                    Ok(Event::Session(SessionEvent::Progressed { .. })) => continue,
                    Ok(Event::Session(_) | Event::Decision(DecisionEvent::Requested { .. })) => {
                        break;
                    }
                    Ok(Event::Decision(DecisionEvent::Stale { .. })) => continue,
                    Err(RecvError::Lagged(_)) => break,
                    Err(RecvError::Closed) => return Err(RuntimeError::EventStreamClosed),
                }
            }
        }
    }

    /// Waits for the end of the game. Fails if the engine stops with an
    /// error, or if the session waits on a decision no one will answer.
    pub async fn finished(&self) -> Result<GameOver> {
        match self.settled().await? {
            SessionStatus::Finished(over) => Ok(over),
            SessionStatus::Failed(error) => Err(RuntimeError::Engine(error)),
            SessionStatus::Waiting { ticket, .. } => Err(RuntimeError::Unanswered { ticket }),
            SessionStatus::Running => Err(RuntimeError::EventStreamClosed),
        }
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Phase progress, undo and game over
    /// - `Topic::Decision` - Decision requests and rejected answers
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use horde_runtime::{DecisionAnswer, DecisionEvent, Event, Topic};
    ///
    /// let mut decisions = handle.subscribe(Topic::Decision);
    /// while let Ok(Event::Decision(DecisionEvent::Requested { ticket, .. })) =
    ///     decisions.recv().await
    /// {
    ///     handle.answer(DecisionAnswer::pick(ticket, 0)).await?;
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}
