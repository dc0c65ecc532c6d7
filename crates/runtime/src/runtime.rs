//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for clients to seat players and start play.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use horde_content::Session;
use horde_core::{DecisionProvider, DynQuest, GameState, NoQuest, PhaseTag, PlayerId};

use crate::api::{Result, RuntimeError, SeatRegistry, SessionHandle};
use crate::events::EventBus;
use crate::history::SnapshotHistory;
use crate::providers::ChannelProvider;
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of each event topic.
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Snapshots kept for undo.
    pub history_depth: usize,
    /// Engine steps between two looks at the command channel.
    pub steps_per_yield: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            history_depth: 32,
            steps_per_yield: 64,
        }
    }
}

/// Main runtime that plays one session
///
/// Design: Runtime owns the worker and coordinates its lifetime.
/// [`SessionHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: SessionHandle,
    worker: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for it to exit
    pub async fn shutdown(self) -> Result<()> {
        // a worker that already exited has nothing left to stop
        let _ = self.handle.shutdown().await;
        drop(self.handle);

        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    quest: Option<Box<dyn DynQuest>>,
    seats: Vec<(PlayerId, Box<dyn DecisionProvider + Send>)>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            quest: None,
            seats: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the scenario rules (default: none)
    pub fn quest(mut self, quest: Box<dyn DynQuest>) -> Self {
        self.quest = Some(quest);
        self
    }

    /// Take state and rules from an assembled content session
    pub fn session(self, session: Session) -> Self {
        self.initial_state(session.state).quest(session.quest)
    }

    /// Bind `player` to `provider`. Players left unbound answer through
    /// [`SessionHandle::answer`].
    pub fn seat(
        mut self,
        player: PlayerId,
        provider: impl DecisionProvider + Send + 'static,
    ) -> Self {
        self.seats.push((player, Box::new(provider)));
        self
    }

    /// Build the runtime and start playing
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;
        let state = self.state.ok_or(RuntimeError::MissingState)?;
        if state.phases.top().tag() == PhaseTag::Init {
            state.validate()?;
        }
        let quest = self.quest.unwrap_or_else(|| Box::new(NoQuest));

        let (external, answers) = ChannelProvider::pair();
        let mut seats = SeatRegistry::new(external);
        for (player, provider) in self.seats {
            seats.bind(player, provider);
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = SessionHandle::new(command_tx, event_bus.clone());

        let worker = SessionWorker::new(
            state,
            quest,
            seats,
            answers,
            SnapshotHistory::new(config.history_depth),
            command_rx,
            event_bus,
            config.steps_per_yield,
        );
        info!(target: "horde::runtime", ?config, "starting session worker");
        let worker = tokio::spawn(worker.run());

        Ok(Runtime { handle, worker })
    }
}
