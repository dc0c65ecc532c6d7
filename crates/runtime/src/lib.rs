//! Runtime orchestration for Horde sessions.
//!
//! This crate wires a [`GameState`](horde_core::GameState), its scenario
//! rules and one decision provider per player into a background session
//! worker. Consumers embed [`Runtime`] to start play, subscribe to events,
//! and answer decisions through [`SessionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] holds the stock seats: external, scripted and tactical AI
//! - [`history`] keeps the bounded undo stack
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod history;
pub mod providers;
pub mod runtime;

mod workers;

pub use api::{
    DecisionAnswer, Result, RuntimeError, SeatRegistry, SessionHandle, SessionStatus, controller,
};
pub use events::{DecisionEvent, Event, EventBus, SessionEvent, StaleReason, Topic};
pub use history::{Snapshot, SnapshotHistory};
pub use providers::{ChannelProvider, ScriptedProvider, TacticalAi};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
