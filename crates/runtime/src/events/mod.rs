//! Topic-based event bus for session events.
//!
//! Events are published to a topic and consumers subscribe only to the
//! topics they need: front ends watch [`Topic::Decision`], loggers and
//! recorders watch [`Topic::Session`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{DecisionEvent, SessionEvent, StaleReason};
