//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and the session worker.

pub mod errors;
pub mod handle;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use handle::{DecisionAnswer, SessionHandle, SessionStatus};
pub use registry::{SeatRegistry, controller};
