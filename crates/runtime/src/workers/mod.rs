//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the authoritative game state and drives the
//! engine; clients reach it only through commands.

mod session;

pub use session::{Command, SessionWorker};
