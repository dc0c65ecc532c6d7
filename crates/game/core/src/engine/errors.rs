//! Error types surfaced by the state machine.

use crate::board::BoardError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, SetupError};

use super::{Move, PhaseTag};

/// Errors that stop [`GameEngine::advance`](super::GameEngine::advance).
///
/// Stale or out-of-range answers are not errors; they leave the phase in
/// place and the engine asks again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("duplicate catalogue entry {mv:?} for actor {actor}")]
    DuplicateMove { actor: ActorId, mv: Move },

    #[error("phase {phase} refers to unknown actor {actor}")]
    UnknownActor { phase: PhaseTag, actor: ActorId },

    #[error("session cannot start: {0}")]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::DuplicateMove { .. } | EngineError::Setup(_) => ErrorSeverity::Fatal,
            EngineError::UnknownActor { .. } => ErrorSeverity::Internal,
            EngineError::Board(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::DuplicateMove { .. } => "ENGINE_DUPLICATE_MOVE",
            EngineError::UnknownActor { .. } => "ENGINE_UNKNOWN_ACTOR",
            EngineError::Setup(e) => e.error_code(),
            EngineError::Board(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_moves_are_fatal() {
        let err = EngineError::DuplicateMove {
            actor: ActorId(1),
            mv: Move::EndTurn,
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), "ENGINE_DUPLICATE_MOVE");
    }
}
