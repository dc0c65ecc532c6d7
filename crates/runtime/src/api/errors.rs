//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, session setup and decision
//! delivery so clients can bubble them up with consistent context.

use horde_core::{Answer, EngineError, ErrorSeverity, GameError, PlayerId, SetupError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("event stream closed before the session ended")]
    EventStreamClosed,

    #[error("runtime requires an initial game state before building")]
    MissingState,

    #[error("game state is not playable")]
    Setup(#[from] SetupError),

    #[error("session stopped: {0}")]
    Engine(#[from] EngineError),

    #[error("no decision is pending")]
    NoPendingDecision,

    #[error("answer for ticket {got} arrived, but ticket {expected} is pending")]
    StaleTicket { expected: u64, got: u64 },

    #[error("answer {answer:?} does not fit decision {ticket}")]
    AnswerOutOfRange { ticket: u64, answer: Answer },

    #[error("decision {ticket} belongs to {player:?}, which is not an external seat")]
    NotExternalSeat {
        ticket: u64,
        player: Option<PlayerId>,
    },

    #[error("no snapshot left to undo")]
    NothingToUndo,

    #[error("session waits on decision {ticket}, which no seat answers")]
    Unanswered { ticket: u64 },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::NoPendingDecision
            | RuntimeError::StaleTicket { .. }
            | RuntimeError::AnswerOutOfRange { .. }
            | RuntimeError::NothingToUndo => ErrorSeverity::Recoverable,
            RuntimeError::NotExternalSeat { .. }
            | RuntimeError::MissingState
            | RuntimeError::Unanswered { .. } => ErrorSeverity::Validation,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_)
            | RuntimeError::EventStreamClosed => ErrorSeverity::Internal,
            RuntimeError::Setup(e) => e.severity(),
            RuntimeError::Engine(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::EventStreamClosed => "RUNTIME_EVENT_STREAM_CLOSED",
            RuntimeError::MissingState => "RUNTIME_MISSING_STATE",
            RuntimeError::Setup(e) => e.error_code(),
            RuntimeError::Engine(e) => e.error_code(),
            RuntimeError::NoPendingDecision => "RUNTIME_NO_PENDING_DECISION",
            RuntimeError::StaleTicket { .. } => "RUNTIME_STALE_TICKET",
            RuntimeError::AnswerOutOfRange { .. } => "RUNTIME_ANSWER_OUT_OF_RANGE",
            RuntimeError::NotExternalSeat { .. } => "RUNTIME_NOT_EXTERNAL_SEAT",
            RuntimeError::NothingToUndo => "RUNTIME_NOTHING_TO_UNDO",
            RuntimeError::Unanswered { .. } => "RUNTIME_UNANSWERED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_answers_are_recoverable() {
        let err = RuntimeError::StaleTicket {
            expected: 3,
            got: 2,
        };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "RUNTIME_STALE_TICKET");
    }

    #[test]
    fn setup_errors_keep_their_code() {
        let err = RuntimeError::from(SetupError::NoSurvivors);
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), SetupError::NoSurvivors.error_code());
    }
}
