//! Event types for each topic.

use horde_core::{Answer, DecisionRequest, GameOver, PhaseTag};
use serde::{Deserialize, Serialize};

/// Progress of the session as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// One unit of engine work completed in `phase`.
    Progressed { phase: PhaseTag, round: u32 },

    /// The state was rolled back to the snapshot taken before an answer.
    Undone {
        round: u32,
        /// Snapshots still available after this undo.
        remaining: usize,
    },

    GameOver { outcome: GameOver, round: u32 },

    /// The engine reported an invariant violation; the session stopped.
    Failed { error: String },
}

/// Decision traffic between the session and the players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionEvent {
    /// The engine waits on `request`. Answers must quote `ticket`.
    Requested {
        ticket: u64,
        request: DecisionRequest,
    },

    /// An answer arrived that no longer applies and was dropped.
    Stale {
        ticket: u64,
        answer: Answer,
        reason: StaleReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StaleReason {
    /// Nothing is pending.
    NoRequest,
    /// The ticket names an earlier request.
    OldTicket,
    /// The index is out of range, or `Back` on a request that cannot be
    /// cancelled.
    OutOfRange,
}
