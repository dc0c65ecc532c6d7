//! Board construction and mutation errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CellPos, DoorId, ZoneId};

use super::Direction;

/// Errors raised while building or validating a board.
///
/// Everything except `UnknownZone`/`UnknownDoor` is an invariant violation:
/// the session must not start with such a board.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board has no zones")]
    Empty,

    #[error("cell {pos} is outside the {width}x{height} board")]
    OutOfBounds { pos: CellPos, width: u32, height: u32 },

    #[error("cell {pos} is void but is referenced by a side or link")]
    VoidCell { pos: CellPos },

    #[error("zone {zone} mixes environments")]
    MixedEnvironment { zone: ZoneId },

    #[error("zone {zone} is not connected through grid adjacency")]
    DisconnectedZone { zone: ZoneId },

    #[error("conflicting declarations for side {dir} of cell {pos}")]
    ConflictingSide { pos: CellPos, dir: Direction },

    #[error("door {door} has no matching counterpart")]
    MissingDoorCounterpart { door: DoorId },

    #[error("vertical link from {pos} ({dir}) is not mirrored")]
    UnmatchedLink { pos: CellPos, dir: Direction },

    #[error("cell {pos} has quadrant capacity {capacity}, expected 1..=9")]
    BadCapacity { pos: CellPos, capacity: u8 },

    #[error("unknown zone {zone}")]
    UnknownZone { zone: ZoneId },

    #[error("unknown door {door}")]
    UnknownDoor { door: DoorId },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownZone { .. } | Self::UnknownDoor { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "BOARD_EMPTY",
            Self::OutOfBounds { .. } => "BOARD_OUT_OF_BOUNDS",
            Self::VoidCell { .. } => "BOARD_VOID_CELL",
            Self::MixedEnvironment { .. } => "BOARD_MIXED_ENVIRONMENT",
            Self::DisconnectedZone { .. } => "BOARD_DISCONNECTED_ZONE",
            Self::ConflictingSide { .. } => "BOARD_CONFLICTING_SIDE",
            Self::MissingDoorCounterpart { .. } => "BOARD_MISSING_DOOR_COUNTERPART",
            Self::UnmatchedLink { .. } => "BOARD_UNMATCHED_LINK",
            Self::BadCapacity { .. } => "BOARD_BAD_CAPACITY",
            Self::UnknownZone { .. } => "BOARD_UNKNOWN_ZONE",
            Self::UnknownDoor { .. } => "BOARD_UNKNOWN_DOOR",
        }
    }
}
