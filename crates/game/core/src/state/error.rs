//! Session setup errors.

use crate::board::BoardError;
use crate::error::{ErrorSeverity, GameError};
use crate::item::EquipmentKind;
use crate::state::{ActorId, PlayerId, ZoneId};

/// Errors raised while assembling a [`GameState`](super::GameState) before
/// play starts. Any of them means the session must not start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("board has no starting zone")]
    NoStartingZone,

    #[error("zone {0} has no room left")]
    ZoneFull(ZoneId),

    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    #[error("actor {0} is not a survivor")]
    NotASurvivor(ActorId),

    #[error("survivor {actor} has no free slot for {kind}")]
    NoFreeSlot { actor: ActorId, kind: EquipmentKind },

    #[error("board references actor {0} missing from the registry")]
    DanglingActor(ActorId),

    #[error("no survivors in play")]
    NoSurvivors,

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::DanglingActor(_) => ErrorSeverity::Internal,
            SetupError::Board(e) => e.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::UnknownPlayer(_) => "SETUP_UNKNOWN_PLAYER",
            SetupError::NoStartingZone => "SETUP_NO_STARTING_ZONE",
            SetupError::ZoneFull(_) => "SETUP_ZONE_FULL",
            SetupError::UnknownActor(_) => "SETUP_UNKNOWN_ACTOR",
            SetupError::NotASurvivor(_) => "SETUP_NOT_A_SURVIVOR",
            SetupError::NoFreeSlot { .. } => "SETUP_NO_FREE_SLOT",
            SetupError::DanglingActor(_) => "SETUP_DANGLING_ACTOR",
            SetupError::NoSurvivors => "SETUP_NO_SURVIVORS",
            SetupError::Board(e) => e.error_code(),
        }
    }
}
