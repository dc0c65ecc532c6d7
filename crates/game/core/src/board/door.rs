use crate::state::{CellPos, DoorId};

use super::{Direction, WallState};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LockColor {
    Red,
    Blue,
    Green,
    Yellow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorState {
    Open,
    #[default]
    Closed,
    /// Stuck shut for good; behaves like a lock without a key.
    Jammed,
}

/// One physical door, addressed through either of its two sides.
///
/// Side `2 * n` sits on `cells[0]` facing `dirs[0]`; side `2 * n + 1` is the
/// mirrored side on `cells[1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Door {
    pub cells: [CellPos; 2],
    pub dirs: [Direction; 2],
    pub state: DoorState,
    pub lock: Option<LockColor>,
    pub locked: bool,
}

impl Door {
    /// Wall state both cells must show for this door.
    pub const fn wall_state(&self) -> WallState {
        if self.locked {
            return WallState::Locked;
        }
        match self.state {
            DoorState::Open => WallState::Open,
            DoorState::Closed => WallState::Closed,
            DoorState::Jammed => WallState::Locked,
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, DoorState::Open) && !self.locked
    }

    /// Cell and facing of one side of this door.
    pub fn side(&self, id: DoorId) -> (CellPos, Direction) {
        let slot = (id.0 & 1) as usize;
        (self.cells[slot], self.dirs[slot])
    }
}
