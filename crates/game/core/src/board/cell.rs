use crate::config::GameConfig;
use crate::state::{ActorId, CellPos, DoorId, ZoneId};

use super::Direction;

/// State of one side of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallState {
    /// No wall; passable and transparent.
    #[default]
    None,
    Wall,
    /// Open door.
    Open,
    /// Closed door.
    Closed,
    /// Locked or jammed door.
    Locked,
    /// Low wall; blocks movement but not sight.
    Rampart,
}

impl WallState {
    #[inline]
    pub const fn is_passable(self) -> bool {
        matches!(self, WallState::None | WallState::Open)
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        matches!(self, WallState::None | WallState::Open | WallState::Rampart)
    }

    #[inline]
    pub const fn is_door(self) -> bool {
        matches!(self, WallState::Open | WallState::Closed | WallState::Locked)
    }
}

/// Environment of a zone. Building and vault zones are indoor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Street,
    Building,
    Vault,
}

impl Environment {
    #[inline]
    pub const fn is_indoor(self) -> bool {
        matches!(self, Environment::Building | Environment::Vault)
    }
}

/// Which side an occupant plays for; reach queries stop on hostiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Survivors,
    Horde,
    Neutral,
}

/// Board-side view of an actor standing in a quadrant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub actor: ActorId,
    pub priority: u8,
    pub noise: u8,
    pub faction: Faction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub pos: CellPos,
    /// `None` marks a void cell that is never entered.
    pub zone: Option<ZoneId>,
    pub environment: Environment,
    pub sides: [WallState; 6],
    /// Linked cell for ascend (0) and descend (1).
    pub links: [Option<CellPos>; 2],
    pub doors: [Option<DoorId>; 6],
    pub spawn: bool,
    pub capacity: u8,
    pub quadrants: [Option<Occupant>; GameConfig::MAX_QUADRANTS],
}

impl Cell {
    pub(crate) fn void(pos: CellPos) -> Self {
        Self {
            pos,
            zone: None,
            environment: Environment::Street,
            sides: [WallState::None; 6],
            links: [None; 2],
            doors: [None; 6],
            spawn: false,
            capacity: GameConfig::MAX_QUADRANTS as u8,
            quadrants: [None; GameConfig::MAX_QUADRANTS],
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.zone.is_none()
    }

    #[inline]
    pub fn side(&self, dir: Direction) -> WallState {
        self.sides[dir.index()]
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.quadrants.iter().flatten()
    }

    pub fn occupied(&self) -> usize {
        self.occupants().count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied() >= self.capacity as usize
    }

    /// First free quadrant within this cell's capacity.
    pub fn free_quadrant(&self) -> Option<usize> {
        self.quadrants
            .iter()
            .take(self.capacity as usize)
            .position(Option::is_none)
    }
}
