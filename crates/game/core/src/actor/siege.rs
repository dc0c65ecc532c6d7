use crate::action::{ActionKind, AttackKind};
use crate::combat::Stat;
use crate::item::AttackProfile;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SiegeKind {
    /// Direct fire along lines of sight.
    Ballista,
    /// Lobbed shots that ignore walls.
    Trebuchet,
}

/// A siege engine never acts on its own; survivors in its zone operate and
/// push it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiegeEngine {
    pub kind: SiegeKind,
}

impl SiegeEngine {
    pub const PRIORITY: u8 = 200;

    pub fn new(kind: SiegeKind) -> Self {
        Self { kind }
    }

    pub fn action(&self) -> ActionKind {
        match self.kind {
            SiegeKind::Ballista => ActionKind::Siege,
            SiegeKind::Trebuchet => ActionKind::Indirect,
        }
    }

    pub fn stat(&self) -> Stat {
        let profile = match self.kind {
            SiegeKind::Ballista => AttackProfile {
                dice: 2,
                to_hit: 4,
                damage: 3,
                min_range: 1,
                max_range: 3,
            },
            SiegeKind::Trebuchet => AttackProfile {
                dice: 3,
                to_hit: 4,
                damage: 2,
                min_range: 1,
                max_range: 4,
            },
        };
        let mut stat = Stat::from_profile(AttackKind::Siege, profile);
        stat.action = self.action();
        stat.noisy = true;
        stat
    }
}
