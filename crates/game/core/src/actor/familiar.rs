use crate::action::AttackKind;
use crate::combat::Stat;
use crate::item::AttackProfile;
use crate::state::ActorId;

/// Animal companion bonded to one survivor. Acts after its survivor's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Familiar {
    pub name: String,
    pub owner: ActorId,
    pub wounds: u8,
}

impl Familiar {
    pub const PRIORITY: u8 = 50;
    pub const HEALTH: u8 = 1;
    pub const NOISE: u8 = 0;

    const MELEE: AttackProfile = AttackProfile {
        dice: 2,
        to_hit: 4,
        damage: 1,
        min_range: 0,
        max_range: 0,
    };

    pub fn new(name: impl Into<String>, owner: ActorId) -> Self {
        Self {
            name: name.into(),
            owner,
            wounds: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.wounds < Self::HEALTH
    }

    pub fn melee(&self) -> Stat {
        Stat::from_profile(AttackKind::Melee, Self::MELEE)
    }
}
