use crate::config::XpThresholds;
use crate::item::Inventory;
use crate::skills::{FreeActions, SkillSet, SkillTree};
use crate::state::{ActorId, PlayerId};

/// Danger level reached through experience.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DangerLevel {
    #[default]
    Blue,
    Yellow,
    Orange,
    Red,
}

impl DangerLevel {
    pub fn from_xp(xp: u16, thresholds: &XpThresholds) -> Self {
        if xp >= thresholds.red {
            DangerLevel::Red
        } else if xp >= thresholds.orange {
            DangerLevel::Orange
        } else if xp >= thresholds.yellow {
            DangerLevel::Yellow
        } else {
            DangerLevel::Blue
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            DangerLevel::Blue => Some(DangerLevel::Yellow),
            DangerLevel::Yellow => Some(DangerLevel::Orange),
            DangerLevel::Orange => Some(DangerLevel::Red),
            DangerLevel::Red => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnStatus {
    #[default]
    Pending,
    Active,
    Done,
}

/// Per-turn bookkeeping, reset when a round begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub status: TurnStatus,
    pub free_used: FreeActions,
    pub searched: bool,
    pub sprinted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Survivor {
    pub name: String,
    pub player: PlayerId,
    pub health: u8,
    pub wounds: u8,
    pub experience: u16,
    pub skills: SkillSet,
    pub tree: SkillTree,
    pub inventory: Inventory,
    pub turn: TurnState,
    pub familiar: Option<ActorId>,
    pub escaped: bool,
    /// Highest danger level whose skill choice has been handled.
    pub level_granted: DangerLevel,
}

impl Survivor {
    pub const PRIORITY: u8 = 100;
    pub const NOISE: u8 = 1;

    pub fn new(name: impl Into<String>, player: PlayerId, health: u8) -> Self {
        Self {
            name: name.into(),
            player,
            health,
            wounds: 0,
            experience: 0,
            skills: SkillSet::new(),
            tree: SkillTree::default(),
            inventory: Inventory::new(),
            turn: TurnState::default(),
            familiar: None,
            escaped: false,
            level_granted: DangerLevel::Blue,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.wounds < self.health
    }

    /// Alive and still on the board.
    pub fn is_in_play(&self) -> bool {
        self.is_alive() && !self.escaped
    }

    pub fn health_left(&self) -> u8 {
        self.health.saturating_sub(self.wounds)
    }

    pub fn danger_level(&self, thresholds: &XpThresholds) -> DangerLevel {
        DangerLevel::from_xp(self.experience, thresholds)
    }

    pub fn heal(&mut self, amount: u8) {
        self.wounds = self.wounds.saturating_sub(amount);
    }

    /// Applies wounds; returns true if this killed the survivor.
    pub fn wound(&mut self, amount: u8) -> bool {
        let was_alive = self.is_alive();
        self.wounds = self.wounds.saturating_add(amount).min(self.health);
        was_alive && !self.is_alive()
    }

    /// Armor threshold after skill overrides.
    pub fn armor(&self) -> Option<u8> {
        self.skills.pipeline().armor(self.inventory.armor())
    }
}
