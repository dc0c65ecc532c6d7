//! Folding active modifiers over stats, costs and outcomes.

use crate::action::{ActionKind, AttackKind};
use crate::combat::Stat;
use crate::state::ZoneId;

use super::{Capabilities, FreeActions, SkillKind};

/// Cost of one catalogue entry while modifiers are folded over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostContext {
    pub action: ActionKind,
    pub cost: u8,
    /// Extra cost for leaving zones that hold adversaries.
    pub hostile_penalty: u8,
}

impl CostContext {
    pub fn total(&self) -> u8 {
        self.cost.saturating_add(self.hostile_penalty)
    }
}

/// Movement allowances contributed by modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveGrant {
    pub zones_per_move: u8,
    pub sprint: bool,
    pub ignore_hostiles: bool,
}

impl Default for MoveGrant {
    fn default() -> Self {
        Self {
            zones_per_move: 1,
            sprint: false,
            ignore_hostiles: false,
        }
    }
}

/// Summary handed to attack-reaction hooks after allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub attack: AttackKind,
    pub zone: ZoneId,
    pub damage: u8,
    pub destroyed: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reaction {
    /// Destroy one more hostile in the target zone.
    BonusKill,
    Heal(u8),
    /// Light dragon bile in the target zone.
    Ignite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEndEffect {
    HealAll,
}

/// The ordered list of modifiers active for one resolution.
///
/// Order is acquisition order of the actor's skills followed by the
/// intrinsic skills of the equipment in use; every fold walks it front to
/// back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierPipeline {
    skills: Vec<SkillKind>,
}

impl ModifierPipeline {
    pub fn new(skills: impl IntoIterator<Item = SkillKind>) -> Self {
        Self {
            skills: skills.into_iter().collect(),
        }
    }

    /// Appends intrinsic skills of the equipment in use.
    pub fn with_intrinsics(mut self, intrinsic: &[SkillKind]) -> Self {
        self.skills.extend_from_slice(intrinsic);
        self
    }

    pub fn skills(&self) -> &[SkillKind] {
        &self.skills
    }

    fn having(&self, cap: Capabilities) -> impl Iterator<Item = SkillKind> + '_ {
        self.skills
            .iter()
            .copied()
            .filter(move |k| k.capabilities().contains(cap))
    }

    pub fn fold_stat(&self, mut stat: Stat) -> Stat {
        for kind in self.having(Capabilities::MUTATES_STAT) {
            if let Some(hook) = kind.def().stat {
                hook(&mut stat);
            }
        }
        stat.normalized()
    }

    pub fn fold_cost(&self, mut ctx: CostContext) -> u8 {
        for kind in self.having(Capabilities::OVERRIDES_ACTION_COST) {
            if let Some(hook) = kind.def().cost {
                hook(&mut ctx);
            }
        }
        ctx.total()
    }

    /// Extra dice rolled for every six.
    pub fn dice_per_six(&self, attack: AttackKind) -> u8 {
        self.having(Capabilities::REACTS_TO_SIX)
            .filter_map(|k| k.def().six)
            .map(|hook| hook(attack))
            .sum()
    }

    pub fn reactions(&self, report: &AttackReport) -> Vec<Reaction> {
        self.having(Capabilities::REACTS_TO_ATTACK)
            .filter_map(|k| k.def().attack)
            .filter_map(|hook| hook(report))
            .collect()
    }

    pub fn round_end(&self) -> Vec<RoundEndEffect> {
        self.having(Capabilities::REACTS_TO_ROUND_END)
            .filter_map(|k| k.def().round_end)
            .map(|hook| hook())
            .collect()
    }

    pub fn move_grant(&self) -> MoveGrant {
        let mut grant = MoveGrant::default();
        for kind in self.having(Capabilities::CONTRIBUTES_MOVE_OPTION) {
            if let Some(hook) = kind.def().movement {
                hook(&mut grant);
            }
        }
        grant
    }

    /// Armor threshold after overrides; `None` means no armor roll.
    pub fn armor(&self, base: Option<u8>) -> Option<u8> {
        let mut armor = base;
        for kind in self.having(Capabilities::OVERRIDES_ARMOR) {
            if let Some(hook) = kind.def().armor {
                armor = hook(armor);
            }
        }
        armor
    }

    pub fn extra_actions(&self) -> u8 {
        self.skills.iter().map(|k| k.def().extra_actions).sum()
    }

    pub fn free_actions(&self) -> FreeActions {
        self.skills
            .iter()
            .fold(FreeActions::empty(), |acc, k| acc | k.def().free)
    }
}
