//! Static modifier table. One row per [`SkillKind`], hooks are plain functions.

use crate::action::{ActionKind, AttackKind};
use crate::combat::{Stat, Targeting};

use super::{
    AttackReport, Capabilities, CostContext, FreeActions, MoveGrant, Reaction, RoundEndEffect,
    SkillKind,
};

pub type StatHook = fn(&mut Stat);
pub type CostHook = fn(&mut CostContext);
pub type SixHook = fn(AttackKind) -> u8;
pub type AttackHook = fn(&AttackReport) -> Option<Reaction>;
pub type RoundEndHook = fn() -> RoundEndEffect;
pub type MoveHook = fn(&mut MoveGrant);
pub type ArmorHook = fn(Option<u8>) -> Option<u8>;

#[derive(Clone, Copy)]
pub struct SkillDef {
    pub kind: SkillKind,
    pub capabilities: Capabilities,
    pub extra_actions: u8,
    pub free: FreeActions,
    pub stat: Option<StatHook>,
    pub cost: Option<CostHook>,
    pub six: Option<SixHook>,
    pub attack: Option<AttackHook>,
    pub round_end: Option<RoundEndHook>,
    pub movement: Option<MoveHook>,
    pub armor: Option<ArmorHook>,
}

impl std::fmt::Debug for SkillDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillDef")
            .field("kind", &self.kind)
            .field("capabilities", &self.capabilities)
            .field("extra_actions", &self.extra_actions)
            .field("free", &self.free)
            .finish_non_exhaustive()
    }
}

type C = Capabilities;

const fn row(kind: SkillKind) -> SkillDef {
    SkillDef {
        kind,
        capabilities: Capabilities::empty(),
        extra_actions: 0,
        free: FreeActions::empty(),
        stat: None,
        cost: None,
        six: None,
        attack: None,
        round_end: None,
        movement: None,
        armor: None,
    }
}

const fn stat(kind: SkillKind, hook: StatHook) -> SkillDef {
    SkillDef {
        capabilities: C::MUTATES_STAT,
        stat: Some(hook),
        ..row(kind)
    }
}

const fn free(kind: SkillKind, free: FreeActions) -> SkillDef {
    SkillDef { free, ..row(kind) }
}

const fn six(kind: SkillKind, hook: SixHook) -> SkillDef {
    SkillDef {
        capabilities: C::REACTS_TO_SIX,
        six: Some(hook),
        ..row(kind)
    }
}

const fn on_attack(kind: SkillKind, hook: AttackHook) -> SkillDef {
    SkillDef {
        capabilities: C::REACTS_TO_ATTACK,
        attack: Some(hook),
        ..row(kind)
    }
}

const fn movement(kind: SkillKind, hook: MoveHook) -> SkillDef {
    SkillDef {
        capabilities: C::CONTRIBUTES_MOVE_OPTION,
        movement: Some(hook),
        ..row(kind)
    }
}

const fn armor(kind: SkillKind, hook: ArmorHook) -> SkillDef {
    SkillDef {
        capabilities: C::OVERRIDES_ARMOR,
        armor: Some(hook),
        ..row(kind)
    }
}

fn melee(s: &Stat) -> bool {
    s.attack == AttackKind::Melee
}

fn ranged(s: &Stat) -> bool {
    s.attack == AttackKind::Ranged
}

fn magic(s: &Stat) -> bool {
    s.attack == AttackKind::Magic
}

fn combat(s: &Stat) -> bool {
    s.attack.is_combat()
}

fn shooting(s: &Stat) -> bool {
    ranged(s) || magic(s)
}

fn slippery_cost(c: &mut CostContext) {
    if c.action == ActionKind::Move {
        c.hostile_penalty = 0;
    }
}

fn slippery_move(m: &mut MoveGrant) {
    m.ignore_hostiles = true;
}

fn quick_reload_cost(c: &mut CostContext) {
    if c.action == ActionKind::Reload {
        c.cost = 0;
    }
}

fn regenerate() -> RoundEndEffect {
    RoundEndEffect::HealAll
}

static SKILLS: [SkillDef; <SkillKind as strum::EnumCount>::COUNT] = [
    SkillDef {
        extra_actions: 1,
        ..row(SkillKind::PlusOneAction)
    },
    stat(SkillKind::PlusOneDieMelee, |s| {
        if melee(s) {
            s.dice += 1;
        }
    }),
    stat(SkillKind::PlusOneDieRanged, |s| {
        if ranged(s) {
            s.dice += 1;
        }
    }),
    stat(SkillKind::PlusOneDieMagic, |s| {
        if magic(s) {
            s.dice += 1;
        }
    }),
    stat(SkillKind::PlusOneDieCombat, |s| {
        if combat(s) {
            s.dice += 1;
        }
    }),
    stat(SkillKind::PlusOneDamageMelee, |s| {
        if melee(s) {
            s.damage += 1;
        }
    }),
    stat(SkillKind::PlusOneDamageRanged, |s| {
        if ranged(s) {
            s.damage += 1;
        }
    }),
    stat(SkillKind::PlusOneDamageMagic, |s| {
        if magic(s) {
            s.damage += 1;
        }
    }),
    stat(SkillKind::PlusOneToHitMelee, |s| {
        if melee(s) {
            s.to_hit = s.to_hit.saturating_sub(1);
        }
    }),
    stat(SkillKind::PlusOneToHitRanged, |s| {
        if ranged(s) {
            s.to_hit = s.to_hit.saturating_sub(1);
        }
    }),
    stat(SkillKind::PlusOneToHitCombat, |s| {
        if combat(s) {
            s.to_hit = s.to_hit.saturating_sub(1);
        }
    }),
    stat(SkillKind::PlusOneMaxRange, |s| {
        if shooting(s) {
            s.max_range += 1;
        }
    }),
    stat(SkillKind::PointBlank, |s| {
        if shooting(s) {
            s.min_range = 0;
            s.point_blank = true;
        }
    }),
    stat(SkillKind::SteadyHand, |s| s.friendly_fire = false),
    stat(SkillKind::Marksman, |s| {
        if shooting(s) {
            s.targeting = Targeting::Marksman;
        }
    }),
    stat(SkillKind::Lucky, |s| {
        if combat(s) {
            s.reroll = true;
        }
    }),
    SkillDef {
        capabilities: C::OVERRIDES_ACTION_COST.union(C::CONTRIBUTES_MOVE_OPTION),
        cost: Some(slippery_cost),
        movement: Some(slippery_move),
        ..row(SkillKind::Slippery)
    },
    SkillDef {
        capabilities: C::OVERRIDES_ACTION_COST,
        cost: Some(quick_reload_cost),
        ..row(SkillKind::QuickReload)
    },
    free(SkillKind::PlusOneFreeMove, FreeActions::MOVE),
    free(SkillKind::PlusOneFreeMelee, FreeActions::MELEE),
    free(SkillKind::PlusOneFreeRanged, FreeActions::RANGED),
    free(SkillKind::PlusOneFreeMagic, FreeActions::MAGIC),
    free(SkillKind::PlusOneFreeSearch, FreeActions::SEARCH),
    free(SkillKind::PlusOneFreeCombat, FreeActions::COMBAT),
    six(SkillKind::RollSixMelee, |a| (a == AttackKind::Melee) as u8),
    six(SkillKind::RollSixRanged, |a| (a == AttackKind::Ranged) as u8),
    six(SkillKind::RollSixMagic, |a| (a == AttackKind::Magic) as u8),
    six(SkillKind::RollSixCombat, |a| a.is_combat() as u8),
    on_attack(SkillKind::Reaper, |r| {
        (r.attack == AttackKind::Melee && r.destroyed > 0).then_some(Reaction::BonusKill)
    }),
    on_attack(SkillKind::Leech, |r| {
        (r.attack == AttackKind::Melee && r.destroyed > 0).then_some(Reaction::Heal(1))
    }),
    on_attack(SkillKind::Ignite, |r| {
        (r.attack == AttackKind::Magic).then_some(Reaction::Ignite)
    }),
    SkillDef {
        capabilities: C::REACTS_TO_ROUND_END,
        round_end: Some(regenerate),
        ..row(SkillKind::Regeneration)
    },
    movement(SkillKind::PlusOneZonePerMove, |m| m.zones_per_move += 1),
    movement(SkillKind::Sprint, |m| m.sprint = true),
    armor(SkillKind::IronHide, |a| Some(a.map_or(5, |t| t.min(5)))),
    armor(SkillKind::PlusOneArmor, |a| a.map(|t| t.saturating_sub(1).max(2))),
];

impl SkillKind {
    #[inline]
    pub fn def(self) -> &'static SkillDef {
        &SKILLS[self as usize]
    }

    pub fn capabilities(self) -> Capabilities {
        self.def().capabilities
    }
}
