//! Attack resolution against the live game state.
//!
//! An attack is resolved in two steps so the engine can suspend on a reroll
//! decision in between: [`prepare`] folds the stat and rolls the pool, then
//! [`finish`] allocates hits and applies every consequence.

use std::cmp::Reverse;

use tracing::debug;

use crate::action::AttackKind;
use crate::actor::{Actor, ActorKind, AdversaryKind, Familiar};
use crate::config::RerollBand;
use crate::dice::DiceBag;
use crate::skills::{AttackReport, ModifierPipeline, Reaction, SkillKind};
use crate::state::{ActorId, GameState, ZoneId};

use super::targeting::{HitOutcome, Target, allocate, order_targets};
use super::Stat;

/// A rolled attack waiting for allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAttack {
    pub attacker: ActorId,
    pub origin: ZoneId,
    pub zone: ZoneId,
    /// Effective stat after the modifier fold.
    pub stat: Stat,
    /// Modifiers in fold order: the attacker's skills, then intrinsics.
    pub modifiers: Vec<SkillKind>,
    pub faces: Vec<u8>,
    pub rerolled: bool,
}

impl PendingAttack {
    pub fn hits(&self) -> u8 {
        self.faces
            .iter()
            .filter(|f| self.stat.is_hit(**f))
            .count()
            .min(u8::MAX as usize) as u8
    }

    pub fn pipeline(&self) -> ModifierPipeline {
        ModifierPipeline::new(self.modifiers.iter().copied())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RerollDecision {
    Keep,
    Reroll,
    /// Shortfall is in the ambiguous band; the attacker decides.
    Ask,
}

/// Outcome of one hit on a friendly actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wound {
    pub target: ActorId,
    /// Stopped by an armor roll.
    pub negated: bool,
    pub killed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub faces: Vec<u8>,
    pub hits: u8,
    pub outcomes: Vec<HitOutcome>,
    pub destroyed: Vec<(ActorId, AdversaryKind)>,
    pub friendly: Vec<Wound>,
    pub reactions: Vec<Reaction>,
    pub xp: u16,
    /// Zones swept by dragon fire during the attack.
    pub area_effects: Vec<ZoneId>,
}

impl AttackResult {
    fn merge(&mut self, other: AttackResult) {
        self.destroyed.extend(other.destroyed);
        self.friendly.extend(other.friendly);
        self.xp += other.xp;
        self.area_effects.extend(other.area_effects);
    }

    pub fn necromancers_destroyed(&self) -> usize {
        self.destroyed
            .iter()
            .filter(|(_, k)| *k == AdversaryKind::Necromancer)
            .count()
    }
}

/// Rolls `stat.dice` faces plus the dice granted for sixes, cascading until
/// no new six is rolled or `cap` extra dice have been drawn.
pub fn roll_pool(dice: &mut DiceBag, stat: &Stat, per_six: u8, cap: u8) -> Vec<u8> {
    let mut faces = dice.roll(stat.dice);
    let mut sixes = faces.iter().filter(|f| **f == 6).count() as u32;
    let mut extra = 0u32;
    while sixes > 0 && per_six > 0 && extra < cap as u32 {
        let n = (sixes * per_six as u32).min(cap as u32 - extra);
        let more = dice.roll(n as u8);
        sixes = more.iter().filter(|f| **f == 6).count() as u32;
        extra += n;
        faces.extend(more);
    }
    faces
}

/// Folds the attacker's modifiers over `base` and rolls the pool.
pub fn prepare(
    state: &mut GameState,
    attacker: ActorId,
    zone: ZoneId,
    base: Stat,
    intrinsics: &[SkillKind],
) -> Option<PendingAttack> {
    let actor = state.actors.get(attacker)?;
    let origin = state.board.zone_of(attacker)?;
    let modifiers: Vec<SkillKind> = match &actor.kind {
        ActorKind::Survivor(s) => s.skills.iter().chain(intrinsics.iter().copied()).collect(),
        _ => intrinsics.to_vec(),
    };
    let pipeline = ModifierPipeline::new(modifiers.iter().copied());
    let stat = pipeline.fold_stat(base);
    let faces = if stat.misfire {
        Vec::new()
    } else {
        roll_pool(
            &mut state.dice,
            &stat,
            pipeline.dice_per_six(stat.attack),
            state.config.max_six_cascade,
        )
    };
    debug!(
        target: "horde::combat",
        %attacker,
        %zone,
        attack = %stat.attack,
        dice = stat.dice,
        to_hit = stat.to_hit,
        ?faces,
        "attack rolled"
    );
    Some(PendingAttack {
        attacker,
        origin,
        zone,
        stat,
        modifiers,
        faces,
        rerolled: false,
    })
}

/// Whether the pool should be kept, rerolled, or left to the attacker.
pub fn reroll_decision(
    pending: &PendingAttack,
    targets: usize,
    band: RerollBand,
) -> RerollDecision {
    if !pending.stat.reroll || pending.rerolled || pending.stat.misfire {
        return RerollDecision::Keep;
    }
    let hits = pending.hits() as usize;
    if hits == 0 {
        return RerollDecision::Reroll;
    }
    let shortfall = targets.saturating_sub(hits).min(u8::MAX as usize) as u8;
    if shortfall == 0 {
        RerollDecision::Keep
    } else if band.contains(shortfall) {
        RerollDecision::Ask
    } else if shortfall > band.max_shortfall {
        RerollDecision::Reroll
    } else {
        RerollDecision::Keep
    }
}

/// Rerolls the whole pool once.
pub fn reroll(state: &mut GameState, pending: &mut PendingAttack) {
    let per_six = pending.pipeline().dice_per_six(pending.stat.attack);
    pending.faces = roll_pool(
        &mut state.dice,
        &pending.stat,
        per_six,
        state.config.max_six_cascade,
    );
    pending.rerolled = true;
    debug!(
        target: "horde::combat",
        attacker = %pending.attacker,
        faces = ?pending.faces,
        "pool rerolled"
    );
}

/// Hostiles in `zone` that `attack` can hurt.
pub fn hostile_targets(state: &GameState, zone: ZoneId, attack: AttackKind) -> Vec<Target> {
    state
        .actors
        .in_zone(&state.board, zone)
        .filter_map(|a| a.adversary().map(|adv| (a.id, adv.kind)))
        .filter(|(_, kind)| !kind.is_immune(attack))
        .map(|(id, kind)| Target::new(id, kind))
        .collect()
}

/// Friendly actors in `zone`: survivors before familiars, most health left
/// first.
pub fn friendly_targets(state: &GameState, zone: ZoneId, exclude: Option<ActorId>) -> Vec<ActorId> {
    let mut friends: Vec<(bool, Reverse<u8>, ActorId)> = state
        .actors
        .in_zone(&state.board, zone)
        .filter(|a| a.is_friendly() && a.is_alive() && Some(a.id) != exclude)
        .map(|a| match &a.kind {
            ActorKind::Survivor(s) => (false, Reverse(s.health_left()), a.id),
            ActorKind::Familiar(f) => {
                (true, Reverse(Familiar::HEALTH.saturating_sub(f.wounds)), a.id)
            }
            _ => (true, Reverse(0), a.id),
        })
        .collect();
    friends.sort();
    friends.into_iter().map(|(_, _, id)| id).collect()
}

/// Applies `damage` to a friendly actor, after an armor roll when allowed.
pub fn wound_friendly(
    state: &mut GameState,
    target: ActorId,
    damage: u8,
    armor_roll: bool,
) -> Wound {
    let mut wound = Wound {
        target,
        negated: false,
        killed: false,
    };
    let armor = state
        .actors
        .get(target)
        .and_then(Actor::survivor)
        .and_then(|s| s.armor());
    if armor_roll && let Some(threshold) = armor {
        let face = state.dice.draw();
        if face >= threshold {
            wound.negated = true;
            debug!(target: "horde::combat", %target, face, threshold, "armor held");
            return wound;
        }
    }
    match state.actors.get_mut(target).map(|a| &mut a.kind) {
        Some(ActorKind::Survivor(s)) => wound.killed = s.wound(damage),
        Some(ActorKind::Familiar(f)) => {
            let was_alive = f.is_alive();
            f.wounds = f.wounds.saturating_add(damage);
            wound.killed = was_alive && !f.is_alive();
        }
        _ => {}
    }
    if wound.killed {
        state.actors.take_off_board(&mut state.board, target);
        debug!(target: "horde::combat", %target, "friendly actor killed");
    }
    wound
}

/// Survivor credited with experience for kills by `actor`.
fn credited_survivor(state: &GameState, actor: ActorId) -> Option<ActorId> {
    match &state.actors.get(actor)?.kind {
        ActorKind::Survivor(_) => Some(actor),
        ActorKind::Familiar(f) => Some(f.owner),
        _ => None,
    }
}

fn grant_xp(state: &mut GameState, actor: ActorId, xp: u16) {
    if xp == 0 {
        return;
    }
    if let Some(id) = credited_survivor(state, actor)
        && let Some(s) = state.actors.get_mut(id).and_then(Actor::survivor_mut)
    {
        s.experience = s.experience.saturating_add(xp);
    }
}

fn destroy(state: &mut GameState, id: ActorId, kind: AdversaryKind, result: &mut AttackResult) {
    if state.actors.remove(&mut state.board, id).is_some() {
        result.destroyed.push((id, kind));
        result.xp += kind.def().xp;
    }
}

/// Allocates the rolled hits and applies kills, friendly fire, reactions,
/// experience and noise.
pub fn finish(state: &mut GameState, pending: &PendingAttack) -> AttackResult {
    let stat = &pending.stat;
    let hits = pending.hits();
    let mut targets = hostile_targets(state, pending.zone, stat.attack);
    let allocation = allocate(&targets, hits, stat);
    let mut result = AttackResult {
        faces: pending.faces.clone(),
        hits,
        outcomes: allocation.outcomes.clone(),
        ..AttackResult::default()
    };

    for outcome in &allocation.outcomes {
        if let HitOutcome::Destroyed(id) = outcome
            && let Some(t) = targets.iter().find(|t| t.id == *id).copied()
        {
            destroy(state, t.id, t.kind, &mut result);
        }
    }

    let shielded = stat.point_blank && pending.zone == pending.origin;
    if allocation.surplus > 0 && stat.friendly_fire && !shielded {
        for _ in 0..allocation.surplus {
            let Some(friend) = friendly_targets(state, pending.zone, Some(pending.attacker))
                .first()
                .copied()
            else {
                break;
            };
            result
                .friendly
                .push(wound_friendly(state, friend, stat.damage, true));
        }
    }

    let report = AttackReport {
        attack: stat.attack,
        zone: pending.zone,
        damage: stat.damage,
        destroyed: result.destroyed.len().min(u8::MAX as usize) as u8,
    };
    let reactions = pending.pipeline().reactions(&report);
    for reaction in &reactions {
        match reaction {
            Reaction::BonusKill => {
                // the extra kill obeys toughness like any hit
                targets.retain(|t| t.min_damage <= stat.damage && state.actors.get(t.id).is_some());
                order_targets(&mut targets, stat);
                if let Some(t) = targets.first().copied() {
                    destroy(state, t.id, t.kind, &mut result);
                }
            }
            Reaction::Heal(amount) => {
                if let Some(s) = state
                    .actors
                    .get_mut(pending.attacker)
                    .and_then(Actor::survivor_mut)
                {
                    s.heal(*amount);
                }
            }
            Reaction::Ignite => {
                if state.board.ignite(pending.zone).unwrap_or(false) {
                    // burned hostiles join the attack's experience, granted below
                    let fire = dragon_fire(state, pending.zone, None);
                    result.merge(fire);
                }
            }
        }
    }
    result.reactions = reactions;

    grant_xp(state, pending.attacker, result.xp);

    if stat.noisy {
        // the origin zone always exists for a placed attacker
        let _ = state.board.add_noise_token(pending.origin);
    }

    debug!(
        target: "horde::combat",
        attacker = %pending.attacker,
        hits,
        destroyed = result.destroyed.len(),
        friendly = result.friendly.len(),
        xp = result.xp,
        "attack resolved"
    );
    result
}

/// Burns every actor in `zone` except siege engines. Hostiles destroyed
/// this way credit `thrower` with experience.
pub fn dragon_fire(state: &mut GameState, zone: ZoneId, thrower: Option<ActorId>) -> AttackResult {
    let mut result = AttackResult::default();
    let victims: Vec<ActorId> = state
        .actors
        .in_zone(&state.board, zone)
        .filter(|a| a.siege().is_none())
        .map(|a| a.id)
        .collect();
    let mut xp = 0u16;
    for id in victims {
        let Some(actor) = state.actors.get(id) else {
            continue;
        };
        match &actor.kind {
            ActorKind::Adversary(adv) => {
                let kind = adv.kind;
                if state.actors.remove(&mut state.board, id).is_some() {
                    result.destroyed.push((id, kind));
                    xp = xp.saturating_add(kind.def().xp);
                }
            }
            ActorKind::Survivor(s) => {
                let health = s.health;
                let wound = wound_friendly(state, id, health, false);
                result.friendly.push(wound);
            }
            ActorKind::Familiar(_) => {
                let wound = wound_friendly(state, id, Familiar::HEALTH, false);
                result.friendly.push(wound);
            }
            ActorKind::Siege(_) => {}
        }
    }
    if let Some(thrower) = thrower {
        grant_xp(state, thrower, xp);
    }
    result.xp = xp;
    result.area_effects.push(zone);
    debug!(target: "horde::combat", %zone, destroyed = result.destroyed.len(), "dragon fire");
    result
}

/// One adversary action against the friendly actors sharing its zone.
/// Returns `None` when there is nobody to hit or the adversary deals no
/// damage.
pub fn adversary_attack(state: &mut GameState, attacker: ActorId) -> Option<Wound> {
    let kind = state.actors.get(attacker)?.adversary()?.kind;
    let def = kind.def();
    if def.attack_damage == 0 {
        return None;
    }
    let zone = state.board.zone_of(attacker)?;
    let target = friendly_targets(state, zone, None).first().copied()?;
    let wound = wound_friendly(state, target, def.attack_damage, !def.ignores_armor);
    debug!(
        target: "horde::combat",
        %attacker,
        %target,
        negated = wound.negated,
        killed = wound.killed,
        "adversary attack"
    );
    Some(wound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Adversary, Survivor};
    use crate::item::{AttackProfile, Equipment, EquipmentKind, Slot};
    use crate::state::{EquipmentId, PlayerId};
    use crate::state::tests::street_state;

    fn sword() -> Stat {
        Stat::from_profile(
            AttackKind::Melee,
            AttackProfile {
                dice: 2,
                to_hit: 4,
                damage: 1,
                min_range: 0,
                max_range: 0,
            },
        )
    }

    fn spawn_walkers(state: &mut GameState, n: usize) -> Vec<ActorId> {
        (0..n)
            .map(|_| {
                state
                    .actors
                    .spawn(
                        &mut state.board,
                        ActorKind::Adversary(Adversary::new(AdversaryKind::Walker)),
                        0,
                        ZoneId(1),
                    )
                    .unwrap()
                    .id
            })
            .collect()
    }

    fn survivor(state: &mut GameState) -> ActorId {
        state
            .actors
            .spawn(
                &mut state.board,
                ActorKind::Survivor(Survivor::new("Ann", PlayerId(0), 3)),
                3,
                ZoneId(1),
            )
            .unwrap()
            .id
    }

    #[test]
    fn two_hits_destroy_two_of_three_walkers() {
        let mut state = street_state(&[4, 5]);
        let hero = survivor(&mut state);
        let walkers = spawn_walkers(&mut state, 3);
        let pending = prepare(&mut state, hero, ZoneId(1), sword(), &[]).unwrap();
        assert_eq!(pending.faces, vec![4, 5]);
        let result = finish(&mut state, &pending);
        assert_eq!(result.hits, 2);
        let gone: Vec<_> = result.destroyed.iter().map(|(id, _)| *id).collect();
        assert_eq!(gone, walkers[..2].to_vec());
        assert!(state.actors.get(walkers[2]).is_some());
        let xp = state.actors.get(hero).and_then(Actor::survivor).unwrap().experience;
        assert_eq!(xp, 2);
    }

    #[test]
    fn sixes_cascade_up_to_the_cap() {
        let mut bag = DiceBag::stacked(&[6, 6, 6, 6, 6, 6, 6, 6]);
        let faces = roll_pool(&mut bag, &sword(), 1, 3);
        assert_eq!(faces.len(), 5);
    }

    #[test]
    fn misfire_rolls_nothing() {
        let mut state = street_state(&[6, 6]);
        let hero = survivor(&mut state);
        spawn_walkers(&mut state, 1);
        let mut bow = Equipment::new(EquipmentId(1), EquipmentKind::Crossbow);
        bow.loaded = false;
        let stat = Stat::from_weapons(&[bow]).unwrap();
        let pending = prepare(&mut state, hero, ZoneId(1), stat, &[]).unwrap();
        assert!(pending.faces.is_empty());
        assert_eq!(state.dice.pending(), &[6, 6]);
    }

    #[test]
    fn reroll_band_rules() {
        let mut state = street_state(&[]);
        let hero = survivor(&mut state);
        let mut stat = sword();
        stat.reroll = true;
        let mut pending = PendingAttack {
            attacker: hero,
            origin: ZoneId(1),
            zone: ZoneId(1),
            stat,
            modifiers: Vec::new(),
            faces: vec![1, 1],
            rerolled: false,
        };
        let band = RerollBand {
            min_shortfall: 1,
            max_shortfall: 2,
        };
        assert_eq!(reroll_decision(&pending, 3, band), RerollDecision::Reroll);
        pending.faces = vec![5, 1];
        assert_eq!(reroll_decision(&pending, 1, band), RerollDecision::Keep);
        assert_eq!(reroll_decision(&pending, 3, band), RerollDecision::Ask);
        assert_eq!(reroll_decision(&pending, 5, band), RerollDecision::Reroll);
        pending.rerolled = true;
        assert_eq!(reroll_decision(&pending, 5, band), RerollDecision::Keep);
    }

    #[test]
    fn surplus_ranged_hits_wound_friends() {
        let mut state = street_state(&[5, 5, 5]);
        let shooter = survivor(&mut state);
        let friend = survivor(&mut state);
        spawn_walkers(&mut state, 1);
        let bow = Equipment::new(EquipmentId(1), EquipmentKind::ShortBow);
        let mut stat = Stat::from_weapons(&[bow]).unwrap();
        stat.dice = 3;
        stat.to_hit = 3;
        let pending = prepare(&mut state, shooter, ZoneId(1), stat, &[]).unwrap();
        let result = finish(&mut state, &pending);
        assert_eq!(result.destroyed.len(), 1);
        assert_eq!(result.friendly.len(), 2);
        assert!(result.friendly.iter().all(|w| w.target == friend));
        let s = state.actors.get(friend).and_then(Actor::survivor).unwrap();
        assert_eq!(s.wounds, 2);
    }

    #[test]
    fn immune_targets_are_skipped() {
        let mut state = street_state(&[6]);
        let hero = survivor(&mut state);
        let shade = state
            .actors
            .spawn(
                &mut state.board,
                ActorKind::Adversary(Adversary::new(AdversaryKind::Shade)),
                0,
                ZoneId(1),
            )
            .unwrap()
            .id;
        assert!(hostile_targets(&state, ZoneId(1), AttackKind::Ranged).is_empty());
        let mut stat = sword();
        stat.dice = 1;
        let pending = prepare(&mut state, hero, ZoneId(1), stat, &[]).unwrap();
        finish(&mut state, &pending);
        assert!(state.actors.get(shade).is_none());
    }

    #[test]
    fn armor_roll_can_negate_an_adversary_hit() {
        let mut state = street_state(&[5, 2]);
        let hero = survivor(&mut state);
        state
            .actors
            .get_mut(hero)
            .and_then(Actor::survivor_mut)
            .unwrap()
            .inventory
            .put(Equipment::new(EquipmentId(9), EquipmentKind::PlateArmor), Slot::Body)
            .unwrap();
        let walker = spawn_walkers(&mut state, 1)[0];
        let first = adversary_attack(&mut state, walker).unwrap();
        assert!(first.negated);
        let second = adversary_attack(&mut state, walker).unwrap();
        assert!(!second.negated);
    }

    #[test]
    fn dragon_fire_burns_everything_but_engines() {
        let mut state = street_state(&[]);
        let hero = survivor(&mut state);
        let walkers = spawn_walkers(&mut state, 2);
        let result = dragon_fire(&mut state, ZoneId(1), None);
        assert_eq!(result.destroyed.len(), 2);
        assert!(walkers.iter().all(|w| state.actors.get(*w).is_none()));
        assert!(!state.actors.get(hero).unwrap().is_alive());
        assert!(state.board.zone_of(hero).is_none());
    }

    fn spawn(state: &mut GameState, kind: AdversaryKind, zone: ZoneId) -> ActorId {
        state
            .actors
            .spawn(
                &mut state.board,
                ActorKind::Adversary(Adversary::new(kind)),
                0,
                zone,
            )
            .unwrap()
            .id
    }

    fn one_die_sword() -> Stat {
        let mut stat = sword();
        stat.dice = 1;
        stat
    }

    #[test]
    fn bonus_kill_respects_toughness() {
        let mut state = street_state(&[6]);
        let hero = survivor(&mut state);
        state
            .survivor_mut(hero)
            .unwrap()
            .skills
            .acquire(SkillKind::Reaper);
        let walker = spawn(&mut state, AdversaryKind::Walker, ZoneId(1));
        let brute = spawn(&mut state, AdversaryKind::Brute, ZoneId(1));
        assert!(AdversaryKind::Brute.def().min_damage > one_die_sword().damage);

        let pending = prepare(&mut state, hero, ZoneId(1), one_die_sword(), &[]).unwrap();
        let result = finish(&mut state, &pending);
        assert_eq!(result.reactions, vec![Reaction::BonusKill]);
        assert_eq!(result.destroyed, vec![(walker, AdversaryKind::Walker)]);
        assert!(state.actors.get(brute).is_some());
    }

    #[test]
    fn bonus_kill_takes_a_second_weak_target() {
        let mut state = street_state(&[6]);
        let hero = survivor(&mut state);
        state
            .survivor_mut(hero)
            .unwrap()
            .skills
            .acquire(SkillKind::Reaper);
        let walkers = spawn_walkers(&mut state, 2);

        let pending = prepare(&mut state, hero, ZoneId(1), one_die_sword(), &[]).unwrap();
        let result = finish(&mut state, &pending);
        assert_eq!(result.hits, 1);
        assert_eq!(result.destroyed.len(), 2);
        assert!(walkers.iter().all(|w| state.actors.get(*w).is_none()));
    }

    #[test]
    fn ignite_reaction_burns_the_zone_for_the_caster() {
        use crate::board::{BoardBuilder, Environment};
        use crate::config::GameConfig;
        use crate::item::EquipmentDeck;
        use crate::spawn::SpawnDeck;
        use crate::state::CellPos;

        // caster in zone 1, bile-soaked walkers in zone 2
        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .start(CellPos::new(0, 0))
            .build()
            .unwrap();
        let mut state = GameState::with_decks(
            DiceBag::stacked(&[1]),
            EquipmentDeck::stacked(&[]),
            SpawnDeck::stacked(&[]),
            GameConfig::default(),
            board,
        );
        state.add_player("p0");
        let hero = survivor(&mut state);
        state.board.set_dragon_bile(ZoneId(2), true).unwrap();
        let walkers = [
            spawn(&mut state, AdversaryKind::Walker, ZoneId(2)),
            spawn(&mut state, AdversaryKind::Walker, ZoneId(2)),
        ];
        let spell = Stat::from_profile(
            AttackKind::Magic,
            AttackProfile {
                dice: 1,
                to_hit: 4,
                damage: 1,
                min_range: 0,
                max_range: 1,
            },
        );

        let pending = prepare(&mut state, hero, ZoneId(2), spell, &[SkillKind::Ignite]).unwrap();
        assert_eq!(pending.faces, vec![1]);
        let result = finish(&mut state, &pending);
        assert_eq!(result.hits, 0);
        assert_eq!(result.reactions, vec![Reaction::Ignite]);
        assert_eq!(result.area_effects, vec![ZoneId(2)]);
        assert!(walkers.iter().all(|w| state.actors.get(*w).is_none()));
        let xp = state.actors.get(hero).and_then(Actor::survivor).unwrap().experience;
        assert_eq!(xp, 2 * AdversaryKind::Walker.def().xp);
    }
}
