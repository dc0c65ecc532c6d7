//! Hit allocation across the targets of one attack.

use crate::action::AttackKind;
use crate::actor::AdversaryKind;
use crate::state::ActorId;

use super::{Stat, Targeting};

/// One hostile that can receive a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    pub id: ActorId,
    pub kind: AdversaryKind,
    pub min_damage: u8,
    pub priority: u8,
}

impl Target {
    pub fn new(id: ActorId, kind: AdversaryKind) -> Self {
        let def = kind.def();
        Self {
            id,
            kind,
            min_damage: def.min_damage,
            priority: def.targeting_priority,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    Destroyed(ActorId),
    /// The hit landed but did not deal enough damage.
    Defended(ActorId),
}

impl HitOutcome {
    pub fn target(&self) -> ActorId {
        match self {
            HitOutcome::Destroyed(id) | HitOutcome::Defended(id) => *id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    pub outcomes: Vec<HitOutcome>,
    /// Hits left over once every target holds one.
    pub surplus: u8,
}

/// Sorts targets into the order hits are assigned.
///
/// Melee takes the weakest first (minimum damage, then targeting priority);
/// every other attack follows the fixed targeting priority. Marksman moves
/// the targets the attack can destroy to the front, keeping the base order
/// among them.
pub fn order_targets(targets: &mut [Target], stat: &Stat) {
    match stat.attack {
        AttackKind::Melee => targets.sort_by_key(|t| (t.min_damage, t.priority, t.id)),
        _ => targets.sort_by_key(|t| (t.priority, t.id)),
    }
    if stat.targeting == Targeting::Marksman {
        targets.sort_by_key(|t| t.min_damage > stat.damage);
    }
}

/// Assigns `hits` to `targets`, one hit per target. Immune targets must be
/// filtered out by the caller.
pub fn allocate(targets: &[Target], hits: u8, stat: &Stat) -> Allocation {
    let mut ordered = targets.to_vec();
    order_targets(&mut ordered, stat);
    let outcomes: Vec<_> = ordered
        .iter()
        .take(hits as usize)
        .map(|t| {
            if t.min_damage <= stat.damage {
                HitOutcome::Destroyed(t.id)
            } else {
                HitOutcome::Defended(t.id)
            }
        })
        .collect();
    Allocation {
        surplus: hits.saturating_sub(outcomes.len() as u8),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::AttackProfile;

    fn stat(attack: AttackKind, damage: u8) -> Stat {
        Stat::from_profile(
            attack,
            AttackProfile {
                dice: 2,
                to_hit: 4,
                damage,
                min_range: 0,
                max_range: 1,
            },
        )
    }

    fn targets() -> Vec<Target> {
        vec![
            Target::new(ActorId(1), AdversaryKind::Runner),
            Target::new(ActorId(2), AdversaryKind::Brute),
            Target::new(ActorId(3), AdversaryKind::Walker),
        ]
    }

    #[test]
    fn two_hits_on_three_walkers() {
        let walkers: Vec<_> = (1..=3)
            .map(|i| Target::new(ActorId(i), AdversaryKind::Walker))
            .collect();
        let alloc = allocate(&walkers, 2, &stat(AttackKind::Melee, 1));
        assert_eq!(
            alloc.outcomes,
            vec![
                HitOutcome::Destroyed(ActorId(1)),
                HitOutcome::Destroyed(ActorId(2))
            ]
        );
        assert_eq!(alloc.surplus, 0);
    }

    #[test]
    fn melee_takes_weakest_first() {
        let alloc = allocate(&targets(), 3, &stat(AttackKind::Melee, 1));
        let order: Vec<_> = alloc.outcomes.iter().map(HitOutcome::target).collect();
        assert_eq!(order, vec![ActorId(3), ActorId(1), ActorId(2)]);
        assert_eq!(alloc.outcomes[2], HitOutcome::Defended(ActorId(2)));
    }

    #[test]
    fn ranged_follows_priority_and_defended_hits_use_a_slot() {
        let alloc = allocate(&targets(), 2, &stat(AttackKind::Ranged, 1));
        assert_eq!(
            alloc.outcomes,
            vec![
                HitOutcome::Destroyed(ActorId(3)),
                HitOutcome::Defended(ActorId(2))
            ]
        );
    }

    #[test]
    fn marksman_favours_killable_targets() {
        let mut s = stat(AttackKind::Ranged, 1);
        s.targeting = Targeting::Marksman;
        let alloc = allocate(&targets(), 2, &s);
        assert_eq!(
            alloc.outcomes,
            vec![
                HitOutcome::Destroyed(ActorId(3)),
                HitOutcome::Destroyed(ActorId(1))
            ]
        );
    }

    #[test]
    fn surplus_is_reported() {
        let alloc = allocate(&targets()[..1], 4, &stat(AttackKind::Ranged, 1));
        assert_eq!(alloc.outcomes.len(), 1);
        assert_eq!(alloc.surplus, 3);
    }
}
