use crate::action::{ActionKind, AttackKind};
use crate::item::{AttackProfile, Equipment, EquipmentTraits};

/// How surplus hits are ordered across targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Targeting {
    /// Fixed per-type priority order.
    #[default]
    Priority,
    /// Favors targets the attack can actually destroy.
    Marksman,
}

/// Effective attack numbers for one resolution. Built fresh from the weapon
/// profile and folded through the modifier pipeline; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    pub action: ActionKind,
    pub attack: AttackKind,
    pub dice: u8,
    pub to_hit: u8,
    pub damage: u8,
    pub min_range: u8,
    pub max_range: u8,
    pub door_breach: Option<u8>,
    pub friendly_fire: bool,
    /// Point-blank shots into the attacker's own zone skip friendly fire.
    pub point_blank: bool,
    pub reroll: bool,
    pub targeting: Targeting,
    pub noisy: bool,
    /// Empty reload weapon: no dice are rolled.
    pub misfire: bool,
}

impl Stat {
    pub fn from_profile(attack: AttackKind, profile: AttackProfile) -> Self {
        Self {
            action: attack.action(),
            attack,
            dice: profile.dice,
            to_hit: profile.to_hit,
            damage: profile.damage,
            min_range: profile.min_range,
            max_range: profile.max_range,
            door_breach: None,
            friendly_fire: attack.is_ranged_like(),
            point_blank: false,
            reroll: false,
            targeting: Targeting::Priority,
            noisy: false,
            misfire: false,
        }
    }

    /// Base stat of one or two wielded weapons. Dual wielding sums the dice
    /// of the weapons that can fire; every other number comes from the first
    /// weapon. With nothing loaded the attack misfires.
    pub fn from_weapons(weapons: &[Equipment]) -> Option<Self> {
        let first = weapons.first()?;
        let attack = first.kind.attack_kind()?;
        let profile = first.kind.def().attack?;
        let mut stat = Self::from_profile(attack, profile);
        stat.door_breach = first.kind.def().door_breach;
        stat.noisy = weapons
            .iter()
            .any(|w| w.kind.traits().contains(EquipmentTraits::NOISY_ATTACK));

        let ready: Vec<&Equipment> = weapons.iter().filter(|w| !w.needs_reload()).collect();
        stat.misfire = ready.is_empty();
        if !stat.misfire {
            stat.dice = ready
                .iter()
                .filter_map(|w| w.kind.def().attack)
                .map(|p| p.dice)
                .sum();
        }
        Some(stat)
    }

    /// Clamps numbers after modifiers have been folded in.
    pub fn normalized(mut self) -> Self {
        self.to_hit = self.to_hit.clamp(2, 6);
        self.min_range = self.min_range.min(self.max_range);
        self
    }

    pub fn is_hit(&self, face: u8) -> bool {
        face >= self.to_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::EquipmentKind;
    use crate::state::EquipmentId;

    #[test]
    fn dual_wield_sums_dice() {
        let daggers = [
            Equipment::new(EquipmentId(1), EquipmentKind::Dagger),
            Equipment::new(EquipmentId(2), EquipmentKind::Dagger),
        ];
        let stat = Stat::from_weapons(&daggers).unwrap();
        assert_eq!(stat.dice, 2);
        assert_eq!(stat.attack, AttackKind::Melee);
        assert!(!stat.friendly_fire);
    }

    #[test]
    fn empty_reload_weapon_misfires() {
        let mut bow = Equipment::new(EquipmentId(1), EquipmentKind::Crossbow);
        bow.loaded = false;
        let stat = Stat::from_weapons(&[bow]).unwrap();
        assert!(stat.misfire);
        assert!(stat.friendly_fire);
    }

    #[test]
    fn only_loaded_half_of_a_pair_rolls() {
        let loaded = Equipment::new(EquipmentId(1), EquipmentKind::HandCrossbow);
        let mut empty = Equipment::new(EquipmentId(2), EquipmentKind::HandCrossbow);
        empty.loaded = false;
        let single = Stat::from_weapons(&[loaded]).unwrap().dice;

        let stat = Stat::from_weapons(&[loaded, empty]).unwrap();
        assert!(!stat.misfire);
        assert_eq!(stat.dice, single);
        // the order of the pair does not matter
        assert_eq!(Stat::from_weapons(&[empty, loaded]).unwrap().dice, single);

        let both = Stat::from_weapons(&[loaded, loaded]).unwrap();
        assert_eq!(both.dice, 2 * single);

        let mut dry = loaded;
        dry.loaded = false;
        assert!(Stat::from_weapons(&[dry, empty]).unwrap().misfire);
    }

    #[test]
    fn armor_is_not_a_weapon() {
        let plate = Equipment::new(EquipmentId(1), EquipmentKind::PlateArmor);
        assert!(Stat::from_weapons(&[plate]).is_none());
    }
}
