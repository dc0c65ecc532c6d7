//! Equipment table, inventories and the search deck.
mod deck;
mod inventory;

pub use deck::EquipmentDeck;
pub use inventory::{Inventory, Slot};

use bitflags::bitflags;

use crate::action::AttackKind;
use crate::skills::SkillKind;
use crate::state::EquipmentId;

bitflags! {
    /// Capability flags of an equipment kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EquipmentTraits: u16 {
        const MELEE        = 1 << 0;
        const RANGED       = 1 << 1;
        const MAGIC        = 1 << 2;
        const THROWABLE    = 1 << 3;
        const ENCHANTMENT  = 1 << 4;
        const BODY_ARMOR   = 1 << 5;
        const HAND_ARMOR   = 1 << 6;
        const DUAL         = 1 << 7;
        const RELOAD       = 1 << 8;
        const NOISY_ATTACK = 1 << 9;
        const NOISY_DOOR   = 1 << 10;
        const DRAGON_BILE  = 1 << 11;
        const TORCH        = 1 << 12;
    }
}

/// Base attack numbers printed on a weapon card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackProfile {
    pub dice: u8,
    pub to_hit: u8,
    pub damage: u8,
    pub min_range: u8,
    pub max_range: u8,
}

/// What an enchantment does to the survivors in its target zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Enchantment {
    /// Removes wounds.
    Heal(u8),
    /// Temporary skill until the end of the round.
    Grant(SkillKind),
}

#[derive(Clone, Copy, Debug)]
pub struct EquipmentDef {
    pub traits: EquipmentTraits,
    pub attack: Option<AttackProfile>,
    /// A door-opening roll succeeds on this value or more.
    pub door_breach: Option<u8>,
    /// Armor roll succeeds on this value or more.
    pub armor: Option<u8>,
    pub intrinsic: &'static [SkillKind],
    pub enchantment: Option<Enchantment>,
    /// Range of throwables and enchantments.
    pub range: (u8, u8),
    /// Copies in a fresh equipment deck.
    pub copies: u8,
}

const fn weapon(
    traits: EquipmentTraits,
    dice: u8,
    to_hit: u8,
    damage: u8,
    range: (u8, u8),
) -> EquipmentDef {
    EquipmentDef {
        traits,
        attack: Some(AttackProfile {
            dice,
            to_hit,
            damage,
            min_range: range.0,
            max_range: range.1,
        }),
        door_breach: None,
        armor: None,
        intrinsic: &[],
        enchantment: None,
        range,
        copies: 1,
    }
}

const fn gear(traits: EquipmentTraits, range: (u8, u8)) -> EquipmentDef {
    EquipmentDef {
        traits,
        attack: None,
        door_breach: None,
        armor: None,
        intrinsic: &[],
        enchantment: None,
        range,
        copies: 1,
    }
}

const fn copies(mut def: EquipmentDef, copies: u8) -> EquipmentDef {
    def.copies = copies;
    def
}

const fn breach(mut def: EquipmentDef, threshold: u8) -> EquipmentDef {
    def.door_breach = Some(threshold);
    def
}

const fn armor(mut def: EquipmentDef, threshold: u8) -> EquipmentDef {
    def.armor = Some(threshold);
    def
}

type T = EquipmentTraits;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentKind {
    Dagger,
    Sword,
    Axe,
    Crowbar,
    GreatSword,
    Hammer,
    ShortBow,
    LongBow,
    Crossbow,
    HandCrossbow,
    FireStrike,
    ManaBlast,
    Inferno,
    LightningBolt,
    Healing,
    IronSkin,
    Hasten,
    DragonBile,
    Torch,
    LeatherArmor,
    PlateArmor,
    Shield,
}

static EQUIPMENT: [EquipmentDef; <EquipmentKind as strum::EnumCount>::COUNT] = [
    // Dagger
    copies(weapon(T::MELEE.union(T::DUAL), 1, 4, 1, (0, 0)), 4),
    // Sword
    copies(weapon(T::MELEE.union(T::DUAL), 1, 4, 1, (0, 0)), 3),
    // Axe
    copies(breach(weapon(T::MELEE.union(T::NOISY_DOOR), 1, 4, 2, (0, 0)), 1), 3),
    // Crowbar
    copies(breach(weapon(T::MELEE, 1, 5, 1, (0, 0)), 1), 2),
    // GreatSword
    weapon(T::MELEE.union(T::NOISY_ATTACK), 5, 5, 1, (0, 0)),
    // Hammer
    copies(
        breach(weapon(T::MELEE.union(T::NOISY_ATTACK).union(T::NOISY_DOOR), 1, 5, 2, (0, 0)), 1),
        2,
    ),
    // ShortBow
    copies(weapon(T::RANGED, 1, 3, 1, (0, 1)), 3),
    // LongBow
    copies(weapon(T::RANGED, 1, 3, 2, (1, 3)), 2),
    // Crossbow
    copies(weapon(T::RANGED.union(T::RELOAD), 2, 4, 2, (1, 2)), 2),
    // HandCrossbow
    copies(weapon(T::RANGED.union(T::RELOAD).union(T::DUAL), 2, 4, 1, (0, 1)), 2),
    // FireStrike
    copies(weapon(T::MAGIC, 2, 4, 1, (0, 1)), 2),
    // ManaBlast
    copies(weapon(T::MAGIC, 1, 4, 1, (0, 2)), 2),
    // Inferno
    EquipmentDef {
        intrinsic: &[SkillKind::Ignite],
        ..weapon(T::MAGIC.union(T::NOISY_ATTACK), 4, 4, 1, (0, 1))
    },
    // LightningBolt
    EquipmentDef {
        intrinsic: &[SkillKind::RollSixMagic],
        ..weapon(T::MAGIC, 1, 4, 1, (0, 3))
    },
    // Healing
    EquipmentDef {
        enchantment: Some(Enchantment::Heal(1)),
        ..copies(gear(T::ENCHANTMENT, (0, 1)), 2)
    },
    // IronSkin
    EquipmentDef {
        enchantment: Some(Enchantment::Grant(SkillKind::IronHide)),
        ..gear(T::ENCHANTMENT, (0, 1))
    },
    // Hasten
    EquipmentDef {
        enchantment: Some(Enchantment::Grant(SkillKind::Sprint)),
        ..gear(T::ENCHANTMENT, (0, 0))
    },
    // DragonBile
    copies(gear(T::THROWABLE.union(T::DRAGON_BILE), (0, 1)), 3),
    // Torch
    copies(gear(T::THROWABLE.union(T::TORCH), (0, 1)), 2),
    // LeatherArmor
    copies(armor(gear(T::BODY_ARMOR, (0, 0)), 5), 2),
    // PlateArmor
    armor(gear(T::BODY_ARMOR, (0, 0)), 4),
    // Shield
    copies(armor(gear(T::HAND_ARMOR, (0, 0)), 5), 2),
];

impl EquipmentKind {
    #[inline]
    pub fn def(self) -> &'static EquipmentDef {
        &EQUIPMENT[self as usize]
    }

    #[inline]
    pub fn traits(self) -> EquipmentTraits {
        self.def().traits
    }

    /// The attack class this weapon makes, if it is a weapon.
    pub fn attack_kind(self) -> Option<AttackKind> {
        let traits = self.traits();
        if traits.contains(EquipmentTraits::MELEE) {
            Some(AttackKind::Melee)
        } else if traits.contains(EquipmentTraits::RANGED) {
            Some(AttackKind::Ranged)
        } else if traits.contains(EquipmentTraits::MAGIC) {
            Some(AttackKind::Magic)
        } else {
            None
        }
    }

    pub fn is_armor(self) -> bool {
        self.traits()
            .intersects(EquipmentTraits::BODY_ARMOR | EquipmentTraits::HAND_ARMOR)
    }
}

/// One physical equipment card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
    /// Only meaningful for reload weapons; starts loaded.
    pub loaded: bool,
}

impl Equipment {
    pub fn new(id: EquipmentId, kind: EquipmentKind) -> Self {
        Self {
            id,
            kind,
            loaded: true,
        }
    }

    pub fn needs_reload(&self) -> bool {
        self.kind.traits().contains(EquipmentTraits::RELOAD) && !self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_weapon_has_a_sane_profile() {
        for kind in EquipmentKind::iter() {
            let def = kind.def();
            if let Some(attack) = def.attack {
                assert!(kind.attack_kind().is_some(), "{kind} has no attack class");
                assert!((2..=6).contains(&attack.to_hit), "{kind}");
                assert!(attack.min_range <= attack.max_range, "{kind}");
                assert!(attack.dice > 0, "{kind}");
            }
            assert!(def.copies > 0, "{kind}");
        }
    }

    #[test]
    fn table_rows_line_up_with_kinds() {
        assert_eq!(EquipmentKind::Axe.def().door_breach, Some(1));
        assert_eq!(EquipmentKind::PlateArmor.def().armor, Some(4));
        assert_eq!(EquipmentKind::Inferno.def().intrinsic, &[SkillKind::Ignite]);
        assert!(EquipmentKind::Crossbow.traits().contains(EquipmentTraits::RELOAD));
        assert!(EquipmentKind::Torch.traits().contains(EquipmentTraits::TORCH));
        assert_eq!(
            EquipmentKind::Healing.def().enchantment,
            Some(Enchantment::Heal(1))
        );
    }

    #[test]
    fn names_parse_in_snake_case() {
        assert_eq!(
            "hand_crossbow".parse::<EquipmentKind>().unwrap(),
            EquipmentKind::HandCrossbow
        );
    }
}
