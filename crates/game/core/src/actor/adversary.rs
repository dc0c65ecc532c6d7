use crate::action::AttackKind;

/// Static numbers for one adversary type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdversaryDef {
    pub actions: u8,
    /// Damage per hit needed to destroy it.
    pub min_damage: u8,
    /// Lower is hit first by ranged and magic attacks.
    pub targeting_priority: u8,
    pub xp: u16,
    pub attack_damage: u8,
    pub ignores_armor: bool,
    pub immune_to: Option<AttackKind>,
    pub turn_priority: u8,
    pub moves: bool,
}

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
pub enum AdversaryKind {
    Walker,
    Runner,
    Brute,
    Abomination,
    Necromancer,
    /// Incorporeal; shrugs off ranged attacks.
    Shade,
}

const fn def(
    actions: u8,
    min_damage: u8,
    targeting_priority: u8,
    xp: u16,
    attack_damage: u8,
    turn_priority: u8,
) -> AdversaryDef {
    AdversaryDef {
        actions,
        min_damage,
        targeting_priority,
        xp,
        attack_damage,
        ignores_armor: false,
        immune_to: None,
        turn_priority,
        moves: true,
    }
}

static ADVERSARIES: [AdversaryDef; <AdversaryKind as strum::EnumCount>::COUNT] = [
    def(1, 1, 1, 1, 1, 10),
    def(2, 1, 3, 1, 1, 15),
    def(1, 2, 2, 1, 1, 20),
    AdversaryDef {
        ignores_armor: true,
        ..def(1, 3, 2, 5, 1, 30)
    },
    AdversaryDef {
        moves: false,
        ..def(1, 1, 4, 1, 0, 40)
    },
    AdversaryDef {
        immune_to: Some(AttackKind::Ranged),
        ..def(1, 1, 1, 1, 1, 12)
    },
];

impl AdversaryKind {
    #[inline]
    pub fn def(self) -> &'static AdversaryDef {
        &ADVERSARIES[self as usize]
    }

    pub fn is_immune(self, attack: AttackKind) -> bool {
        self.def().immune_to == Some(attack)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adversary {
    pub kind: AdversaryKind,
}

impl Adversary {
    pub fn new(kind: AdversaryKind) -> Self {
        Self { kind }
    }
}
