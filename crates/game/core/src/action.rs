//! Action and attack classifications shared by the board, the modifier
//! pipeline and the combat resolver.

/// What a survivor (or familiar) is spending an action on.
///
/// Reach queries on the board take an `ActionKind` because movement, melee,
/// line-of-sight and lobbed attacks all expand differently over the zone graph.
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
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Melee,
    Ranged,
    Magic,
    /// Direct-fire siege engine (ballista); follows ranged lines.
    Siege,
    /// Lobbed siege engine (trebuchet); lines ignore walls.
    Indirect,
    Search,
    Door,
    Organize,
    Trade,
    Throw,
    Enchant,
    Reload,
    Objective,
    Quest,
    EndTurn,
}

impl ActionKind {
    /// How this action expands across the board when looking for target zones.
    pub const fn reach(self) -> Reach {
        match self {
            ActionKind::Move => Reach::Walk,
            ActionKind::Ranged
            | ActionKind::Magic
            | ActionKind::Siege
            | ActionKind::Throw
            | ActionKind::Enchant => Reach::Sight,
            ActionKind::Indirect => Reach::Lobbed,
            ActionKind::Melee
            | ActionKind::Search
            | ActionKind::Door
            | ActionKind::Organize
            | ActionKind::Trade
            | ActionKind::Reload
            | ActionKind::Objective
            | ActionKind::Quest
            | ActionKind::EndTurn => Reach::Zone,
        }
    }
}

/// Expansion rule used by `Board::accessible_zones`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reach {
    /// Only the origin zone.
    Zone,
    /// Zone graph walk through passable sides, halted by hostiles.
    Walk,
    /// Cardinal lines of sight with the indoor crossing limit.
    Sight,
    /// Cardinal lines that ignore walls entirely.
    Lobbed,
}

/// Class of an attack for immunity checks and modifier filtering.
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
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
    Magic,
    Siege,
    DragonFire,
}

impl AttackKind {
    /// Combat modifiers ("+1 die: Combat" and friends) only touch hand-held attacks.
    pub const fn is_combat(self) -> bool {
        matches!(self, AttackKind::Melee | AttackKind::Ranged | AttackKind::Magic)
    }

    /// Attacks that can spill surplus hits onto friendly actors.
    pub const fn is_ranged_like(self) -> bool {
        matches!(
            self,
            AttackKind::Ranged | AttackKind::Magic | AttackKind::Siege
        )
    }

    pub const fn action(self) -> ActionKind {
        match self {
            AttackKind::Melee => ActionKind::Melee,
            AttackKind::Ranged => ActionKind::Ranged,
            AttackKind::Magic => ActionKind::Magic,
            AttackKind::Siege => ActionKind::Siege,
            AttackKind::DragonFire => ActionKind::Throw,
        }
    }
}
