/// Game configuration constants and tunable parameters.
///
/// Every field has a default so partial TOML files only need to name what
/// they override.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Weighting of the dice bag.
    pub difficulty: Difficulty,
    /// Actions every survivor receives at the start of a round.
    pub base_actions: u8,
    /// Actions a familiar receives at the start of a round.
    pub familiar_actions: u8,
    /// Wounds a survivor can take before dying.
    pub survivor_health: u8,
    /// Experience required for each danger level.
    pub xp_thresholds: XpThresholds,
    /// Shortfall range in which a reroll is offered to the decision provider.
    pub reroll_band: RerollBand,
    /// Upper bound on extra dice granted by rolled sixes in one attack.
    pub max_six_cascade: u8,
    /// Upper bound on tied paths returned by `shortest_path_options`.
    pub max_path_options: usize,
    /// Exceeding this many active spawn zones ends the game.
    pub max_spawn_zones: u8,
    /// Optional hard cap on rounds; reaching it is a loss.
    pub round_limit: Option<u32>,
    /// Experience for taking an objective.
    pub objective_xp: u16,
    /// Seed for the dice bag and the decks.
    pub seed: u64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Occupancy slots per cell.
    pub const MAX_QUADRANTS: usize = 9;
    pub const HAND_SLOTS: usize = 2;
    pub const PACK_SLOTS: usize = 3;
    /// Weapons combined into a single attack (dual wielding).
    pub const MAX_WIELDED: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_ACTIONS: u8 = 3;
    pub const DEFAULT_FAMILIAR_ACTIONS: u8 = 2;
    pub const DEFAULT_SURVIVOR_HEALTH: u8 = 3;
    pub const DEFAULT_SIX_CASCADE: u8 = 24;
    pub const DEFAULT_PATH_OPTIONS: usize = 64;
    pub const DEFAULT_MAX_SPAWN_ZONES: u8 = 6;
    pub const DEFAULT_OBJECTIVE_XP: u16 = 5;

    pub fn new() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            base_actions: Self::DEFAULT_BASE_ACTIONS,
            familiar_actions: Self::DEFAULT_FAMILIAR_ACTIONS,
            survivor_health: Self::DEFAULT_SURVIVOR_HEALTH,
            xp_thresholds: XpThresholds::default(),
            reroll_band: RerollBand::default(),
            max_six_cascade: Self::DEFAULT_SIX_CASCADE,
            max_path_options: Self::DEFAULT_PATH_OPTIONS,
            max_spawn_zones: Self::DEFAULT_MAX_SPAWN_ZONES,
            round_limit: None,
            objective_xp: Self::DEFAULT_OBJECTIVE_XP,
            seed: 0,
        }
    }

    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Dice bag weighting.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Copies of each face (index 0 is face 1) in a fresh bag.
    pub const fn face_counts(self) -> [u8; 6] {
        match self {
            Difficulty::Easy => [4, 5, 6, 7, 7, 7],
            Difficulty::Normal => [6, 6, 6, 6, 6, 6],
            Difficulty::Hard => [7, 7, 7, 6, 5, 4],
        }
    }
}

/// Experience needed to reach each danger level above Blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpThresholds {
    pub yellow: u16,
    pub orange: u16,
    pub red: u16,
}

impl Default for XpThresholds {
    fn default() -> Self {
        Self {
            yellow: 7,
            orange: 19,
            red: 43,
        }
    }
}

/// Range of "hostile targets minus hits" for which keeping or rerolling a
/// pool is a real choice. Outside the band the engine decides on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RerollBand {
    pub min_shortfall: u8,
    pub max_shortfall: u8,
}

impl RerollBand {
    pub const fn contains(&self, shortfall: u8) -> bool {
        shortfall >= self.min_shortfall && shortfall <= self.max_shortfall
    }
}

impl Default for RerollBand {
    fn default() -> Self {
        Self {
            min_shortfall: 1,
            max_shortfall: 2,
        }
    }
}
