//! Data-driven content for the horde kernel.
//!
//! This crate parses the board authoring format, loads configuration,
//! survivor templates and scenarios from TOML/RON files, and ships the
//! sample quests scenarios are built from.
//!
//! Content is consumed at session start and never appears in game state
//! except through the values it produces.

pub mod format;
pub mod quests;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use format::{BoardLoader, BoardParseError};
pub use quests::{Holdout, ObjectiveHunt, QuestKind};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, PlayerSpec, Scenario, ScenarioLoader, Session, SiegeSpec,
    SurvivorLoader, SurvivorTemplate,
};
