//! Scenario loader.
//!
//! A scenario names a board, seats the players with their survivors,
//! places siege engines and picks the quest rules.

use std::path::Path;

use anyhow::Context;
use horde_core::{Difficulty, SiegeKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::quests::QuestKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    /// Survivor template names.
    pub survivors: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiegeSpec {
    pub kind: SiegeKind,
    pub zone: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Board file name under `boards/`.
    pub board: String,
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub siege_engines: Vec<SiegeSpec>,
    pub quest: QuestKind,
    /// Overrides for the shared configuration.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub round_limit: Option<u32>,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in scenario file {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content).context("failed to parse scenario RON")?;
        if scenario.players.is_empty() {
            anyhow::bail!("scenario `{}` seats no players", scenario.name);
        }
        Ok(scenario)
    }
}
