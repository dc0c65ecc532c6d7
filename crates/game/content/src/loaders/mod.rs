//! Content loaders for reading game data from files.
//!
//! Boards use the authoring format from [`crate::format`]; configuration is
//! TOML; survivor templates and scenarios are RON.

pub mod board;
pub mod config;
pub mod factory;
pub mod scenario;
pub mod survivors;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, Session};
pub use scenario::{PlayerSpec, Scenario, ScenarioLoader, SiegeSpec};
pub use survivors::{SurvivorLoader, SurvivorTemplate};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
