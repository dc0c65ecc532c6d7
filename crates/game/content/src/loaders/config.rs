//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use horde_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`GameConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).context("failed to parse config TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::Difficulty;

    #[test]
    fn partial_files_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            difficulty = "hard"
            round_limit = 12

            [reroll_band]
            min_shortfall = 1
            max_shortfall = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.round_limit, Some(12));
        assert_eq!(config.reroll_band.max_shortfall, 3);
        assert_eq!(config.base_actions, GameConfig::DEFAULT_BASE_ACTIONS);
    }

    #[test]
    fn unknown_difficulty_is_an_error() {
        assert!(ConfigLoader::parse(r#"difficulty = "brutal""#).is_err());
    }
}
