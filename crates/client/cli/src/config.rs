//! Runner configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Scenario played when neither the command line nor the environment names one.
pub const DEFAULT_SCENARIO: &str = "crossroads";

/// Everything the headless runner needs to set up one session.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub scenario: String,
    pub seed: Option<u64>,
    pub max_rounds: Option<u32>,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            scenario: DEFAULT_SCENARIO.to_owned(),
            seed: None,
            max_rounds: None,
            data_dir: bundled_data_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HORDE_SCENARIO` - Scenario name under `scenarios/` (default: crossroads)
    /// - `HORDE_SEED` - Seed overriding the configured one
    /// - `HORDE_MAX_ROUNDS` - Round limit overriding the scenario's
    /// - `HORDE_DATA_DIR` - Content directory (default: the bundled data)
    /// - `HORDE_LOG_DIR` - Log directory (default: platform cache directory)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(scenario) = env::var("HORDE_SCENARIO")
            && !scenario.is_empty()
        {
            config.scenario = scenario;
        }
        config.seed = read_env::<u64>("HORDE_SEED");
        config.max_rounds = read_env::<u32>("HORDE_MAX_ROUNDS").map(|rounds| rounds.max(1));
        if let Some(dir) = env::var_os("HORDE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os("HORDE_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config
    }

    /// A positional argument names the scenario and wins over the environment.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(scenario) = args.next() {
            self.scenario = scenario;
        }
        self
    }
}

fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../game/content/data")
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "horde")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| env::temp_dir().join("horde").join("logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
