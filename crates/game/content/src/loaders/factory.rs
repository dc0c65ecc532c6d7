//! Content factory for assembling sessions from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use horde_core::{Board, DynQuest, GameConfig, GameState, ZoneId};
use tracing::info;

use crate::format::BoardLoader;
use crate::loaders::{
    ConfigLoader, LoadResult, Scenario, ScenarioLoader, SurvivorLoader, SurvivorTemplate,
};

/// A ready-to-play game: validated state plus the scenario's rules.
pub struct Session {
    pub scenario: Scenario,
    pub state: GameState,
    pub quest: Box<dyn DynQuest>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scenario", &self.scenario.name)
            .field("round", &self.state.round.number)
            .finish_non_exhaustive()
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── survivors.ron
/// ├── boards/
/// │   └── crossroads.board
/// └── scenarios/
///     └── crossroads.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults if the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load survivor templates from `survivors.ron`.
    pub fn load_survivors(&self) -> LoadResult<Vec<SurvivorTemplate>> {
        SurvivorLoader::load(&self.data_dir.join("survivors.ron"))
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{name}.ron"));
        ScenarioLoader::load(&path)
    }

    /// Load a board from `boards/{file}`.
    pub fn load_board(&self, file: &str) -> LoadResult<Board> {
        BoardLoader::load(&self.data_dir.join("boards").join(file))
    }

    /// Assembles the scenario `name`: board, configuration overrides, seats,
    /// survivors with their equipment and familiars, siege engines and the
    /// quest rules. `seed` overrides the configured seed.
    pub fn build_session(&self, name: &str, seed: Option<u64>) -> LoadResult<Session> {
        let scenario = self.load_scenario(name)?;
        let mut config = self.load_config()?;
        if let Some(difficulty) = scenario.difficulty {
            config.difficulty = difficulty;
        }
        if scenario.round_limit.is_some() {
            config.round_limit = scenario.round_limit;
        }
        if let Some(seed) = seed {
            config.seed = seed;
        }
        let templates = self.load_survivors()?;
        let board = self.load_board(&scenario.board)?;

        let default_health = config.survivor_health;
        let mut state = GameState::new(config, board);
        for seat in &scenario.players {
            let player = state.add_player(seat.name.clone());
            for survivor_name in &seat.survivors {
                let template = templates
                    .iter()
                    .find(|t| &t.name == survivor_name)
                    .with_context(|| format!("unknown survivor template `{survivor_name}`"))?;
                place_survivor(&mut state, template, player, default_health)
                    .with_context(|| format!("cannot place survivor `{survivor_name}`"))?;
            }
        }
        for siege in &scenario.siege_engines {
            state
                .add_siege_engine(siege.kind, ZoneId(siege.zone))
                .with_context(|| format!("cannot place {} in zone {}", siege.kind, siege.zone))?;
        }
        state
            .validate()
            .with_context(|| format!("scenario `{name}` does not form a playable game"))?;

        info!(
            scenario = %scenario.name,
            seed = state.seed(),
            players = state.players.len(),
            actors = state.actors.len(),
            "session assembled"
        );
        let quest = scenario.quest.build();
        Ok(Session {
            scenario,
            state,
            quest,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn place_survivor(
    state: &mut GameState,
    template: &SurvivorTemplate,
    player: horde_core::PlayerId,
    default_health: u8,
) -> LoadResult<()> {
    let id = state.add_survivor(template.instantiate(player, default_health))?;
    for kind in &template.equipment {
        state.give_equipment(id, *kind)?;
    }
    if let Some(familiar) = &template.familiar {
        state.add_familiar(id, familiar.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_data(dir: &Path) {
        fs::create_dir_all(dir.join("boards")).unwrap();
        fs::create_dir_all(dir.join("scenarios")).unwrap();
        fs::write(dir.join("config.toml"), "seed = 11\nround_limit = 20\n").unwrap();
        fs::write(
            dir.join("survivors.ron"),
            r#"[(name: "Ann", equipment: [Sword], familiar: Some("Rook")), (name: "Bo")]"#,
        )
        .unwrap();
        fs::write(dir.join("boards/yard.board"), "1,start 2,sp\n1 2,obj\n").unwrap();
        fs::write(
            dir.join("scenarios/yard.ron"),
            r#"(
                name: "Yard",
                board: "yard.board",
                players: [(name: "p0", survivors: ["Ann"]), (name: "p1", survivors: ["Bo"])],
                siege_engines: [(kind: Ballista, zone: 1)],
                quest: holdout(rounds: 5),
                round_limit: Some(8),
            )"#,
        )
        .unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builds_a_playable_session() {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path());
        let session = ContentFactory::new(dir.path())
            .build_session("yard", Some(99))
            .unwrap();

        let state = &session.state;
        assert_eq!(state.seed(), 99);
        assert_eq!(state.config.round_limit, Some(8));
        assert_eq!(state.players.len(), 2);
        // two survivors, one familiar, one ballista
        assert_eq!(state.actors.len(), 4);
        let ann = state.players[0].survivors[0];
        assert!(state.survivor(ann).unwrap().familiar.is_some());
        assert_eq!(state.inventory(ann).unwrap().items().len(), 1);
        assert_eq!(state.board.zone_of(ann), Some(ZoneId(1)));
    }

    #[test]
    fn missing_templates_name_the_survivor() {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path());
        fs::write(dir.path().join("survivors.ron"), "[]").unwrap();
        let err = ContentFactory::new(dir.path())
            .build_session("yard", None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("unknown survivor template `Ann`"));
    }
}
