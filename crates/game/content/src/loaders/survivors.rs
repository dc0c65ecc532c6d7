//! Survivor template loader.

use std::path::Path;

use anyhow::Context;
use horde_core::{EquipmentKind, PlayerId, SkillKind, SkillTree, Survivor};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A playable survivor as described in content files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorTemplate {
    pub name: String,
    /// Falls back to `GameConfig::survivor_health`.
    #[serde(default)]
    pub health: Option<u8>,
    /// Skills held from the start, in fold order.
    #[serde(default)]
    pub skills: Vec<SkillKind>,
    #[serde(default)]
    pub tree: SkillTree,
    /// Starting equipment, placed into the first free slots.
    #[serde(default)]
    pub equipment: Vec<EquipmentKind>,
    /// Name of a bonded familiar.
    #[serde(default)]
    pub familiar: Option<String>,
}

impl SurvivorTemplate {
    /// A fresh survivor for `player`; equipment and familiar are placed by
    /// the caller once the survivor is on the board.
    pub fn instantiate(&self, player: PlayerId, default_health: u8) -> Survivor {
        let mut survivor = Survivor::new(
            self.name.clone(),
            player,
            self.health.unwrap_or(default_health),
        );
        for skill in &self.skills {
            survivor.skills.acquire(*skill);
        }
        survivor.tree = self.tree.clone();
        survivor
    }
}

/// Loader for survivor templates from RON files.
pub struct SurvivorLoader;

impl SurvivorLoader {
    /// RON format: `[SurvivorTemplate, ...]`
    pub fn load(path: &Path) -> LoadResult<Vec<SurvivorTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in survivor file {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SurvivorTemplate>> {
        let templates: Vec<SurvivorTemplate> =
            ron::from_str(content).context("failed to parse survivor RON")?;
        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.name == template.name) {
                anyhow::bail!("survivor `{}` is defined twice", template.name);
            }
        }
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATES: &str = r#"[
        (
            name: "Ann",
            skills: [lucky],
            tree: (blue: [plus_one_action], yellow: [], orange: [], red: []),
            equipment: [Sword, ShortBow],
            familiar: Some("Rook"),
        ),
        (name: "Bo", health: Some(4)),
    ]"#;

    #[test]
    fn templates_parse_with_defaults() {
        let templates = SurvivorLoader::parse(TEMPLATES).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].equipment, vec![EquipmentKind::Sword, EquipmentKind::ShortBow]);
        assert_eq!(templates[1].health, Some(4));
        assert!(templates[1].skills.is_empty());

        let ann = templates[0].instantiate(PlayerId(0), 3);
        assert_eq!(ann.health, 3);
        assert!(ann.skills.contains(SkillKind::Lucky));
        assert_eq!(ann.tree.blue, vec![SkillKind::PlusOneAction]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = SurvivorLoader::parse(r#"[(name: "Ann"), (name: "Ann")]"#).unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }
}
