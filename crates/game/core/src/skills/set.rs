use crate::actor::DangerLevel;

use super::{ModifierPipeline, SkillKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Grant {
    kind: SkillKind,
    temporary: bool,
}

/// Skills held by a survivor, in acquisition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSet {
    grants: Vec<Grant>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a skill for good. Returns false if it was already held
    /// permanently.
    pub fn acquire(&mut self, kind: SkillKind) -> bool {
        if let Some(grant) = self.grants.iter_mut().find(|g| g.kind == kind) {
            let newly = grant.temporary;
            grant.temporary = false;
            return newly;
        }
        self.grants.push(Grant {
            kind,
            temporary: false,
        });
        true
    }

    /// Grants a skill until the end of the round.
    pub fn grant_temporary(&mut self, kind: SkillKind) {
        if !self.contains(kind) {
            self.grants.push(Grant {
                kind,
                temporary: true,
            });
        }
    }

    pub fn clear_temporary(&mut self) {
        self.grants.retain(|g| !g.temporary);
    }

    pub fn contains(&self, kind: SkillKind) -> bool {
        self.grants.iter().any(|g| g.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = SkillKind> + '_ {
        self.grants.iter().map(|g| g.kind)
    }

    pub fn pipeline(&self) -> ModifierPipeline {
        ModifierPipeline::new(self.iter())
    }
}

/// Skill choices unlocked at each danger level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillTree {
    pub blue: Vec<SkillKind>,
    pub yellow: Vec<SkillKind>,
    pub orange: Vec<SkillKind>,
    pub red: Vec<SkillKind>,
}

impl SkillTree {
    pub fn choices(&self, level: DangerLevel) -> &[SkillKind] {
        match level {
            DangerLevel::Blue => &self.blue,
            DangerLevel::Yellow => &self.yellow,
            DangerLevel::Orange => &self.orange,
            DangerLevel::Red => &self.red,
        }
    }
}
