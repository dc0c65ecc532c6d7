//! Sample scenarios built on the kernel's quest hooks.

mod holdout;
mod objective_hunt;

pub use holdout::Holdout;
pub use objective_hunt::ObjectiveHunt;

use horde_core::{DynQuest, RerollBand, ZoneId};

/// Scenario rules named by a scenario file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuestKind {
    /// Take every objective, then leave through `exit`.
    ObjectiveHunt {
        exit: u16,
        #[cfg_attr(feature = "serde", serde(default))]
        no_casualties: bool,
    },
    /// Stay alive for `rounds` rounds.
    Holdout {
        rounds: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        reroll_band: Option<RerollBand>,
    },
}

impl QuestKind {
    pub fn build(&self) -> Box<dyn DynQuest> {
        match self {
            QuestKind::ObjectiveHunt {
                exit,
                no_casualties,
            } => Box::new(ObjectiveHunt::new(ZoneId(*exit), *no_casualties)),
            QuestKind::Holdout {
                rounds,
                reroll_band,
            } => Box::new(Holdout::new(*rounds).with_reroll_band(*reroll_band)),
        }
    }
}
