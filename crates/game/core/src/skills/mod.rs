//! Modifier pipeline: skills that alter stats, costs, rolls and outcomes.
//!
//! Each [`SkillKind`] maps to an immutable [`SkillDef`] row in a static table.
//! A row advertises its [`Capabilities`] and carries plain function hooks for
//! them; [`ModifierPipeline`] folds the active rows in declared order.
mod capability;
mod kind;
mod pipeline;
mod set;
mod table;

pub use capability::{Capabilities, FreeActions};
pub use kind::SkillKind;
pub use pipeline::{
    AttackReport, CostContext, ModifierPipeline, MoveGrant, Reaction, RoundEndEffect,
};
pub use set::{SkillSet, SkillTree};
pub use table::SkillDef;
