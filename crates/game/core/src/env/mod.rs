//! Collaborators the engine calls out to, plus deterministic randomness.
//!
//! [`DecisionProvider`] answers choice points and [`QuestHooks`] carries
//! scenario rules. Both are traits so front ends, scripted tests and AIs can
//! plug in without touching the engine.
mod decision;
mod quest;
mod rng;

pub use decision::{
    Answer, DecisionOptions, DecisionProvider, DecisionRequest, FamiliarMove, KeepChoice,
    OrganizeStep, RerollChoice, ZonePurpose,
};
pub use quest::{DynQuest, NoQuest, QuestEvent, QuestHooks, QuestMove};
pub use rng::{PcgRng, RngOracle, compute_seed, streams};
