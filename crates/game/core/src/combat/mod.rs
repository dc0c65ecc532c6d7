//! Combat resolution.
//!
//! Stats are folded through the modifier pipeline, dice come from the
//! finite dice bag, and hits are allocated in priority order. Allocation in
//! [`targeting`] is pure; [`resolver`] applies outcomes to the game state.

pub mod resolver;
mod stat;
pub mod targeting;

pub use resolver::{
    AttackResult, PendingAttack, RerollDecision, Wound, adversary_attack, dragon_fire, finish,
    friendly_targets, hostile_targets, prepare, reroll, reroll_decision, roll_pool,
    wound_friendly,
};
pub use stat::{Stat, Targeting};
pub use targeting::{Allocation, HitOutcome, Target, allocate};
