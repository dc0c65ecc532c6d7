//! Deterministic rules kernel for cooperative survival combat.
//!
//! `horde-core` owns the canonical rules (board, actors, combat, skills and
//! the phase-stack engine) and exposes pure APIs that the content loaders,
//! the runtime and offline tools share. All state mutation during play flows
//! through [`engine::GameEngine::advance`]; the kernel performs no I/O.
pub mod action;
pub mod actor;
pub mod board;
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod item;
pub mod skills;
pub mod spawn;
pub mod state;

pub use action::{ActionKind, AttackKind, Reach};
pub use actor::{
    Actor, ActorKind, ActorRegistry, Adversary, AdversaryKind, DangerLevel, Familiar,
    SiegeEngine, SiegeKind, Survivor, TurnState, TurnStatus,
};
pub use board::{
    Board, BoardBuilder, BoardError, Cell, Direction, Door, DoorState, Environment, Faction,
    LockColor, WallState, Zone,
};
pub use combat::{AttackResult, PendingAttack, Stat};
pub use config::{Difficulty, GameConfig, RerollBand, XpThresholds};
pub use dice::DiceBag;
pub use engine::{
    Advance, Catalogue, EngineError, GameEngine, GameOver, Intent, Move, MoveOption, Phase,
    PhaseStack, PhaseTag, build_catalogue,
};
pub use env::{
    Answer, DecisionOptions, DecisionProvider, DecisionRequest, DynQuest, FamiliarMove,
    KeepChoice, NoQuest, OrganizeStep, QuestEvent, QuestHooks, QuestMove, RerollChoice,
    ZonePurpose,
};
pub use error::{ErrorSeverity, GameError};
pub use item::{Equipment, EquipmentDeck, EquipmentKind, EquipmentTraits, Inventory, Slot};
pub use skills::{FreeActions, SkillKind, SkillSet, SkillTree};
pub use spawn::{SpawnCard, SpawnDeck, SpawnEffect};
pub use state::{
    ActorId, CellPos, DoorId, EquipmentId, GameState, Player, PlayerId, SetupError, ZoneId,
};
