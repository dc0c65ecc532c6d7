//! The decision boundary between the engine and whoever plays the game.
//!
//! The engine never blocks: at a choice point it builds a
//! [`DecisionRequest`] and asks the provider. A provider that has no answer
//! yet returns `None` and the engine reports `Advance::Waiting`.

use crate::engine::{MoveOption, PhaseTag};
use crate::item::{Equipment, Slot};
use crate::skills::SkillKind;
use crate::state::{ActorId, EquipmentId, GameState, PlayerId, ZoneId};

/// A provider's reply to one decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Answer {
    /// Index into the option list.
    Pick(usize),
    /// Abandon a cancellable sub-decision.
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZonePurpose {
    /// Target of a ranged, magic, siege, throw or enchant move.
    Target,
    /// Spawn zone to shut after destroying a necromancer.
    RemoveSpawn,
}

/// Where a freshly found item goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeepChoice {
    Slot(Slot),
    /// Discard the carried item and take its place.
    Replace(EquipmentId),
    Discard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrganizeStep {
    /// Move an own item into a free slot.
    Move { item: EquipmentId, to: Slot },
    Give { item: EquipmentId },
    Take { item: EquipmentId },
    Discard { item: EquipmentId },
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RerollChoice {
    Keep,
    Reroll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FamiliarMove {
    Walk(ZoneId),
    Attack,
    Stay,
}

/// The option list of one decision, by decision class.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionOptions {
    Survivors(Vec<ActorId>),
    Moves(Vec<MoveOption>),
    Zones {
        purpose: ZonePurpose,
        zones: Vec<ZoneId>,
    },
    Equipment {
        found: Equipment,
        choices: Vec<KeepChoice>,
    },
    Organize(Vec<OrganizeStep>),
    Skills(Vec<SkillKind>),
    Reroll {
        faces: Vec<u8>,
        choices: Vec<RerollChoice>,
    },
    Familiar(Vec<FamiliarMove>),
}

impl DecisionOptions {
    pub fn len(&self) -> usize {
        match self {
            DecisionOptions::Survivors(v) => v.len(),
            DecisionOptions::Moves(v) => v.len(),
            DecisionOptions::Zones { zones, .. } => zones.len(),
            DecisionOptions::Equipment { choices, .. } => choices.len(),
            DecisionOptions::Organize(v) => v.len(),
            DecisionOptions::Skills(v) => v.len(),
            DecisionOptions::Reroll { choices, .. } => choices.len(),
            DecisionOptions::Familiar(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single outstanding question, tied to the top-of-stack phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRequest {
    pub phase: PhaseTag,
    pub player: Option<PlayerId>,
    pub actor: Option<ActorId>,
    pub options: DecisionOptions,
    pub cancellable: bool,
}

impl DecisionRequest {
    /// True if `answer` can be applied to this request.
    pub fn accepts(&self, answer: Answer) -> bool {
        match answer {
            Answer::Pick(i) => i < self.options.len(),
            Answer::Back => self.cancellable,
        }
    }

    /// Routes the request to the provider method for its decision class.
    pub fn ask(&self, provider: &mut dyn DecisionProvider, state: &GameState) -> Option<Answer> {
        let actor = self.actor.unwrap_or(ActorId(u32::MAX));
        match &self.options {
            DecisionOptions::Survivors(options) => {
                let player = self.player.unwrap_or(PlayerId(0));
                provider.choose_survivor(state, player, options)
            }
            DecisionOptions::Moves(options) => provider.choose_move(state, actor, options),
            DecisionOptions::Zones { purpose, zones } => {
                provider.choose_zone(state, actor, *purpose, zones)
            }
            DecisionOptions::Equipment { found, choices } => {
                provider.choose_equipment(state, actor, found, choices)
            }
            DecisionOptions::Organize(options) => provider.choose_organize(state, actor, options),
            DecisionOptions::Skills(options) => provider.choose_skill(state, actor, options),
            DecisionOptions::Reroll { faces, choices } => {
                provider.choose_reroll(state, actor, faces, choices)
            }
            DecisionOptions::Familiar(options) => {
                provider.choose_familiar_move(state, actor, options)
            }
        }
    }
}

/// Resolves the engine's choice points: a human front end, a script, or an
/// AI. Every query returns `None` while no answer is available.
pub trait DecisionProvider {
    /// Notification only; no answer expected.
    fn acting_player_changed(&mut self, _state: &GameState, _player: PlayerId) {}

    fn choose_survivor(
        &mut self,
        state: &GameState,
        player: PlayerId,
        options: &[ActorId],
    ) -> Option<Answer>;

    fn choose_move(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[MoveOption],
    ) -> Option<Answer>;

    fn choose_zone(
        &mut self,
        state: &GameState,
        actor: ActorId,
        purpose: ZonePurpose,
        options: &[ZoneId],
    ) -> Option<Answer>;

    fn choose_equipment(
        &mut self,
        state: &GameState,
        actor: ActorId,
        found: &Equipment,
        options: &[KeepChoice],
    ) -> Option<Answer>;

    fn choose_organize(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[OrganizeStep],
    ) -> Option<Answer>;

    fn choose_skill(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[SkillKind],
    ) -> Option<Answer>;

    fn choose_reroll(
        &mut self,
        state: &GameState,
        actor: ActorId,
        faces: &[u8],
        options: &[RerollChoice],
    ) -> Option<Answer>;

    fn choose_familiar_move(
        &mut self,
        state: &GameState,
        familiar: ActorId,
        options: &[FamiliarMove],
    ) -> Option<Answer>;
}
