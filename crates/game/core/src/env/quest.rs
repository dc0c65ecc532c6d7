//! Scenario extension points.

use crate::actor::AdversaryKind;
use crate::config::RerollBand;
use crate::engine::GameOver;
use crate::item::EquipmentKind;
use crate::state::{ActorId, DoorId, GameState, ZoneId};

/// A scenario-defined move. The engine only carries it through the
/// catalogue; the scenario gives `code` its meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestMove {
    pub code: u16,
    pub zone: Option<ZoneId>,
}

/// Generic events reported to the scenario at fixed points of play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestEvent {
    ObjectiveTaken { actor: ActorId, zone: ZoneId },
    EquipmentFound { actor: ActorId, kind: EquipmentKind },
    DoorOpened { actor: ActorId, door: DoorId },
    AdversarySpawned { actor: ActorId, kind: AdversaryKind, zone: ZoneId },
    AdversaryDestroyed { actor: ActorId, kind: AdversaryKind, by: ActorId },
    SurvivorDied { actor: ActorId },
    AreaEffect { zone: ZoneId },
    RoundEnded { round: u32 },
}

/// Hooks a scenario implements. Every method has a neutral default.
pub trait QuestHooks {
    /// Extra catalogue entries for `actor`.
    fn moves(&self, _state: &GameState, _actor: ActorId) -> Vec<QuestMove> {
        Vec::new()
    }

    /// Executes a scenario move. Returns false if the move no longer applies.
    fn perform(&mut self, _state: &mut GameState, _actor: ActorId, _mv: QuestMove) -> bool {
        false
    }

    fn on_event(&mut self, _state: &GameState, _event: &QuestEvent) {}

    /// Win or loss verdict, checked after every unit of work.
    fn outcome(&self, _state: &GameState) -> Option<GameOver> {
        None
    }

    /// Overrides the configured ambiguous reroll band.
    fn reroll_band(&self) -> Option<RerollBand> {
        None
    }
}

/// Quest hooks behind a box, cloneable so a session can snapshot the
/// scenario together with its state.
pub trait DynQuest: QuestHooks + Send {
    fn clone_quest(&self) -> Box<dyn DynQuest>;

    fn hooks(&mut self) -> &mut dyn QuestHooks;
}

impl<T> DynQuest for T
where
    T: QuestHooks + Clone + Send + 'static,
{
    fn clone_quest(&self) -> Box<dyn DynQuest> {
        Box::new(self.clone())
    }

    fn hooks(&mut self) -> &mut dyn QuestHooks {
        self
    }
}

impl Clone for Box<dyn DynQuest> {
    fn clone(&self) -> Self {
        self.clone_quest()
    }
}

/// A scenario with no extra rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoQuest;

impl QuestHooks for NoQuest {}
