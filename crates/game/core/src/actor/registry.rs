use std::collections::BTreeMap;

use crate::board::Board;
use crate::state::{ActorId, ZoneId};

use super::{Actor, ActorKind};

/// Result of putting a new actor into play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawned {
    pub id: ActorId,
    /// Lower-priority actor removed from play to make room.
    pub evicted: Option<Actor>,
}

/// Owns every actor, keyed by stable id. Mutations that change where an
/// actor stands go through here so the board index stays in step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorRegistry {
    actors: BTreeMap<ActorId, Actor>,
    next_id: u32,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.values_mut()
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Creates an actor and places it in `zone`. Returns `None` (and keeps
    /// nothing) when the zone has no room for it.
    pub fn spawn(
        &mut self,
        board: &mut Board,
        kind: ActorKind,
        actions: u8,
        zone: ZoneId,
    ) -> Option<Spawned> {
        let id = ActorId(self.next_id);
        let actor = Actor {
            id,
            actions_left: actions,
            kind,
        };
        let placement = board.add_actor(actor.occupant(), zone)?;
        self.next_id += 1;
        self.actors.insert(id, actor);
        let evicted = placement.evicted.and_then(|victim| self.actors.remove(&victim));
        Some(Spawned { id, evicted })
    }

    pub fn move_to(&mut self, board: &mut Board, id: ActorId, zone: ZoneId) -> bool {
        self.actors.contains_key(&id) && board.move_actor(id, zone).is_some()
    }

    /// Removes an actor from the board and from the registry.
    pub fn remove(&mut self, board: &mut Board, id: ActorId) -> Option<Actor> {
        board.remove_actor(id);
        self.actors.remove(&id)
    }

    /// Takes an actor off the board but keeps its record (dead or escaped
    /// survivors, fallen familiars).
    pub fn take_off_board(&mut self, board: &mut Board, id: ActorId) {
        board.remove_actor(id);
    }

    pub fn in_zone<'a>(
        &'a self,
        board: &'a Board,
        zone: ZoneId,
    ) -> impl Iterator<Item = &'a Actor> {
        board
            .occupants(zone)
            .into_iter()
            .filter_map(|o| self.actors.get(&o.actor))
    }

    pub fn survivors(&self) -> impl Iterator<Item = &Actor> {
        self.actors
            .values()
            .filter(|a| matches!(a.kind, ActorKind::Survivor(_)))
    }

    pub fn adversaries(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values().filter(|a| a.is_hostile())
    }

    /// First placed actor id missing from the registry, if any.
    pub fn dangling(&self, board: &Board) -> Option<ActorId> {
        board
            .placed_actors()
            .find(|id| !self.actors.contains_key(id))
    }
}
