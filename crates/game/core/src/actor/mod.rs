//! Actors: survivors, adversaries, familiars and siege engines.
//!
//! The [`ActorRegistry`] owns every actor; the board only keeps ids.
mod adversary;
mod familiar;
mod registry;
mod siege;
mod survivor;

pub use adversary::{Adversary, AdversaryDef, AdversaryKind};
pub use familiar::Familiar;
pub use registry::{ActorRegistry, Spawned};
pub use siege::{SiegeEngine, SiegeKind};
pub use survivor::{DangerLevel, Survivor, TurnState, TurnStatus};

use crate::board::{Faction, Occupant};
use crate::state::ActorId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Survivor(Survivor),
    Adversary(Adversary),
    Familiar(Familiar),
    Siege(SiegeEngine),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ActorId,
    pub actions_left: u8,
    pub kind: ActorKind,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        match &self.kind {
            ActorKind::Survivor(s) => s.is_alive(),
            ActorKind::Familiar(f) => f.is_alive(),
            ActorKind::Adversary(_) | ActorKind::Siege(_) => true,
        }
    }

    pub fn priority(&self) -> u8 {
        match &self.kind {
            ActorKind::Survivor(_) => Survivor::PRIORITY,
            ActorKind::Adversary(a) => a.kind.def().turn_priority,
            ActorKind::Familiar(_) => Familiar::PRIORITY,
            ActorKind::Siege(_) => SiegeEngine::PRIORITY,
        }
    }

    pub fn noise(&self) -> u8 {
        match &self.kind {
            ActorKind::Survivor(_) => Survivor::NOISE,
            _ => 0,
        }
    }

    pub fn faction(&self) -> Faction {
        match &self.kind {
            ActorKind::Survivor(_) | ActorKind::Familiar(_) => Faction::Survivors,
            ActorKind::Adversary(_) => Faction::Horde,
            ActorKind::Siege(_) => Faction::Neutral,
        }
    }

    /// Zones crossed by one move action.
    pub fn speed(&self) -> u8 {
        match &self.kind {
            ActorKind::Survivor(s) => s.skills.pipeline().move_grant().zones_per_move,
            ActorKind::Adversary(a) => a.kind.def().moves as u8,
            ActorKind::Familiar(_) => 1,
            ActorKind::Siege(_) => 0,
        }
    }

    pub fn occupant(&self) -> Occupant {
        Occupant {
            actor: self.id,
            priority: self.priority(),
            noise: self.noise(),
            faction: self.faction(),
        }
    }

    pub fn name(&self) -> String {
        match &self.kind {
            ActorKind::Survivor(s) => s.name.clone(),
            ActorKind::Adversary(a) => a.kind.to_string(),
            ActorKind::Familiar(f) => f.name.clone(),
            ActorKind::Siege(e) => e.kind.to_string(),
        }
    }

    pub fn survivor(&self) -> Option<&Survivor> {
        match &self.kind {
            ActorKind::Survivor(s) => Some(s),
            _ => None,
        }
    }

    pub fn survivor_mut(&mut self) -> Option<&mut Survivor> {
        match &mut self.kind {
            ActorKind::Survivor(s) => Some(s),
            _ => None,
        }
    }

    pub fn adversary(&self) -> Option<&Adversary> {
        match &self.kind {
            ActorKind::Adversary(a) => Some(a),
            _ => None,
        }
    }

    pub fn familiar(&self) -> Option<&Familiar> {
        match &self.kind {
            ActorKind::Familiar(f) => Some(f),
            _ => None,
        }
    }

    pub fn familiar_mut(&mut self) -> Option<&mut Familiar> {
        match &mut self.kind {
            ActorKind::Familiar(f) => Some(f),
            _ => None,
        }
    }

    pub fn siege(&self) -> Option<&SiegeEngine> {
        match &self.kind {
            ActorKind::Siege(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self.kind, ActorKind::Adversary(_))
    }

    /// Survivors and familiars: the side adversaries attack.
    pub fn is_friendly(&self) -> bool {
        matches!(self.kind, ActorKind::Survivor(_) | ActorKind::Familiar(_))
    }
}
