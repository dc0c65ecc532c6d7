//! Quadrant occupancy and zone noise bookkeeping.

use crate::state::{ActorId, CellPos, ZoneId};

use super::{Board, Faction, Occupant};

/// Where an actor stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spot {
    pub cell: CellPos,
    pub quadrant: u8,
}

/// Result of a successful placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub spot: Spot,
    /// Lower-priority occupant pushed out to make room.
    pub evicted: Option<ActorId>,
}

impl Board {
    pub fn spot_of(&self, actor: ActorId) -> Option<Spot> {
        self.locations.get(&actor).copied()
    }

    pub fn zone_of(&self, actor: ActorId) -> Option<ZoneId> {
        self.spot_of(actor).and_then(|s| self.zone_at(s.cell))
    }

    pub fn occupant(&self, actor: ActorId) -> Option<&Occupant> {
        let spot = self.spot_of(actor)?;
        self.cell(spot.cell)?.quadrants[spot.quadrant as usize].as_ref()
    }

    /// Occupants of a zone in cell then quadrant order.
    pub fn occupants(&self, zone: ZoneId) -> Vec<Occupant> {
        let Some(zone) = self.zone(zone) else {
            return Vec::new();
        };
        zone.cells
            .iter()
            .filter_map(|pos| self.cell(*pos))
            .flat_map(|cell| cell.occupants().copied())
            .collect()
    }

    pub fn has_faction(&self, zone: ZoneId, faction: Faction) -> bool {
        self.occupants(zone).iter().any(|o| o.faction == faction)
    }

    /// Places an actor in the first free quadrant of `zone`.
    ///
    /// When the zone is full the lowest-priority occupant is evicted, but only
    /// if `occupant.priority` is strictly higher. Returns `None` when the
    /// actor cannot be placed.
    pub fn add_actor(&mut self, occupant: Occupant, zone: ZoneId) -> Option<Placement> {
        if self.locations.contains_key(&occupant.actor) {
            return None;
        }
        let cells = self.zone(zone)?.cells.clone();
        for pos in &cells {
            if let Some(spot) = self.place_in_cell(occupant, *pos) {
                return Some(Placement {
                    spot,
                    evicted: None,
                });
            }
        }

        let (victim, _) = cells
            .iter()
            .filter_map(|pos| self.cell(*pos))
            .flat_map(|cell| cell.occupants())
            .map(|o| (o.actor, o.priority))
            .min_by_key(|(_, priority)| *priority)?;
        let victim_priority = self.occupant(victim)?.priority;
        if occupant.priority <= victim_priority {
            return None;
        }
        let spot = self.spot_of(victim)?;
        self.remove_actor(victim);
        let placed = self.place_in_cell(occupant, spot.cell)?;
        tracing::debug!(
            target: "horde::board",
            actor = %occupant.actor,
            evicted = %victim,
            zone = %zone,
            "placement evicted a lower-priority occupant"
        );
        Some(Placement {
            spot: placed,
            evicted: Some(victim),
        })
    }

    /// Places an actor in a specific cell, without eviction.
    pub fn place_in_cell(&mut self, occupant: Occupant, pos: CellPos) -> Option<Spot> {
        if self.locations.contains_key(&occupant.actor) {
            return None;
        }
        let cell = self.cell_mut(pos)?;
        let zone = cell.zone?;
        let quadrant = cell.free_quadrant()?;
        cell.quadrants[quadrant] = Some(occupant);
        let spot = Spot {
            cell: pos,
            quadrant: quadrant as u8,
        };
        self.locations.insert(occupant.actor, spot);
        if let Ok(zone) = self.zone_mut(zone) {
            zone.actor_noise += occupant.noise as u16;
        }
        Some(spot)
    }

    pub fn remove_actor(&mut self, actor: ActorId) -> Option<Occupant> {
        let spot = self.locations.remove(&actor)?;
        let cell = self.cell_mut(spot.cell)?;
        let zone = cell.zone?;
        let occupant = cell.quadrants[spot.quadrant as usize].take()?;
        if let Ok(zone) = self.zone_mut(zone) {
            zone.actor_noise = zone.actor_noise.saturating_sub(occupant.noise as u16);
        }
        Some(occupant)
    }

    /// Moves an actor into `zone`; noise moves with it. Fails without side
    /// effects when the destination has no free quadrant.
    pub fn move_actor(&mut self, actor: ActorId, zone: ZoneId) -> Option<Spot> {
        let cells = self.zone(zone)?.cells.clone();
        let target = cells
            .into_iter()
            .find(|pos| self.cell(*pos).is_some_and(|c| !c.is_full()))?;
        self.move_actor_to_cell(actor, target)
    }

    pub fn move_actor_to_cell(&mut self, actor: ActorId, pos: CellPos) -> Option<Spot> {
        let cell = self.cell(pos)?;
        if cell.is_void() || cell.is_full() {
            return None;
        }
        let occupant = self.remove_actor(actor)?;
        self.place_in_cell(occupant, pos)
    }

    /// Updates the noise contribution of a placed actor.
    pub fn set_actor_noise(&mut self, actor: ActorId, noise: u8) {
        let Some(zone) = self.zone_of(actor) else {
            return;
        };
        let Some(spot) = self.spot_of(actor) else {
            return;
        };
        let Some(occupant) = self
            .cell_mut(spot.cell)
            .and_then(|c| c.quadrants[spot.quadrant as usize].as_mut())
        else {
            return;
        };
        let old = std::mem::replace(&mut occupant.noise, noise);
        if let Ok(zone) = self.zone_mut(zone) {
            zone.actor_noise = zone.actor_noise.saturating_sub(old as u16) + noise as u16;
        }
    }

    pub fn free_quadrants(&self, zone: ZoneId) -> usize {
        self.zone(zone).map_or(0, |z| {
            z.cells
                .iter()
                .filter_map(|p| self.cell(*p))
                .map(|c| (c.capacity as usize).saturating_sub(c.occupied()))
                .sum()
        })
    }

    pub fn placed_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.locations.keys().copied()
    }
}
