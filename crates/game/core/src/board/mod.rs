//! Spatial board: cell grid, zone partition, walls and doors, spawn points.
//!
//! The board only stores actor ids; the actor registry owns the actors. All
//! mutations keep the door mirroring and zone noise bookkeeping consistent.
mod builder;
mod cell;
mod direction;
mod door;
mod error;
mod occupancy;
mod path;
mod reach;
mod zone;

use std::collections::BTreeMap;

pub use builder::BoardBuilder;
pub use cell::{Cell, Environment, Faction, Occupant, WallState};
pub use direction::Direction;
pub use door::{Door, DoorState, LockColor};
pub use error::BoardError;
pub use occupancy::{Placement, Spot};
pub use zone::Zone;

use crate::state::{CellPos, DoorId, ZoneId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: u32,
    height: u32,
    /// Row-major.
    cells: Vec<Cell>,
    zones: BTreeMap<ZoneId, Zone>,
    doors: Vec<Door>,
    locations: BTreeMap<crate::state::ActorId, Spot>,
}

impl Board {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    #[inline]
    fn index(&self, pos: CellPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, pos: CellPos) -> Option<&mut Cell> {
        self.index(pos).map(|i| &mut self.cells[i])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub(crate) fn zone_mut(&mut self, id: ZoneId) -> Result<&mut Zone, BoardError> {
        self.zones
            .get_mut(&id)
            .ok_or(BoardError::UnknownZone { zone: id })
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    pub fn zone_at(&self, pos: CellPos) -> Option<ZoneId> {
        self.cell(pos).and_then(|c| c.zone)
    }

    /// Cell on the far side of `dir`, following links for vertical directions.
    pub fn neighbor(&self, pos: CellPos, dir: Direction) -> Option<CellPos> {
        let next = match dir.link_slot() {
            Some(slot) => self.cell(pos)?.links[slot]?,
            None => {
                let (dx, dy) = dir.delta();
                pos.offset(dx, dy)
            }
        };
        self.cell(next).filter(|c| !c.is_void()).map(|c| c.pos)
    }

    // ===== doors =====

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.pair())
    }

    /// Every door side id, both halves of each pair.
    pub fn door_sides(&self) -> impl Iterator<Item = DoorId> + '_ {
        (0..self.doors.len() as u16).flat_map(|pair| [DoorId(pair * 2), DoorId(pair * 2 + 1)])
    }

    /// Zones on either side of a door (`id`'s own zone first).
    pub fn door_zones(&self, id: DoorId) -> Option<(ZoneId, ZoneId)> {
        let door = self.door(id)?;
        let (here, _) = door.side(id);
        let (there, _) = door.side(id.other_side());
        Some((self.zone_at(here)?, self.zone_at(there)?))
    }

    /// Sets the open/closed/jammed state of a door, updating both cells.
    pub fn set_door(&mut self, id: DoorId, state: DoorState) -> Result<(), BoardError> {
        let door = self
            .doors
            .get_mut(id.pair())
            .ok_or(BoardError::UnknownDoor { door: id })?;
        door.state = state;
        self.sync_door(id.pair());
        tracing::debug!(target: "horde::board", door = %id, %state, "door updated");
        Ok(())
    }

    pub fn set_door_locked(&mut self, id: DoorId, locked: bool) -> Result<(), BoardError> {
        let door = self
            .doors
            .get_mut(id.pair())
            .ok_or(BoardError::UnknownDoor { door: id })?;
        door.locked = locked;
        self.sync_door(id.pair());
        Ok(())
    }

    pub fn jam_door(&mut self, id: DoorId) -> Result<(), BoardError> {
        self.set_door(id, DoorState::Jammed)
    }

    fn sync_door(&mut self, pair: usize) {
        let Some(door) = self.doors.get(pair) else {
            return;
        };
        let wall = door.wall_state();
        let sides = [(door.cells[0], door.dirs[0]), (door.cells[1], door.dirs[1])];
        for (pos, dir) in sides {
            if let Some(cell) = self.cell_mut(pos) {
                cell.sides[dir.index()] = wall;
            }
        }
    }

    // ===== zone flags =====

    pub fn set_spawn_zone(&mut self, zone: ZoneId, active: bool) -> Result<(), BoardError> {
        self.zone_mut(zone)?.spawn = active;
        Ok(())
    }

    pub fn spawn_zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.values().filter(|z| z.spawn).map(|z| z.id)
    }

    pub fn add_noise_token(&mut self, zone: ZoneId) -> Result<(), BoardError> {
        let zone = self.zone_mut(zone)?;
        zone.noise_tokens = zone.noise_tokens.saturating_add(1);
        Ok(())
    }

    /// Zone with the most noise; ties go to the lowest id.
    pub fn noisiest_zone(&self) -> Option<ZoneId> {
        self.zones
            .values()
            .filter(|z| z.noise() > 0)
            .max_by(|a, b| a.noise().cmp(&b.noise()).then(b.id.cmp(&a.id)))
            .map(|z| z.id)
    }

    /// Takes the objective in `zone`; returns false if there was none.
    pub fn take_objective(&mut self, zone: ZoneId) -> Result<bool, BoardError> {
        let zone = self.zone_mut(zone)?;
        Ok(std::mem::replace(&mut zone.objective, false))
    }

    pub fn objectives_left(&self) -> usize {
        self.zones.values().filter(|z| z.objective).count()
    }

    pub fn set_dragon_bile(&mut self, zone: ZoneId, bile: bool) -> Result<(), BoardError> {
        self.zone_mut(zone)?.dragon_bile = bile;
        Ok(())
    }

    /// Lights the bile in `zone`. Returns false if there was no bile to light.
    pub fn ignite(&mut self, zone: ZoneId) -> Result<bool, BoardError> {
        let zone = self.zone_mut(zone)?;
        if !zone.dragon_bile {
            return Ok(false);
        }
        zone.dragon_bile = false;
        zone.dragon_fire = true;
        Ok(true)
    }

    /// Reveals every indoor zone connected to `zone` without crossing a
    /// closed side or leaving the building. Returns the newly revealed zones.
    pub fn reveal_building(&mut self, zone: ZoneId) -> Vec<ZoneId> {
        let mut revealed = Vec::new();
        let mut stack = vec![zone];
        let mut seen = std::collections::BTreeSet::from([zone]);
        while let Some(current) = stack.pop() {
            let Some(z) = self.zones.get(&current) else {
                continue;
            };
            if !z.is_indoor() {
                continue;
            }
            if !z.revealed {
                revealed.push(current);
            }
            for next in self.adjacent_zones(current, WallState::is_passable) {
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        for id in &revealed {
            if let Some(z) = self.zones.get_mut(id) {
                z.revealed = true;
            }
        }
        revealed
    }

    /// Clears noise tokens and dragon fire at the end of a round.
    pub fn end_round(&mut self) {
        for zone in self.zones.values_mut() {
            zone.noise_tokens = 0;
            zone.dragon_fire = false;
        }
    }

    /// Zones sharing a side with `zone` whose wall state passes `open`.
    pub fn adjacent_zones(&self, zone: ZoneId, open: fn(WallState) -> bool) -> Vec<ZoneId> {
        let Some(z) = self.zones.get(&zone) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &pos in &z.cells {
            let Some(cell) = self.cell(pos) else { continue };
            for dir in Direction::ALL {
                if !open(cell.side(dir)) {
                    continue;
                }
                if let Some(next) = self.neighbor(pos, dir).and_then(|p| self.zone_at(p))
                    && next != zone
                    && !out.contains(&next)
                {
                    out.push(next);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Street zone 1 at (0,0) and building zone 2 at (1,0) behind a closed door.
    pub(crate) fn street_and_building() -> Board {
        BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Building)
            .door(CellPos::new(0, 0), Direction::East, DoorState::Closed, None)
            .build()
            .expect("valid board")
    }

    #[test]
    fn door_toggle_updates_both_cells() {
        let mut board = street_and_building();
        let door = DoorId(0);
        assert_eq!(
            board.cell(CellPos::new(0, 0)).unwrap().side(Direction::East),
            WallState::Closed
        );
        board.set_door(door.other_side(), DoorState::Open).unwrap();
        assert_eq!(
            board.cell(CellPos::new(0, 0)).unwrap().side(Direction::East),
            WallState::Open
        );
        assert_eq!(
            board.cell(CellPos::new(1, 0)).unwrap().side(Direction::West),
            WallState::Open
        );
        board.set_door_locked(door, true).unwrap();
        assert_eq!(
            board.cell(CellPos::new(1, 0)).unwrap().side(Direction::West),
            WallState::Locked
        );
    }

    #[test]
    fn door_zones_are_reported_from_each_side() {
        let board = street_and_building();
        assert_eq!(board.door_zones(DoorId(0)), Some((ZoneId(1), ZoneId(2))));
        assert_eq!(board.door_zones(DoorId(1)), Some((ZoneId(2), ZoneId(1))));
    }

    #[test]
    fn opening_reveals_the_building() {
        let mut board = street_and_building();
        assert!(!board.zone(ZoneId(2)).unwrap().revealed);
        assert_eq!(board.reveal_building(ZoneId(2)), vec![ZoneId(2)]);
        assert!(board.reveal_building(ZoneId(2)).is_empty());
    }

    #[test]
    fn bile_ignites_once() {
        let mut board = street_and_building();
        assert!(!board.ignite(ZoneId(1)).unwrap());
        board.set_dragon_bile(ZoneId(1), true).unwrap();
        assert!(board.ignite(ZoneId(1)).unwrap());
        assert!(board.zone(ZoneId(1)).unwrap().dragon_fire);
        board.end_round();
        assert!(!board.zone(ZoneId(1)).unwrap().dragon_fire);
    }

    #[test]
    fn unknown_zone_is_a_validation_error() {
        let mut board = street_and_building();
        let err = board.add_noise_token(ZoneId(9)).unwrap_err();
        assert_eq!(err, BoardError::UnknownZone { zone: ZoneId(9) });
    }
}
