use std::collections::{BTreeMap, VecDeque};

use crate::config::GameConfig;
use crate::state::{CellPos, DoorId, ZoneId};

use super::{
    Board, BoardError, Cell, Direction, Door, DoorState, Environment, LockColor, WallState, Zone,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SideDecl {
    Wall(WallState),
    Door {
        state: DoorState,
        lock: Option<LockColor>,
    },
}

#[derive(Clone, Copy, Debug)]
enum Marker {
    Spawn,
    Objective,
    Start,
}

/// Assembles a validated [`Board`].
///
/// Declarations may reference cells that are declared later; mirroring and
/// validation happen in [`BoardBuilder::build`], which reports the first
/// invariant violation.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    sides: Vec<(CellPos, Direction, SideDecl)>,
    links: Vec<(CellPos, Direction, CellPos, DoorState)>,
    markers: Vec<(CellPos, Marker)>,
    error: Option<BoardError>,
}

impl BoardBuilder {
    /// Starts a board where every cell is void.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Cell::void(CellPos::new(x, y))))
            .collect();
        Self {
            width,
            height,
            cells,
            sides: Vec::new(),
            links: Vec::new(),
            markers: Vec::new(),
            error: None,
        }
    }

    fn slot(&mut self, pos: CellPos) -> Option<&mut Cell> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.width
            && (pos.y as u32) < self.height;
        if !in_bounds {
            self.fail(BoardError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
            return None;
        }
        let index = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get_mut(index)
    }

    fn fail(&mut self, error: BoardError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn cell(mut self, pos: CellPos, zone: ZoneId, environment: Environment) -> Self {
        if let Some(cell) = self.slot(pos) {
            cell.zone = Some(zone);
            cell.environment = environment;
        }
        self
    }

    /// Declares a wall, rampart or explicit opening; mirrored onto the neighbor.
    pub fn side(mut self, pos: CellPos, dir: Direction, wall: WallState) -> Self {
        self.sides.push((pos, dir, SideDecl::Wall(wall)));
        self
    }

    /// Declares a door on a cardinal side. A lock color makes it locked.
    pub fn door(
        mut self,
        pos: CellPos,
        dir: Direction,
        state: DoorState,
        lock: Option<LockColor>,
    ) -> Self {
        self.sides.push((pos, dir, SideDecl::Door { state, lock }));
        self
    }

    /// Declares a vertical link (stairs, hatch) guarded by a door.
    pub fn link(mut self, pos: CellPos, dir: Direction, target: CellPos, state: DoorState) -> Self {
        if !dir.is_vertical() {
            self.fail(BoardError::UnmatchedLink { pos, dir });
            return self;
        }
        self.links.push((pos, dir, target, state));
        self
    }

    pub fn spawn(mut self, pos: CellPos) -> Self {
        self.markers.push((pos, Marker::Spawn));
        self
    }

    pub fn objective(mut self, pos: CellPos) -> Self {
        self.markers.push((pos, Marker::Objective));
        self
    }

    pub fn start(mut self, pos: CellPos) -> Self {
        self.markers.push((pos, Marker::Start));
        self
    }

    pub fn capacity(mut self, pos: CellPos, capacity: u8) -> Self {
        if let Some(cell) = self.slot(pos) {
            cell.capacity = capacity;
        }
        self
    }

    pub fn build(self) -> Result<Board, BoardError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let BoardBuilder {
            width,
            height,
            cells,
            sides,
            links,
            markers,
            ..
        } = self;

        let mut board = Board {
            width,
            height,
            cells,
            zones: BTreeMap::new(),
            doors: Vec::new(),
            locations: BTreeMap::new(),
        };

        // zones and capacities
        for i in 0..board.cells.len() {
            let cell = &board.cells[i];
            let Some(zone_id) = cell.zone else { continue };
            if cell.capacity == 0 || cell.capacity as usize > GameConfig::MAX_QUADRANTS {
                return Err(BoardError::BadCapacity {
                    pos: cell.pos,
                    capacity: cell.capacity,
                });
            }
            let (pos, environment) = (cell.pos, cell.environment);
            let zone = board
                .zones
                .entry(zone_id)
                .or_insert_with(|| Zone::new(zone_id, environment));
            if zone.environment != environment {
                return Err(BoardError::MixedEnvironment { zone: zone_id });
            }
            zone.cells.push(pos);
        }
        if board.zones.is_empty() {
            return Err(BoardError::Empty);
        }
        for zone in board.zones.values() {
            check_connected(&board, zone)?;
        }

        apply_sides(&mut board, &sides)?;
        apply_links(&mut board, &links)?;

        for (pos, marker) in markers {
            let zone_id = board
                .zone_at(pos)
                .ok_or(BoardError::VoidCell { pos })?;
            if let (Marker::Spawn, Some(cell)) = (marker, board.cell_mut(pos)) {
                cell.spawn = true;
            }
            let zone = board.zone_mut(zone_id)?;
            match marker {
                Marker::Spawn => zone.spawn = true,
                Marker::Objective => zone.objective = true,
                Marker::Start => {
                    zone.starting = true;
                    zone.revealed = true;
                }
            }
        }

        // door lists and counterpart checks
        for pair in 0..board.doors.len() {
            let door = board.doors[pair].clone();
            for slot in 0..2 {
                let id = DoorId((pair * 2 + slot) as u16);
                let (pos, dir) = (door.cells[slot], door.dirs[slot]);
                let cell = board
                    .cell(pos)
                    .ok_or(BoardError::MissingDoorCounterpart { door: id })?;
                if cell.doors[dir.index()] != Some(id) || cell.side(dir) != door.wall_state() {
                    return Err(BoardError::MissingDoorCounterpart { door: id });
                }
                let zone_id = cell
                    .zone
                    .ok_or(BoardError::MissingDoorCounterpart { door: id })?;
                board.zone_mut(zone_id)?.doors.push(id);
            }
        }

        for cell in &board.cells {
            for dir in [Direction::Ascend, Direction::Descend] {
                let Some(slot) = dir.link_slot() else { continue };
                let Some(target) = cell.links[slot] else { continue };
                let back = dir.opposite().link_slot().and_then(|s| {
                    board.cell(target).and_then(|t| t.links[s])
                });
                if back != Some(cell.pos) {
                    return Err(BoardError::UnmatchedLink { pos: cell.pos, dir });
                }
            }
        }

        tracing::debug!(
            target: "horde::board",
            width,
            height,
            zones = board.zones.len(),
            doors = board.doors.len(),
            "board built"
        );
        Ok(board)
    }
}

fn check_connected(board: &Board, zone: &Zone) -> Result<(), BoardError> {
    let Some(&first) = zone.cells.first() else {
        return Err(BoardError::DisconnectedZone { zone: zone.id });
    };
    let mut seen = vec![first];
    let mut queue = VecDeque::from([first]);
    while let Some(pos) = queue.pop_front() {
        for dir in Direction::CARDINAL {
            let (dx, dy) = dir.delta();
            let next = pos.offset(dx, dy);
            if board.zone_at(next) == Some(zone.id) && !seen.contains(&next) {
                seen.push(next);
                queue.push_back(next);
            }
        }
    }
    if seen.len() == zone.cells.len() {
        Ok(())
    } else {
        Err(BoardError::DisconnectedZone { zone: zone.id })
    }
}

fn apply_sides(
    board: &mut Board,
    sides: &[(CellPos, Direction, SideDecl)],
) -> Result<(), BoardError> {
    let mut declared: BTreeMap<(CellPos, Direction), SideDecl> = BTreeMap::new();
    for &(pos, dir, decl) in sides {
        if board.zone_at(pos).is_none() {
            return Err(BoardError::VoidCell { pos });
        }
        if dir.is_vertical() {
            return Err(BoardError::ConflictingSide { pos, dir });
        }
        let (dx, dy) = dir.delta();
        let far = pos.offset(dx, dy);
        let far_exists = board.zone_at(far).is_some();

        match declared.get(&(pos, dir)) {
            Some(existing) if *existing == decl => continue,
            Some(_) => return Err(BoardError::ConflictingSide { pos, dir }),
            None => {}
        }
        declared.insert((pos, dir), decl);
        if far_exists {
            declared.insert((far, dir.opposite()), decl);
        }

        match decl {
            SideDecl::Wall(wall) => {
                if let Some(cell) = board.cell_mut(pos) {
                    cell.sides[dir.index()] = wall;
                }
                if far_exists && let Some(cell) = board.cell_mut(far) {
                    cell.sides[dir.opposite().index()] = wall;
                }
            }
            SideDecl::Door { state, lock } => {
                if !far_exists {
                    return Err(BoardError::VoidCell { pos: far });
                }
                add_door(board, [pos, far], [dir, dir.opposite()], state, lock);
            }
        }
    }
    Ok(())
}

fn apply_links(
    board: &mut Board,
    links: &[(CellPos, Direction, CellPos, DoorState)],
) -> Result<(), BoardError> {
    for &(pos, dir, target, state) in links {
        if board.zone_at(pos).is_none() {
            return Err(BoardError::VoidCell { pos });
        }
        if board.zone_at(target).is_none() {
            return Err(BoardError::VoidCell { pos: target });
        }
        let (Some(slot), Some(back)) = (dir.link_slot(), dir.opposite().link_slot()) else {
            return Err(BoardError::UnmatchedLink { pos, dir });
        };
        let existing = board.cell(pos).and_then(|c| c.links[slot]);
        let existing_back = board.cell(target).and_then(|c| c.links[back]);
        match (existing, existing_back) {
            // declared from the other end already
            (Some(a), Some(b)) if a == target && b == pos => {
                let door = board
                    .cell(pos)
                    .and_then(|c| c.doors[dir.index()])
                    .and_then(|id| board.door(id));
                if door.map(|d| d.state) != Some(state) {
                    return Err(BoardError::ConflictingSide { pos, dir });
                }
                continue;
            }
            (None, None) => {}
            _ => return Err(BoardError::UnmatchedLink { pos, dir }),
        }
        if let Some(cell) = board.cell_mut(pos) {
            cell.links[slot] = Some(target);
        }
        if let Some(cell) = board.cell_mut(target) {
            cell.links[back] = Some(pos);
        }
        add_door(board, [pos, target], [dir, dir.opposite()], state, None);
    }
    Ok(())
}

fn add_door(
    board: &mut Board,
    cells: [CellPos; 2],
    dirs: [Direction; 2],
    state: DoorState,
    lock: Option<LockColor>,
) {
    let pair = board.doors.len();
    let door = Door {
        cells,
        dirs,
        state,
        lock,
        locked: lock.is_some(),
    };
    let wall = door.wall_state();
    board.doors.push(door);
    for slot in 0..2 {
        if let Some(cell) = board.cell_mut(cells[slot]) {
            cell.sides[dirs[slot].index()] = wall;
            cell.doors[dirs[slot].index()] = Some(DoorId((pair * 2 + slot) as u16));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_mirror_onto_neighbors() {
        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .side(CellPos::new(1, 0), Direction::West, WallState::Rampart)
            .build()
            .unwrap();
        assert_eq!(
            board.cell(CellPos::new(0, 0)).unwrap().side(Direction::East),
            WallState::Rampart
        );
    }

    #[test]
    fn same_door_declared_from_both_sides_is_one_door() {
        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Building)
            .door(CellPos::new(0, 0), Direction::East, DoorState::Closed, None)
            .door(CellPos::new(1, 0), Direction::West, DoorState::Closed, None)
            .build()
            .unwrap();
        assert_eq!(board.door_sides().count(), 2);
        assert_eq!(board.zone(ZoneId(1)).unwrap().doors, vec![DoorId(0)]);
        assert_eq!(board.zone(ZoneId(2)).unwrap().doors, vec![DoorId(1)]);
    }

    #[test]
    fn conflicting_sides_are_rejected() {
        let err = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .side(CellPos::new(0, 0), Direction::East, WallState::Wall)
            .door(CellPos::new(1, 0), Direction::West, DoorState::Open, None)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::ConflictingSide {
                pos: CellPos::new(1, 0),
                dir: Direction::West
            }
        );
    }

    #[test]
    fn disconnected_zone_is_fatal() {
        let err = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(1), Environment::Street)
            .build()
            .unwrap_err();
        assert_eq!(err, BoardError::DisconnectedZone { zone: ZoneId(1) });
    }

    #[test]
    fn mixed_environment_is_fatal() {
        let err = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(1), Environment::Building)
            .build()
            .unwrap_err();
        assert_eq!(err, BoardError::MixedEnvironment { zone: ZoneId(1) });
    }

    #[test]
    fn bad_capacity_is_fatal() {
        let err = BoardBuilder::new(1, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .capacity(CellPos::new(0, 0), 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, BoardError::BadCapacity { capacity: 0, .. }));
    }

    #[test]
    fn door_onto_void_is_rejected() {
        let err = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .door(CellPos::new(0, 0), Direction::East, DoorState::Open, None)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::VoidCell {
                pos: CellPos::new(1, 0)
            }
        );
    }

    #[test]
    fn vertical_links_are_mutual_doors() {
        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Building)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Building)
            .side(CellPos::new(0, 0), Direction::East, WallState::Wall)
            .link(CellPos::new(0, 0), Direction::Ascend, CellPos::new(1, 0), DoorState::Open)
            .link(CellPos::new(1, 0), Direction::Descend, CellPos::new(0, 0), DoorState::Open)
            .build()
            .unwrap();
        assert_eq!(board.door_sides().count(), 2);
        assert_eq!(
            board.neighbor(CellPos::new(0, 0), Direction::Ascend),
            Some(CellPos::new(1, 0))
        );
        assert_eq!(
            board.cell(CellPos::new(1, 0)).unwrap().side(Direction::Descend),
            WallState::Open
        );
    }

    #[test]
    fn empty_board_is_rejected() {
        assert_eq!(BoardBuilder::new(2, 2).build().unwrap_err(), BoardError::Empty);
    }

    #[test]
    fn locked_door_shows_locked_on_both_cells() {
        let board = BoardBuilder::new(1, 2)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(0, 1), ZoneId(2), Environment::Vault)
            .door(
                CellPos::new(0, 0),
                Direction::South,
                DoorState::Closed,
                Some(LockColor::Red),
            )
            .build()
            .unwrap();
        assert_eq!(
            board.cell(CellPos::new(0, 1)).unwrap().side(Direction::North),
            WallState::Locked
        );
        assert!(board.door(DoorId(0)).unwrap().locked);
    }
}
