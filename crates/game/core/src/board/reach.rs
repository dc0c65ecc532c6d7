//! Zone reach and line-of-sight queries.

use std::collections::{BTreeMap, VecDeque};

use crate::action::{ActionKind, Reach};
use crate::state::{CellPos, ZoneId};

use super::{Board, Direction, Faction, WallState};

impl Board {
    /// Zones an action of `kind` can reach from `from`, at a zone distance in
    /// `min..=max`. Sorted and deduplicated.
    ///
    /// `Move` walks the zone graph through passable sides and does not expand
    /// past a zone holding adversaries. Line actions trace cardinal lines from
    /// every cell of `from`.
    pub fn accessible_zones(
        &self,
        from: ZoneId,
        min: u32,
        max: u32,
        kind: ActionKind,
    ) -> Vec<ZoneId> {
        if self.zone(from).is_none() || min > max {
            return Vec::new();
        }
        let distances: BTreeMap<ZoneId, Vec<u32>> = match kind.reach() {
            Reach::Zone => BTreeMap::from([(from, vec![0])]),
            Reach::Walk => self
                .walk_distances(from, max)
                .into_iter()
                .map(|(z, d)| (z, vec![d]))
                .collect(),
            Reach::Sight => self.line_distances(from, max, false),
            Reach::Lobbed => self.line_distances(from, max, true),
        };
        distances
            .into_iter()
            .filter(|(_, ds)| ds.iter().any(|d| (min..=max).contains(d)))
            .map(|(z, _)| z)
            .collect()
    }

    /// True if some cell of `a` has an unobstructed cardinal line into `b`
    /// crossing at most one indoor zone boundary.
    pub fn can_see(&self, a: ZoneId, b: ZoneId) -> bool {
        if a == b {
            return self.zone(a).is_some();
        }
        self.line_distances(a, u32::MAX, false).contains_key(&b)
    }

    /// Zone-graph BFS for movement, halted by hostile zones.
    fn walk_distances(&self, from: ZoneId, max: u32) -> BTreeMap<ZoneId, u32> {
        let mut dist = BTreeMap::from([(from, 0u32)]);
        let mut queue = VecDeque::from([from]);
        while let Some(zone) = queue.pop_front() {
            let d = dist[&zone];
            if d >= max {
                continue;
            }
            if zone != from && self.has_faction(zone, Faction::Horde) {
                continue;
            }
            for next in self.adjacent_zones(zone, WallState::is_passable) {
                if let std::collections::btree_map::Entry::Vacant(slot) = dist.entry(next) {
                    slot.insert(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Every zone hit by cardinal lines out of `from`, with each distance it
    /// was seen at. `lobbed` lines ignore walls.
    fn line_distances(&self, from: ZoneId, max: u32, lobbed: bool) -> BTreeMap<ZoneId, Vec<u32>> {
        let mut seen: BTreeMap<ZoneId, Vec<u32>> = BTreeMap::from([(from, vec![0])]);
        let Some(zone) = self.zone(from) else {
            return seen;
        };
        for &start in &zone.cells {
            for dir in Direction::CARDINAL {
                self.trace_line(start, dir, max, lobbed, |z, d| {
                    let entry = seen.entry(z).or_default();
                    if !entry.contains(&d) {
                        entry.push(d);
                    }
                });
            }
        }
        seen
    }

    fn trace_line(
        &self,
        start: CellPos,
        dir: Direction,
        max: u32,
        lobbed: bool,
        mut visit: impl FnMut(ZoneId, u32),
    ) {
        let (dx, dy) = dir.delta();
        let mut pos = start;
        let Some(mut zone) = self.zone_at(start) else {
            return;
        };
        let mut distance = 0u32;
        let mut indoor_crossings = 0u32;
        loop {
            let Some(cell) = self.cell(pos) else { return };
            if !lobbed && !cell.side(dir).is_transparent() {
                return;
            }
            let next = pos.offset(dx, dy);
            let Some(next_zone) = self.zone_at(next) else {
                return;
            };
            if next_zone != zone {
                if !lobbed {
                    let indoor = self.zone(zone).is_some_and(|z| z.is_indoor())
                        || self.zone(next_zone).is_some_and(|z| z.is_indoor());
                    if indoor {
                        if indoor_crossings >= 1 {
                            return;
                        }
                        indoor_crossings += 1;
                    }
                }
                distance += 1;
                if distance > max {
                    return;
                }
                visit(next_zone, distance);
                zone = next_zone;
            }
            pos = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::street_and_building;
    use crate::board::{BoardBuilder, DoorState, Environment, Occupant};
    use crate::state::{ActorId, DoorId};

    /// Five street zones in a row, each one cell wide.
    fn street_row() -> Board {
        let mut builder = BoardBuilder::new(5, 1);
        for x in 0..5 {
            builder = builder.cell(CellPos::new(x, 0), ZoneId(x as u16 + 1), Environment::Street);
        }
        builder.build().unwrap()
    }

    #[test]
    fn closed_door_blocks_movement_until_opened() {
        let mut board = street_and_building();
        assert!(
            board
                .accessible_zones(ZoneId(1), 1, 1, ActionKind::Move)
                .is_empty()
        );
        board.set_door(DoorId(0), DoorState::Open).unwrap();
        assert_eq!(
            board.accessible_zones(ZoneId(1), 1, 1, ActionKind::Move),
            vec![ZoneId(2)]
        );
    }

    #[test]
    fn movement_stops_at_hostile_zones() {
        let mut board = street_row();
        board
            .add_actor(
                Occupant {
                    actor: ActorId(9),
                    priority: 10,
                    noise: 0,
                    faction: Faction::Horde,
                },
                ZoneId(2),
            )
            .unwrap();
        assert_eq!(
            board.accessible_zones(ZoneId(1), 1, 3, ActionKind::Move),
            vec![ZoneId(2)]
        );
    }

    #[test]
    fn ranged_respects_min_and_max() {
        let board = street_row();
        assert_eq!(
            board.accessible_zones(ZoneId(1), 1, 3, ActionKind::Ranged),
            vec![ZoneId(2), ZoneId(3), ZoneId(4)]
        );
        assert_eq!(
            board.accessible_zones(ZoneId(1), 0, 0, ActionKind::Ranged),
            vec![ZoneId(1)]
        );
        assert_eq!(
            board.accessible_zones(ZoneId(1), 0, 4, ActionKind::Melee),
            vec![ZoneId(1)]
        );
    }

    #[test]
    fn walls_block_sight_but_not_lobbed_lines() {
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Street)
            .side(CellPos::new(0, 0), Direction::East, WallState::Wall)
            .build()
            .unwrap();
        assert!(!board.can_see(ZoneId(1), ZoneId(2)));
        assert_eq!(
            board.accessible_zones(ZoneId(1), 1, 2, ActionKind::Indirect),
            vec![ZoneId(2), ZoneId(3)]
        );
    }

    #[test]
    fn ramparts_block_movement_but_not_sight() {
        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .side(CellPos::new(0, 0), Direction::East, WallState::Rampart)
            .build()
            .unwrap();
        assert!(board.can_see(ZoneId(1), ZoneId(2)));
        assert!(
            board
                .accessible_zones(ZoneId(1), 1, 1, ActionKind::Move)
                .is_empty()
        );
    }

    #[test]
    fn sight_crosses_one_indoor_boundary() {
        // street 1 | building 2 | building 3, openings between them
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Building)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Building)
            .build()
            .unwrap();
        assert!(board.can_see(ZoneId(1), ZoneId(2)));
        assert!(!board.can_see(ZoneId(1), ZoneId(3)));
        assert!(board.can_see(ZoneId(2), ZoneId(3)));
        assert!(board.can_see(ZoneId(2), ZoneId(1)));
    }

    #[test]
    fn sight_leaving_a_building_runs_down_the_street() {
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Building)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Street)
            .build()
            .unwrap();
        assert!(board.can_see(ZoneId(1), ZoneId(3)));
    }
}
