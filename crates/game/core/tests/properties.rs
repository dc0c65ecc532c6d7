//! Property-based tests for board, dice and hit allocation invariants.

use std::collections::BTreeSet;

use proptest::prelude::*;

use horde_core::action::AttackKind;
use horde_core::board::Occupant;
use horde_core::combat::{HitOutcome, Target, allocate};
use horde_core::item::AttackProfile;
use horde_core::{
    ActorId, AdversaryKind, Board, BoardBuilder, CellPos, DiceBag, Difficulty, Direction,
    DoorId, DoorState, Environment, Faction, Stat, WallState, ZoneId,
};

const KINDS: [AdversaryKind; 6] = [
    AdversaryKind::Walker,
    AdversaryKind::Runner,
    AdversaryKind::Brute,
    AdversaryKind::Abomination,
    AdversaryKind::Necromancer,
    AdversaryKind::Shade,
];

/// A `width` x `height` grid with one street zone per cell, numbered row by
/// row from 1.
fn grid(width: u32, height: u32) -> BoardBuilder {
    let mut builder = BoardBuilder::new(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let zone = ZoneId((y * width as i32 + x + 1) as u16);
            builder = builder.cell(CellPos::new(x, y), zone, Environment::Street);
        }
    }
    builder
}

/// Five zones in a row with a door between every pair of neighbors.
fn corridor() -> Board {
    let mut builder = grid(5, 1);
    for x in 0..4 {
        builder = builder.door(CellPos::new(x, 0), Direction::East, DoorState::Closed, None);
    }
    builder.build().unwrap()
}

#[derive(Clone, Debug)]
enum DoorOp {
    Set(u16, DoorState),
    Lock(u16, bool),
    Jam(u16),
}

fn door_op() -> impl Strategy<Value = DoorOp> {
    let state = prop_oneof![
        Just(DoorState::Open),
        Just(DoorState::Closed),
        Just(DoorState::Jammed),
    ];
    prop_oneof![
        (0u16..8, state).prop_map(|(id, s)| DoorOp::Set(id, s)),
        (0u16..8, any::<bool>()).prop_map(|(id, l)| DoorOp::Lock(id, l)),
        (0u16..8).prop_map(DoorOp::Jam),
    ]
}

fn melee_or_ranged(melee: bool, damage: u8) -> Stat {
    let (attack, max_range) = if melee {
        (AttackKind::Melee, 0)
    } else {
        (AttackKind::Ranged, 1)
    };
    Stat::from_profile(
        attack,
        AttackProfile {
            dice: 2,
            to_hit: 4,
            damage,
            min_range: 0,
            max_range,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Both sides of every door always show the same wall state, and that
    /// state matches the door record.
    #[test]
    fn door_sides_stay_mirrored(ops in prop::collection::vec(door_op(), 0..40)) {
        let mut board = corridor();
        for op in ops {
            match op {
                DoorOp::Set(id, state) => board.set_door(DoorId(id), state).unwrap(),
                DoorOp::Lock(id, locked) => board.set_door_locked(DoorId(id), locked).unwrap(),
                DoorOp::Jam(id) => board.jam_door(DoorId(id)).unwrap(),
            }
            for side in board.door_sides() {
                let door = board.door(side).unwrap();
                let (pos, dir) = door.side(side);
                let wall = board.cell(pos).unwrap().side(dir);
                prop_assert_eq!(wall, door.wall_state());
                let (other_pos, other_dir) = door.side(side.other_side());
                prop_assert_eq!(board.cell(other_pos).unwrap().side(other_dir), wall);
            }
        }
    }

    /// Zone noise from actors always equals the noise of the actors standing
    /// in the zone, whatever moves happen.
    #[test]
    fn actor_noise_is_conserved(
        noises in prop::collection::vec(0u8..3, 1..12),
        moves in prop::collection::vec((0usize..12, 1u16..=3), 0..40),
    ) {
        let mut board = grid(3, 1).build().unwrap();
        let mut placed = Vec::new();
        for (i, noise) in noises.iter().enumerate() {
            let occupant = Occupant {
                actor: ActorId(i as u32),
                priority: 100,
                noise: *noise,
                faction: Faction::Horde,
            };
            let zone = ZoneId((i % 3) as u16 + 1);
            if board.add_actor(occupant, zone).is_some() {
                placed.push(occupant);
            }
        }
        let total: u16 = placed.iter().map(|o| o.noise as u16).sum();

        for (pick, zone) in moves {
            if let Some(occupant) = placed.get(pick % placed.len().max(1)) {
                board.move_actor(occupant.actor, ZoneId(zone));
            }
            let mut sum = 0u16;
            for zone in board.zones() {
                let here: u16 = board.occupants(zone.id).iter().map(|o| o.noise as u16).sum();
                prop_assert_eq!(zone.actor_noise, here);
                sum += zone.actor_noise;
            }
            prop_assert_eq!(sum, total);
        }
    }

    /// Every path option is a shortest walk that ends in the target zone.
    #[test]
    fn path_options_are_shortest_and_arrive(
        walls in prop::collection::btree_set((0i32..5, 0i32..5, any::<bool>()), 0..10),
        from in (0i32..5, 0i32..5),
        to in (0i32..5, 0i32..5),
    ) {
        let mut builder = grid(5, 5);
        for (x, y, east) in walls {
            let dir = if east { Direction::East } else { Direction::South };
            let edge = if east { x == 4 } else { y == 4 };
            if !edge {
                builder = builder.side(CellPos::new(x, y), dir, WallState::Wall);
            }
        }
        let board = builder.build().unwrap();
        let start = CellPos::new(from.0, from.1);
        let target = board.zone_at(CellPos::new(to.0, to.1)).unwrap();

        let paths = board.shortest_path_options(start, target, 16);
        prop_assert!(paths.len() <= 16);
        let lengths: BTreeSet<usize> = paths.iter().map(Vec::len).collect();
        prop_assert!(lengths.len() <= 1);
        let manhattan = ((from.0 - to.0).abs() + (from.1 - to.1).abs()) as usize;
        for path in &paths {
            prop_assert!(path.len() >= manhattan);
            let mut pos = start;
            for dir in path {
                prop_assert!(board.cell(pos).unwrap().side(*dir).is_passable());
                pos = board.neighbor(pos, *dir).unwrap();
            }
            prop_assert_eq!(board.zone_at(pos), Some(target));
        }
        let distinct: BTreeSet<&Vec<Direction>> = paths.iter().collect();
        prop_assert_eq!(distinct.len(), paths.len());
    }

    /// Open grids always have a path, of exactly Manhattan length.
    #[test]
    fn open_grid_paths_have_manhattan_length(
        from in (0i32..4, 0i32..4),
        to in (0i32..4, 0i32..4),
    ) {
        let board = grid(4, 4).build().unwrap();
        let target = board.zone_at(CellPos::new(to.0, to.1)).unwrap();
        let paths = board.shortest_path_options(CellPos::new(from.0, from.1), target, 64);
        prop_assert!(!paths.is_empty());
        let manhattan = ((from.0 - to.0).abs() + (from.1 - to.1).abs()) as usize;
        for path in paths {
            prop_assert_eq!(path.len(), manhattan);
        }
    }

    /// Drawing one full bag yields exactly the difficulty's face multiset.
    #[test]
    fn dice_bag_deals_its_whole_multiset(seed in any::<u64>(), level in 0usize..3) {
        let difficulty = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard][level];
        let mut bag = DiceBag::new(difficulty, seed);
        for _ in 0..2 {
            let mut counts = [0u8; 6];
            for _ in 0..bag.capacity() {
                let face = bag.draw();
                prop_assert!((1..=6).contains(&face));
                counts[face as usize - 1] += 1;
            }
            prop_assert_eq!(counts, difficulty.face_counts());
        }
    }

    /// Each target takes at most one hit, no more hits land than were
    /// rolled, and a hit destroys exactly when the damage is enough.
    #[test]
    fn allocation_is_bounded(
        kinds in prop::collection::vec(0usize..KINDS.len(), 0..10),
        hits in 0u8..16,
        damage in 1u8..4,
        melee in any::<bool>(),
    ) {
        let targets: Vec<Target> = kinds
            .iter()
            .enumerate()
            .map(|(i, k)| Target::new(ActorId(i as u32), KINDS[*k]))
            .collect();
        let stat = melee_or_ranged(melee, damage);
        let allocation = allocate(&targets, hits, &stat);

        let landed = allocation.outcomes.len();
        prop_assert_eq!(landed, (hits as usize).min(targets.len()));
        prop_assert_eq!(allocation.surplus as usize, hits as usize - landed);
        let hit: BTreeSet<ActorId> = allocation.outcomes.iter().map(HitOutcome::target).collect();
        prop_assert_eq!(hit.len(), landed);
        for outcome in &allocation.outcomes {
            let target = targets.iter().find(|t| t.id == outcome.target()).unwrap();
            let destroyed = matches!(outcome, HitOutcome::Destroyed(_));
            prop_assert_eq!(destroyed, target.min_damage <= damage);
        }
    }
}
