//! Move catalogue: every legal move of the acting survivor with its cost.

use arrayvec::ArrayVec;

use crate::action::{ActionKind, AttackKind};
use crate::actor::Survivor;
use crate::board::{Direction, Faction, WallState};
use crate::combat::Stat;
use crate::env::{QuestHooks, QuestMove};
use crate::item::{Equipment, EquipmentTraits};
use crate::skills::{CostContext, FreeActions, ModifierPipeline};
use crate::state::{ActorId, DoorId, EquipmentId, GameState, ZoneId};

use super::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    /// Step out of the current cell into a neighbouring zone.
    Walk {
        dir: Direction,
    },
    WalkTo {
        zone: ZoneId,
    },
    Sprint {
        zone: ZoneId,
    },
    Attack {
        attack: AttackKind,
        weapons: ArrayVec<EquipmentId, 2>,
    },
    Reload {
        weapon: EquipmentId,
    },
    Search,
    Organize,
    Trade {
        partner: ActorId,
    },
    OpenDoor {
        door: DoorId,
        with: EquipmentId,
    },
    CloseDoor {
        door: DoorId,
    },
    Barricade {
        door: DoorId,
    },
    Throw {
        item: EquipmentId,
    },
    Enchant {
        spell: EquipmentId,
    },
    TakeObjective,
    OperateSiege {
        engine: ActorId,
    },
    PushSiege {
        engine: ActorId,
        zone: ZoneId,
    },
    Quest(QuestMove),
    EndTurn,
}

impl Move {
    pub fn action(&self) -> ActionKind {
        match self {
            Move::Walk { .. } | Move::WalkTo { .. } | Move::Sprint { .. } => ActionKind::Move,
            Move::PushSiege { .. } => ActionKind::Move,
            Move::Attack { attack, .. } => attack.action(),
            Move::Reload { .. } => ActionKind::Reload,
            Move::Search => ActionKind::Search,
            Move::Organize => ActionKind::Organize,
            Move::Trade { .. } => ActionKind::Trade,
            Move::OpenDoor { .. } | Move::CloseDoor { .. } | Move::Barricade { .. } => {
                ActionKind::Door
            }
            Move::Throw { .. } => ActionKind::Throw,
            Move::Enchant { .. } => ActionKind::Enchant,
            Move::TakeObjective => ActionKind::Objective,
            Move::OperateSiege { .. } => ActionKind::Siege,
            Move::Quest(_) => ActionKind::Quest,
            Move::EndTurn => ActionKind::EndTurn,
        }
    }
}

/// A catalogue entry: the move, its cost in actions, and the free-action
/// kind paying for it (empty when paid with actions).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOption {
    pub mv: Move,
    pub cost: u8,
    pub free: FreeActions,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalogue {
    options: Vec<MoveOption>,
}

impl Catalogue {
    /// Fails if two entries carry the same move.
    pub fn from_moves(actor: ActorId, options: Vec<MoveOption>) -> Result<Self, EngineError> {
        for (i, a) in options.iter().enumerate() {
            if options[..i].iter().any(|b| b.mv == a.mv) {
                return Err(EngineError::DuplicateMove {
                    actor,
                    mv: a.mv.clone(),
                });
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[MoveOption] {
        &self.options
    }

    pub fn into_options(self) -> Vec<MoveOption> {
        self.options
    }

    pub fn get(&self, index: usize) -> Option<&MoveOption> {
        self.options.get(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Prices actions for one survivor: skill cost folds first, then an unused
/// matching free action may pay the rest.
pub(crate) struct Pricer {
    pipeline: ModifierPipeline,
    free_left: FreeActions,
    hostile_penalty: u8,
}

impl Pricer {
    pub(crate) fn new(state: &GameState, survivor: &Survivor, zone: ZoneId) -> Self {
        let pipeline = survivor.skills.pipeline();
        let free_left = pipeline.free_actions().difference(survivor.turn.free_used);
        let hostile_penalty = state.board.has_faction(zone, Faction::Horde) as u8;
        Self {
            pipeline,
            free_left,
            hostile_penalty,
        }
    }

    pub(crate) fn price(&self, mv: Move) -> MoveOption {
        let action = mv.action();
        if action == ActionKind::EndTurn {
            return MoveOption {
                mv,
                cost: 0,
                free: FreeActions::empty(),
            };
        }
        let penalty = if action == ActionKind::Move {
            self.hostile_penalty
        } else {
            0
        };
        let cost = self.pipeline.fold_cost(CostContext {
            action,
            cost: 1,
            hostile_penalty: penalty,
        });
        if cost > 0
            && let Some(payer) = FreeActions::payers(action)
                .iter()
                .find(|p| self.free_left.contains(**p))
        {
            return MoveOption {
                mv,
                cost: 0,
                free: *payer,
            };
        }
        MoveOption {
            mv,
            cost,
            free: FreeActions::empty(),
        }
    }
}

/// Effective stat of a weapon group for this survivor.
pub(crate) fn weapon_stat(survivor: &Survivor, weapons: &[Equipment]) -> Option<Stat> {
    let base = Stat::from_weapons(weapons)?;
    let intrinsic = weapons.first().map_or(&[][..], |w| w.kind.def().intrinsic);
    Some(
        survivor
            .skills
            .pipeline()
            .with_intrinsics(intrinsic)
            .fold_stat(base),
    )
}

/// Weapon groups in hand: a pair of identical dual weapons merges into one
/// entry, every other weapon stands alone.
pub(crate) fn weapon_groups(survivor: &Survivor) -> Vec<ArrayVec<Equipment, 2>> {
    let hands: Vec<Equipment> = survivor
        .inventory
        .hands()
        .filter(|w| w.kind.attack_kind().is_some())
        .copied()
        .collect();
    if let [a, b] = hands.as_slice()
        && a.kind == b.kind
        && a.kind.traits().contains(EquipmentTraits::DUAL)
    {
        return vec![ArrayVec::from([*a, *b])];
    }
    hands
        .into_iter()
        .map(|w| {
            let mut group = ArrayVec::new();
            group.push(w);
            group
        })
        .collect()
}

/// Builds the catalogue for `actor`. Entries cost at most the actions left;
/// an actor with no actions only sees zero-cost entries. End turn is only
/// offered next to something else, so an empty catalogue forfeits the turn.
pub fn build_catalogue(
    state: &GameState,
    quest: &dyn QuestHooks,
    actor: ActorId,
) -> Result<Catalogue, EngineError> {
    let Some(entry) = state.actors.get(actor) else {
        return Catalogue::from_moves(actor, Vec::new());
    };
    let (Some(survivor), Some(origin), Some(spot)) = (
        entry.survivor(),
        state.board.zone_of(actor),
        state.board.spot_of(actor),
    ) else {
        return Catalogue::from_moves(actor, Vec::new());
    };
    let board = &state.board;
    let pricer = Pricer::new(state, survivor, origin);
    let grant = survivor.skills.pipeline().move_grant();
    let hostiles_here = board.has_faction(origin, Faction::Horde);
    let mut moves: Vec<Move> = Vec::new();

    // movement
    if let Some(cell) = board.cell(spot.cell) {
        for dir in Direction::ALL {
            if !cell.side(dir).is_passable() {
                continue;
            }
            if let Some(next) = board.neighbor(spot.cell, dir)
                && board.zone_at(next) != Some(origin)
                && board.cell(next).is_some_and(|c| !c.is_full())
            {
                moves.push(Move::Walk { dir });
            }
        }
    }
    let speed = grant.zones_per_move.max(1) as u32;
    let walkable: Vec<ZoneId> = board
        .accessible_zones(origin, 1, speed, ActionKind::Move)
        .into_iter()
        .filter(|z| board.free_quadrants(*z) > 0)
        .collect();
    moves.extend(walkable.iter().map(|zone| Move::WalkTo { zone: *zone }));
    if grant.sprint && !survivor.turn.sprinted {
        moves.extend(
            board
                .accessible_zones(origin, speed + 1, speed + 2, ActionKind::Move)
                .into_iter()
                .filter(|z| board.free_quadrants(*z) > 0)
                .map(|zone| Move::Sprint { zone }),
        );
    }

    // combat
    for group in weapon_groups(survivor) {
        let Some(stat) = weapon_stat(survivor, &group) else {
            continue;
        };
        let usable = if stat.attack == AttackKind::Melee {
            hostiles_here
        } else {
            !board
                .accessible_zones(origin, stat.min_range as u32, stat.max_range as u32, stat.action)
                .is_empty()
        };
        if usable {
            moves.push(Move::Attack {
                attack: stat.attack,
                weapons: group.iter().map(|w| w.id).collect(),
            });
        }
    }
    for weapon in survivor.inventory.hands() {
        if weapon.needs_reload() {
            moves.push(Move::Reload { weapon: weapon.id });
        }
    }

    // interaction
    if board.zone(origin).is_some_and(|z| z.is_indoor())
        && !survivor.turn.searched
        && !hostiles_here
        && !state.equipment.is_empty()
    {
        moves.push(Move::Search);
    }
    if !survivor.inventory.is_empty() {
        moves.push(Move::Organize);
    }
    for other in state.actors.in_zone(board, origin) {
        if other.id != actor && other.survivor().is_some_and(Survivor::is_in_play) {
            moves.push(Move::Trade { partner: other.id });
        }
    }
    let breachers: Vec<EquipmentId> = survivor
        .inventory
        .hands()
        .filter(|w| w.kind.def().door_breach.is_some())
        .map(|w| w.id)
        .collect();
    let mut door_pairs: Vec<usize> = Vec::new();
    for &door in board.zone(origin).map(|z| z.doors.as_slice()).unwrap_or(&[]) {
        // a door inside one zone lists both of its sides
        if door_pairs.contains(&door.pair()) {
            continue;
        }
        door_pairs.push(door.pair());
        let Some(d) = board.door(door) else { continue };
        match d.wall_state() {
            WallState::Closed => {
                moves.extend(breachers.iter().map(|w| Move::OpenDoor { door, with: *w }));
                moves.push(Move::Barricade { door });
            }
            WallState::Open => moves.push(Move::CloseDoor { door }),
            _ => {}
        }
    }
    for item in survivor.inventory.hands() {
        let traits = item.kind.traits();
        let (min, max) = item.kind.def().range;
        if traits.contains(EquipmentTraits::THROWABLE) {
            let zones = board.accessible_zones(origin, min as u32, max as u32, ActionKind::Throw);
            let torch = traits.contains(EquipmentTraits::TORCH);
            if zones
                .iter()
                .any(|z| !torch || board.zone(*z).is_some_and(|z| z.dragon_bile))
            {
                moves.push(Move::Throw { item: item.id });
            }
        }
        if traits.contains(EquipmentTraits::ENCHANTMENT)
            && !board
                .accessible_zones(origin, min as u32, max as u32, ActionKind::Enchant)
                .is_empty()
        {
            moves.push(Move::Enchant { spell: item.id });
        }
    }
    if board.zone(origin).is_some_and(|z| z.objective) {
        moves.push(Move::TakeObjective);
    }

    // siege engines
    for engine in state.actors.in_zone(board, origin) {
        let Some(siege) = engine.siege() else { continue };
        let stat = siege.stat();
        if !board
            .accessible_zones(origin, stat.min_range as u32, stat.max_range as u32, stat.action)
            .is_empty()
        {
            moves.push(Move::OperateSiege { engine: engine.id });
        }
        for zone in board.accessible_zones(origin, 1, 1, ActionKind::Move) {
            if board.free_quadrants(zone) >= 2 {
                moves.push(Move::PushSiege {
                    engine: engine.id,
                    zone,
                });
            }
        }
    }

    moves.extend(quest.moves(state, actor).into_iter().map(Move::Quest));

    let actions_left = entry.actions_left;
    let mut options: Vec<MoveOption> = moves
        .into_iter()
        .map(|mv| pricer.price(mv))
        .filter(|o| o.cost <= actions_left)
        .collect();
    if !options.is_empty() {
        options.push(pricer.price(Move::EndTurn));
    }
    Catalogue::from_moves(actor, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::AdversaryKind;
    use crate::env::NoQuest;
    use crate::item::EquipmentKind;
    use crate::state::PlayerId;
    use crate::state::tests::street_state;

    fn hero(state: &mut GameState) -> ActorId {
        state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap()
    }

    #[test]
    fn duplicates_are_rejected() {
        let entry = MoveOption {
            mv: Move::Search,
            cost: 1,
            free: FreeActions::empty(),
        };
        let err = Catalogue::from_moves(ActorId(1), vec![entry.clone(), entry]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMove { .. }));
    }

    #[test]
    fn no_actions_means_only_free_entries() {
        let mut state = street_state(&[]);
        let id = hero(&mut state);
        state.give_equipment(id, EquipmentKind::Sword).unwrap();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();

        let full = build_catalogue(&state, &NoQuest, id).unwrap();
        assert!(full.options().iter().any(|o| matches!(o.mv, Move::Attack { .. })));
        assert_eq!(full.options().last().map(|o| &o.mv), Some(&Move::EndTurn));

        state.actors.get_mut(id).unwrap().actions_left = 0;
        let empty = build_catalogue(&state, &NoQuest, id).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn free_combat_action_prices_attacks_at_zero() {
        let mut state = street_state(&[]);
        let id = hero(&mut state);
        state.give_equipment(id, EquipmentKind::Sword).unwrap();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        state
            .survivor_mut(id)
            .unwrap()
            .skills
            .acquire(crate::skills::SkillKind::PlusOneFreeCombat);
        state.actors.get_mut(id).unwrap().actions_left = 0;

        let catalogue = build_catalogue(&state, &NoQuest, id).unwrap();
        let attack = catalogue
            .options()
            .iter()
            .find(|o| matches!(o.mv, Move::Attack { .. }))
            .unwrap();
        assert_eq!(attack.cost, 0);
        assert_eq!(attack.free, FreeActions::COMBAT);
        assert!(catalogue.options().iter().all(|o| o.cost == 0));
    }

    #[test]
    fn dual_daggers_merge() {
        let mut state = street_state(&[]);
        let id = hero(&mut state);
        state.give_equipment(id, EquipmentKind::Dagger).unwrap();
        state.give_equipment(id, EquipmentKind::Dagger).unwrap();
        let groups = weapon_groups(state.survivor(id).unwrap());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn door_inside_one_zone_is_offered_once() {
        use crate::board::{BoardBuilder, DoorState, Environment};
        use crate::config::GameConfig;
        use crate::dice::DiceBag;
        use crate::item::EquipmentDeck;
        use crate::spawn::SpawnDeck;
        use crate::state::CellPos;

        let board = BoardBuilder::new(2, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Building)
            .cell(CellPos::new(1, 0), ZoneId(1), Environment::Building)
            .door(CellPos::new(0, 0), Direction::East, DoorState::Closed, None)
            .start(CellPos::new(0, 0))
            .build()
            .unwrap();
        assert_eq!(board.zone(ZoneId(1)).unwrap().doors.len(), 2);
        let mut state = GameState::with_decks(
            DiceBag::stacked(&[]),
            EquipmentDeck::stacked(&[]),
            SpawnDeck::stacked(&[]),
            GameConfig::default(),
            board,
        );
        state.add_player("p0");
        let id = hero(&mut state);
        state.give_equipment(id, EquipmentKind::Axe).unwrap();

        let catalogue = build_catalogue(&state, &NoQuest, id).unwrap();
        let count = |f: fn(&Move) -> bool| catalogue.options().iter().filter(|o| f(&o.mv)).count();
        assert_eq!(count(|mv| matches!(mv, Move::OpenDoor { .. })), 1);
        assert_eq!(count(|mv| matches!(mv, Move::Barricade { .. })), 1);
    }
}
