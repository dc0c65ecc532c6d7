//! Rule-based seat: attack first, then objectives, then close in on the horde.

use horde_core::env::{PcgRng, RngOracle};
use horde_core::{
    ActorId, Answer, AttackKind, DecisionProvider, Direction, Equipment, Faction, FamiliarMove,
    GameState, KeepChoice, Move, MoveOption, OrganizeStep, PlayerId, RerollChoice, SkillKind,
    Stat, ZoneId, ZonePurpose,
};
use tracing::debug;

/// Deterministic tactical player.
///
/// Choices depend only on the state, the seed and the target choices it
/// cancelled earlier, so a session replays identically from its seed. Ties
/// between equally short walks are broken by a generator keyed on the
/// round, the actor and its remaining actions.
#[derive(Debug, Clone)]
pub struct TacticalAi {
    seed: u64,
    rally: Option<ZoneId>,
    path_limit: usize,
    /// Round, actor and actions left when a target choice was cancelled;
    /// attacks are not offered again at that exact point.
    declined: Option<(u32, ActorId, u8)>,
}

impl TacticalAi {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rally: None,
            path_limit: 8,
            declined: None,
        }
    }

    /// Zone to head for once every objective is taken.
    pub fn rally_at(mut self, zone: ZoneId) -> Self {
        self.rally = Some(zone);
        self
    }

    fn rng(&self, state: &GameState, actor: ActorId) -> PcgRng {
        let left = state.actors.get(actor).map_or(0, |a| a.actions_left as u32);
        PcgRng::new(
            self.seed ^ u64::from(state.round.number),
            (actor.0 << 8) | left,
        )
    }

    fn turn_point(state: &GameState, actor: ActorId) -> (u32, ActorId, u8) {
        let left = state.actors.get(actor).map_or(0, |a| a.actions_left);
        (state.round.number, actor, left)
    }

    fn plan(&self, state: &GameState, actor: ActorId, options: &[MoveOption]) -> usize {
        let find = |wanted: fn(&Move) -> bool| options.iter().position(|o| wanted(&o.mv));

        let may_attack = self.declined != Some(Self::turn_point(state, actor));
        if may_attack
            && let Some(i) = options
                .iter()
                .position(|o| attack_has_targets(state, actor, &o.mv))
        {
            return i;
        }
        if let Some(i) = find(|m| matches!(m, Move::Quest(_) | Move::TakeObjective)) {
            return i;
        }
        if let Some(i) = self.step_toward(state, actor, options, &self.goals(state)) {
            return i;
        }
        if let Some(i) = find(|m| matches!(m, Move::OpenDoor { .. } | Move::Search)) {
            return i;
        }
        find(|m| matches!(m, Move::EndTurn)).unwrap_or(0)
    }

    /// Objectives while any are left, then the rally zone, then the horde.
    fn goals(&self, state: &GameState) -> Vec<ZoneId> {
        let board = &state.board;
        let objectives: Vec<ZoneId> = board
            .zones()
            .filter(|z| z.objective)
            .map(|z| z.id)
            .collect();
        if !objectives.is_empty() {
            return objectives;
        }
        if let Some(rally) = self.rally {
            return vec![rally];
        }
        board
            .zone_ids()
            .filter(|z| board.has_faction(*z, Faction::Horde))
            .collect()
    }

    /// Catalogue index of the first step of a shortest walk to the nearest
    /// goal. `None` when the actor already stands in a goal or none is
    /// reachable.
    fn step_toward(
        &self,
        state: &GameState,
        actor: ActorId,
        options: &[MoveOption],
        goals: &[ZoneId],
    ) -> Option<usize> {
        let board = &state.board;
        let from = board.spot_of(actor)?.cell;
        let origin = board.zone_of(actor)?;

        let mut best: Vec<Vec<Direction>> = Vec::new();
        for goal in goals {
            let paths = board.shortest_path_options(from, *goal, self.path_limit);
            let Some(len) = paths.first().map(Vec::len) else {
                continue;
            };
            if len == 0 {
                return None;
            }
            if best.first().is_none_or(|b| len < b.len()) {
                best = paths;
            }
        }
        if best.is_empty() {
            return None;
        }

        let mut rng = self.rng(state, actor);
        let path = &best[rng.below(best.len() as u32) as usize];

        // first zone the walk enters
        let mut pos = from;
        let mut crossing = None;
        for (i, dir) in path.iter().enumerate() {
            pos = board.neighbor(pos, *dir)?;
            let zone = board.zone_at(pos)?;
            if zone != origin {
                crossing = Some((i, *dir, zone));
                break;
            }
        }
        let (step, dir, zone) = crossing?;
        debug!(target: "horde::ai", %actor, %zone, "walking toward goal");
        let walk = (step == 0)
            .then(|| options.iter().position(|o| o.mv == Move::Walk { dir }))
            .flatten();
        walk.or_else(|| {
            options
                .iter()
                .position(|o| matches!(o.mv, Move::WalkTo { zone: z } if z == zone))
        })
    }
}

/// True if `mv` is an attack with at least one adversary in reach.
fn attack_has_targets(state: &GameState, actor: ActorId, mv: &Move) -> bool {
    let Move::Attack { weapons, .. } = mv else {
        return false;
    };
    let (Some(survivor), Some(origin)) = (state.survivor(actor), state.board.zone_of(actor))
    else {
        return false;
    };
    let items = survivor.inventory.items();
    let gear: Vec<Equipment> = weapons
        .iter()
        .filter_map(|id| items.iter().find(|(_, e)| e.id == *id).map(|(_, e)| *e))
        .collect();
    let Some(stat) = Stat::from_weapons(&gear) else {
        return false;
    };
    let board = &state.board;
    if stat.attack == AttackKind::Melee {
        return board.has_faction(origin, Faction::Horde);
    }
    board
        .accessible_zones(
            origin,
            stat.min_range as u32,
            stat.max_range as u32,
            stat.action,
        )
        .into_iter()
        .any(|z| board.has_faction(z, Faction::Horde))
}

fn hostiles_in(state: &GameState, zone: ZoneId) -> usize {
    state
        .board
        .occupants(zone)
        .iter()
        .filter(|o| o.faction == Faction::Horde)
        .count()
}

impl DecisionProvider for TacticalAi {
    fn choose_survivor(
        &mut self,
        state: &GameState,
        _: PlayerId,
        options: &[ActorId],
    ) -> Option<Answer> {
        // the survivor with the most actions left goes first
        let best = options
            .iter()
            .enumerate()
            .max_by_key(|(i, id)| {
                let left = state.actors.get(**id).map_or(0, |a| a.actions_left);
                (left, std::cmp::Reverse(*i))
            })
            .map_or(0, |(i, _)| i);
        Some(Answer::Pick(best))
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[MoveOption],
    ) -> Option<Answer> {
        let pick = self.plan(state, actor, options);
        debug!(target: "horde::ai", %actor, mv = ?options.get(pick).map(|o| &o.mv), "move chosen");
        Some(Answer::Pick(pick))
    }

    fn choose_zone(
        &mut self,
        state: &GameState,
        actor: ActorId,
        purpose: ZonePurpose,
        options: &[ZoneId],
    ) -> Option<Answer> {
        if purpose == ZonePurpose::RemoveSpawn {
            return Some(Answer::Pick(0));
        }
        // most adversaries, sparing zones where friends stand
        let best = options
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let friends = state.board.has_faction(*z, Faction::Survivors);
                (i, hostiles_in(state, *z), friends)
            })
            .filter(|(_, hostiles, _)| *hostiles > 0)
            .max_by_key(|(i, hostiles, friends)| (!friends, *hostiles, std::cmp::Reverse(*i)));
        match best {
            Some((i, _, _)) => Some(Answer::Pick(i)),
            None => {
                self.declined = Some(Self::turn_point(state, actor));
                Some(Answer::Back)
            }
        }
    }

    fn choose_equipment(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: &Equipment,
        options: &[KeepChoice],
    ) -> Option<Answer> {
        let slot = options
            .iter()
            .position(|c| matches!(c, KeepChoice::Slot(_)));
        let discard = options.iter().position(|c| *c == KeepChoice::Discard);
        Some(Answer::Pick(slot.or(discard).unwrap_or(0)))
    }

    fn choose_organize(
        &mut self,
        _: &GameState,
        _: ActorId,
        options: &[OrganizeStep],
    ) -> Option<Answer> {
        let done = options.iter().position(|s| *s == OrganizeStep::Done);
        Some(Answer::Pick(done.unwrap_or(options.len().saturating_sub(1))))
    }

    fn choose_skill(&mut self, _: &GameState, _: ActorId, _: &[SkillKind]) -> Option<Answer> {
        Some(Answer::Pick(0))
    }

    fn choose_reroll(
        &mut self,
        _: &GameState,
        _: ActorId,
        faces: &[u8],
        options: &[RerollChoice],
    ) -> Option<Answer> {
        let misses = faces.iter().filter(|f| **f < 4).count();
        let wanted = if misses * 2 > faces.len() {
            RerollChoice::Reroll
        } else {
            RerollChoice::Keep
        };
        Some(Answer::Pick(
            options.iter().position(|c| *c == wanted).unwrap_or(0),
        ))
    }

    fn choose_familiar_move(
        &mut self,
        state: &GameState,
        _: ActorId,
        options: &[FamiliarMove],
    ) -> Option<Answer> {
        let attack = options.iter().position(|m| *m == FamiliarMove::Attack);
        let hunt = options
            .iter()
            .position(|m| matches!(m, FamiliarMove::Walk(z) if hostiles_in(state, *z) > 0));
        let stay = options.iter().position(|m| *m == FamiliarMove::Stay);
        Some(Answer::Pick(attack.or(hunt).or(stay).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::{
        AdversaryKind, BoardBuilder, CellPos, Environment, EquipmentKind, GameConfig, NoQuest,
        Survivor, build_catalogue,
    };

    /// Three street zones in a row; Ann starts in zone 1 with a sword.
    fn row() -> (GameState, ActorId) {
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Street)
            .start(CellPos::new(0, 0))
            .objective(CellPos::new(2, 0))
            .build()
            .unwrap();
        let mut state = GameState::new(GameConfig::default(), board);
        state.add_player("p0");
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.give_equipment(ann, EquipmentKind::Sword).unwrap();
        (state, ann)
    }

    fn chosen(state: &GameState, actor: ActorId) -> Move {
        let options = build_catalogue(state, &NoQuest, actor)
            .unwrap()
            .into_options();
        let Some(Answer::Pick(i)) = TacticalAi::new(3).choose_move(state, actor, &options) else {
            panic!("no pick");
        };
        options[i].mv.clone()
    }

    #[test]
    fn attacks_before_anything_else() {
        let (mut state, ann) = row();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        assert!(matches!(chosen(&state, ann), Move::Attack { .. }));
    }

    #[test]
    fn walks_toward_the_objective() {
        let (state, ann) = row();
        assert_eq!(
            chosen(&state, ann),
            Move::Walk {
                dir: Direction::East
            }
        );
    }

    #[test]
    fn heads_for_the_horde_once_objectives_are_gone() {
        let (mut state, ann) = row();
        state.board.take_objective(ZoneId(3)).unwrap();
        assert_eq!(chosen(&state, ann), Move::EndTurn);

        state.add_adversary(AdversaryKind::Walker, ZoneId(2)).unwrap();
        assert_eq!(
            chosen(&state, ann),
            Move::Walk {
                dir: Direction::East
            }
        );
    }

    #[test]
    fn target_zones_without_adversaries_are_declined() {
        let (mut state, ann) = row();
        let mut ai = TacticalAi::new(0);
        let zones = [ZoneId(2), ZoneId(3)];
        assert_eq!(
            ai.choose_zone(&state, ann, ZonePurpose::Target, &zones),
            Some(Answer::Back)
        );
        state.add_adversary(AdversaryKind::Walker, ZoneId(3)).unwrap();
        assert_eq!(
            ai.choose_zone(&state, ann, ZonePurpose::Target, &zones),
            Some(Answer::Pick(1))
        );
    }

    #[test]
    fn a_cancelled_target_is_not_retried_at_the_same_point() {
        let (mut state, ann) = row();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        let options = build_catalogue(&state, &NoQuest, ann)
            .unwrap()
            .into_options();
        let mut ai = TacticalAi::new(0);
        let Some(Answer::Pick(first)) = ai.choose_move(&state, ann, &options) else {
            panic!("no pick");
        };
        assert!(matches!(options[first].mv, Move::Attack { .. }));

        assert_eq!(
            ai.choose_zone(&state, ann, ZonePurpose::Target, &[ZoneId(2)]),
            Some(Answer::Back)
        );
        let Some(Answer::Pick(second)) = ai.choose_move(&state, ann, &options) else {
            panic!("no pick");
        };
        assert!(!matches!(options[second].mv, Move::Attack { .. }));
    }

    #[test]
    fn rerolls_a_mostly_missed_roll() {
        let (state, ann) = row();
        let mut ai = TacticalAi::new(0);
        let choices = [RerollChoice::Keep, RerollChoice::Reroll];
        assert_eq!(
            ai.choose_reroll(&state, ann, &[1, 2, 6], &choices),
            Some(Answer::Pick(1))
        );
        assert_eq!(
            ai.choose_reroll(&state, ann, &[5, 2, 6], &choices),
            Some(Answer::Pick(0))
        );
    }
}
