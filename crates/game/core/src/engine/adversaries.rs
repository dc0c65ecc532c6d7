//! Adversary stage: every adversary spends its actions attacking or moving
//! toward noise, one action per step.

use std::cmp::Reverse;

use tracing::debug;

use crate::actor::AdversaryKind;
use crate::board::Faction;
use crate::combat::adversary_attack;
use crate::env::{QuestEvent, QuestHooks};
use crate::state::{ActorId, ZoneId};

use super::{Advance, EngineError, GameEngine, Phase};

impl<'a> GameEngine<'a> {
    pub(super) fn adversary_stage(
        &mut self,
        quest: &mut dyn QuestHooks,
        queue: Vec<ActorId>,
        only: Option<AdversaryKind>,
        started: bool,
    ) -> Result<Advance, EngineError> {
        if !started {
            let mut order: Vec<(Reverse<u8>, ActorId, u8)> = self
                .state
                .actors
                .adversaries()
                .filter_map(|a| a.adversary().map(|adv| (a.id, adv.kind)))
                .filter(|(_, kind)| only.is_none_or(|k| k == *kind))
                .map(|(id, kind)| (Reverse(kind.def().turn_priority), id, kind.def().actions))
                .collect();
            order.sort();
            for (_, id, actions) in &order {
                if let Some(entry) = self.state.actors.get_mut(*id) {
                    entry.actions_left = *actions;
                }
            }
            let queue: Vec<ActorId> = order.into_iter().map(|(_, id, _)| id).collect();
            debug!(target: "horde::engine", adversaries = queue.len(), ?only, "adversary stage");
            *self.state.phases.top_mut() = Phase::AdversaryStage {
                queue,
                only,
                started: true,
            };
            return Ok(Advance::Progressed);
        }

        let Some(&id) = queue.first() else {
            self.state.phases.finish(Phase::EndRound);
            return Ok(Advance::Progressed);
        };
        let ready = self
            .state
            .actors
            .get(id)
            .is_some_and(|a| a.actions_left > 0)
            && self.state.board.zone_of(id).is_some();
        if ready {
            self.activate(quest, id);
        }
        let done = !self
            .state
            .actors
            .get(id)
            .is_some_and(|a| a.actions_left > 0);
        if done && let Phase::AdversaryStage { queue, .. } = self.state.phases.top_mut() {
            queue.retain(|q| *q != id);
        }
        Ok(Advance::Progressed)
    }

    /// Spends one action: attack a friendly actor in the zone, otherwise
    /// step toward the survivors it can see or the loudest zone.
    fn activate(&mut self, quest: &mut dyn QuestHooks, id: ActorId) {
        let Some(entry) = self.state.actors.get_mut(id) else {
            return;
        };
        entry.actions_left -= 1;
        let Some(kind) = entry.adversary().map(|a| a.kind) else {
            return;
        };
        let Some(zone) = self.state.board.zone_of(id) else {
            return;
        };

        let friendly_here = self.state.board.has_faction(zone, Faction::Survivors);
        if friendly_here {
            if let Some(wound) = adversary_attack(self.state, id)
                && wound.killed
                && self.state.survivor(wound.target).is_some()
            {
                self.emit(quest, QuestEvent::SurvivorDied { actor: wound.target });
            }
            return;
        }
        if !kind.def().moves {
            if let Some(entry) = self.state.actors.get_mut(id) {
                entry.actions_left = 0;
            }
            return;
        }
        let Some(target) = self.hunt_target(zone) else {
            return;
        };
        if target == zone {
            return;
        }
        let Some(spot) = self.state.board.spot_of(id) else {
            return;
        };
        let paths = self.state.board.shortest_path_options(
            spot.cell,
            target,
            self.state.config.max_path_options,
        );
        let Some(path) = paths.first() else {
            return;
        };
        // one action crosses exactly one zone boundary
        let board = &self.state.board;
        let mut pos = spot.cell;
        let mut entry = None;
        for dir in path {
            let Some(next) = board.neighbor(pos, *dir) else {
                break;
            };
            pos = next;
            if let Some(entered) = board.zone_at(pos)
                && entered != zone
            {
                entry = Some((pos, entered));
                break;
            }
        }
        let Some((cell, entered)) = entry else {
            return;
        };
        let moved = self.state.board.move_actor_to_cell(id, cell).is_some()
            || self.state.board.move_actor(id, entered).is_some();
        if moved {
            debug!(
                target: "horde::engine",
                actor = %id,
                %kind,
                from = %zone,
                to = %entered,
                toward = %target,
                "adversary moved"
            );
        }
    }

    /// Noisiest zone among visible survivor zones, else the noisiest zone on
    /// the board. Ties go to the lowest id.
    fn hunt_target(&self, from: ZoneId) -> Option<ZoneId> {
        let board = &self.state.board;
        let visible = self
            .state
            .survivor_zones()
            .into_iter()
            .filter(|z| board.can_see(from, *z))
            .filter_map(|z| board.zone(z))
            .max_by(|a, b| a.noise().cmp(&b.noise()).then(b.id.cmp(&a.id)))
            .map(|z| z.id);
        visible.or_else(|| board.noisiest_zone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Survivor;
    use crate::board::{BoardBuilder, Environment};
    use crate::config::GameConfig;
    use crate::dice::DiceBag;
    use crate::env::NoQuest;
    use crate::item::EquipmentDeck;
    use crate::spawn::SpawnDeck;
    use crate::state::tests::street_state;
    use crate::state::{CellPos, GameState, PlayerId};

    fn run_stage(state: &mut GameState) {
        state.phases.replace_top(Phase::AdversaryStage {
            queue: Vec::new(),
            only: None,
            started: false,
        });
        let mut engine = GameEngine::new(state);
        for _ in 0..50 {
            let Phase::AdversaryStage {
                queue,
                only,
                started,
            } = engine.state().phases.top().clone()
            else {
                return;
            };
            engine.adversary_stage(&mut NoQuest, queue, only, started).unwrap();
        }
        panic!("adversary stage did not end");
    }

    #[test]
    fn walker_attacks_survivor_in_its_zone() {
        let mut state = street_state(&[1]);
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        run_stage(&mut state);
        assert_eq!(state.survivor(ann).unwrap().wounds, 1);
        assert_eq!(state.phases.top(), &Phase::EndRound);
    }

    #[test]
    fn walker_steps_toward_visible_survivors() {
        // three street zones in a row: 1 | 2 | 3
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(2), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(3), Environment::Street)
            .start(CellPos::new(0, 0))
            .build()
            .unwrap();
        let mut state = GameState::with_decks(
            DiceBag::stacked(&[1]),
            EquipmentDeck::stacked(&[]),
            SpawnDeck::stacked(&[]),
            GameConfig::default(),
            board,
        );
        state.add_player("p0");
        state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        let walker = state
            .add_adversary(AdversaryKind::Walker, ZoneId(3))
            .unwrap()
            .id;
        run_stage(&mut state);
        assert_eq!(state.board.zone_of(walker), Some(ZoneId(2)));
    }

    #[test]
    fn one_move_action_leaves_a_wide_zone() {
        // zone 1 spans two cells, the survivor waits in zone 2
        let board = BoardBuilder::new(3, 1)
            .cell(CellPos::new(0, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(1, 0), ZoneId(1), Environment::Street)
            .cell(CellPos::new(2, 0), ZoneId(2), Environment::Street)
            .start(CellPos::new(2, 0))
            .build()
            .unwrap();
        let mut state = GameState::with_decks(
            DiceBag::stacked(&[1]),
            EquipmentDeck::stacked(&[]),
            SpawnDeck::stacked(&[]),
            GameConfig::default(),
            board,
        );
        state.add_player("p0");
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        let walker = state
            .add_adversary(AdversaryKind::Walker, ZoneId(1))
            .unwrap()
            .id;
        run_stage(&mut state);
        assert_eq!(state.board.zone_of(walker), Some(ZoneId(2)));
        assert_eq!(state.board.spot_of(walker).unwrap().cell, CellPos::new(2, 0));
        // the single action went on the move, not an attack
        assert_eq!(state.survivor(ann).unwrap().wounds, 0);
    }

    #[test]
    fn extra_activation_only_moves_one_kind() {
        let mut state = street_state(&[1]);
        state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 1))
            .unwrap();
        state.add_adversary(AdversaryKind::Brute, ZoneId(1)).unwrap();
        state.phases.replace_top(Phase::PlayerSelect);
        state.phases.push(Phase::AdversaryStage {
            queue: Vec::new(),
            only: Some(AdversaryKind::Walker),
            started: false,
        });
        let mut engine = GameEngine::new(&mut state);
        engine
            .adversary_stage(&mut NoQuest, Vec::new(), Some(AdversaryKind::Walker), false)
            .unwrap();
        engine
            .adversary_stage(&mut NoQuest, Vec::new(), Some(AdversaryKind::Walker), true)
            .unwrap();
        assert_eq!(state.phases.top(), &Phase::PlayerSelect);
        assert!(state.survivors_in_play().next().is_some());
    }
}
