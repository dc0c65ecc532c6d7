//! Round-level phases: setup, spawning, player rotation and round end.

use tracing::{debug, info};

use crate::actor::{ActorKind, AdversaryKind, TurnState, TurnStatus};
use crate::env::{DecisionOptions, DecisionProvider, QuestEvent, QuestHooks};
use crate::skills::RoundEndEffect;
use crate::spawn::{SpawnEffect, necromancer_zone};
use crate::state::{ActorId, PlayerId, ZoneId};

use super::{Advance, EngineError, GameEngine, Phase};

impl<'a> GameEngine<'a> {
    pub(super) fn init(&mut self) -> Result<Advance, EngineError> {
        self.state.validate()?;
        info!(
            target: "horde::engine",
            seed = self.state.seed(),
            players = self.state.players.len(),
            actors = self.state.actors.len(),
            "session started"
        );
        self.state.phases.replace_top(Phase::BeginRound);
        Ok(Advance::Progressed)
    }

    /// Refreshes actions and turn bookkeeping, then spawns (from the second
    /// round on) or hands over to the players.
    pub(super) fn begin_round(&mut self) -> Result<Advance, EngineError> {
        let base = self.state.config.base_actions;
        let familiar = self.state.config.familiar_actions;
        for actor in self.state.actors.iter_mut() {
            match &mut actor.kind {
                ActorKind::Survivor(s) => {
                    s.turn = TurnState::default();
                    if s.is_in_play() {
                        actor.actions_left = base + s.skills.pipeline().extra_actions();
                    } else {
                        s.turn.status = TurnStatus::Done;
                        actor.actions_left = 0;
                    }
                }
                ActorKind::Familiar(f) => {
                    actor.actions_left = if f.is_alive() { familiar } else { 0 };
                }
                ActorKind::Adversary(_) | ActorKind::Siege(_) => actor.actions_left = 0,
            }
        }
        self.state.round.acting = None;
        info!(target: "horde::engine", round = self.state.round.number + 1, "round begins");

        let next = if self.state.round.number > 0 {
            Phase::Spawn {
                zones: self.state.board.spawn_zones().collect(),
                next: 0,
            }
        } else {
            Phase::PlayerSelect
        };
        self.state.phases.replace_top(next);
        Ok(Advance::Progressed)
    }

    /// Resolves one spawn card for the next zone in the list.
    pub(super) fn spawn_step(
        &mut self,
        quest: &mut dyn QuestHooks,
        zones: &[ZoneId],
        next: usize,
    ) -> Result<Advance, EngineError> {
        let Some(&zone) = zones.get(next) else {
            self.state.phases.finish(Phase::PlayerSelect);
            return Ok(Advance::Progressed);
        };
        if let Phase::Spawn { next, .. } = self.state.phases.top_mut() {
            *next += 1;
        }
        let Some(card) = self.state.spawns.draw() else {
            debug!(target: "horde::engine", %zone, "spawn deck empty");
            return Ok(Advance::Progressed);
        };
        let level = self.state.highest_danger();
        let effect = card.effect(level);
        debug!(target: "horde::engine", %zone, %level, ?effect, "spawn card");

        match effect {
            SpawnEffect::Nothing => {}
            SpawnEffect::Adversaries(kind, n) => {
                for _ in 0..n {
                    if !self.spawn_adversary(quest, kind, zone) {
                        break;
                    }
                }
            }
            SpawnEffect::ExtraActivation(kind) => {
                self.state.phases.push(Phase::AdversaryStage {
                    queue: Vec::new(),
                    only: Some(kind),
                    started: false,
                });
            }
            SpawnEffect::Necromancer => {
                self.spawn_adversary(quest, AdversaryKind::Necromancer, zone);
                let survivors = self.state.survivor_zones();
                if let Some(opened) = necromancer_zone(&self.state.board, &survivors) {
                    self.state.board.set_spawn_zone(opened, true)?;
                    info!(
                        target: "horde::engine",
                        zone = %opened,
                        "necromancer opened a spawn zone"
                    );
                }
            }
        }
        Ok(Advance::Progressed)
    }

    /// Places one adversary. Returns false when the zone had no room.
    fn spawn_adversary(
        &mut self,
        quest: &mut dyn QuestHooks,
        kind: AdversaryKind,
        zone: ZoneId,
    ) -> bool {
        let Some(spawned) = self.state.add_adversary(kind, zone) else {
            debug!(target: "horde::engine", %zone, %kind, "no room to spawn");
            return false;
        };
        if let Some(evicted) = &spawned.evicted {
            debug!(target: "horde::engine", evicted = %evicted.id, "evicted to make room");
        }
        self.emit(
            quest,
            QuestEvent::AdversarySpawned {
                actor: spawned.id,
                kind,
                zone,
            },
        );
        true
    }

    /// Survivors of `player` that still have to take their turn.
    fn pending_survivors(&self, player: PlayerId) -> Vec<ActorId> {
        let Some(seat) = self.state.player(player) else {
            return Vec::new();
        };
        seat.survivors
            .iter()
            .copied()
            .filter(|id| {
                self.state
                    .survivor(*id)
                    .is_some_and(|s| s.is_in_play() && s.turn.status != TurnStatus::Done)
            })
            .collect()
    }

    /// Picks the next player, in rotation from the first player, who has a
    /// survivor left to act. Once everyone is done the adversaries act.
    pub(super) fn player_select(
        &mut self,
        provider: &mut dyn DecisionProvider,
    ) -> Result<Advance, EngineError> {
        let count = self.state.players.len();
        let first = self.state.round.first_player;
        let next = (0..count)
            .map(|i| self.state.players[(first + i) % count].id)
            .find(|p| !self.pending_survivors(*p).is_empty());

        match next {
            Some(player) => {
                if self.state.round.acting != Some(player) {
                    self.state.round.acting = Some(player);
                    debug!(target: "horde::engine", %player, "acting player");
                    provider.acting_player_changed(self.state, player);
                }
                self.state.phases.push(Phase::CharacterSelect { player });
            }
            None => {
                self.state.round.acting = None;
                self.state.phases.replace_top(Phase::AdversaryStage {
                    queue: Vec::new(),
                    only: None,
                    started: false,
                });
            }
        }
        Ok(Advance::Progressed)
    }

    pub(super) fn character_select(
        &mut self,
        provider: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<Advance, EngineError> {
        let options = self.pending_survivors(player);
        let actor = match options.as_slice() {
            [] => {
                self.state.phases.pop();
                return Ok(Advance::Progressed);
            }
            [only] => *only,
            _ => {
                let mut request = self.request(
                    None,
                    DecisionOptions::Survivors(options.clone()),
                    false,
                );
                request.player = Some(player);
                match self.pick(provider, request) {
                    Ok(i) => options[i],
                    Err(request) => return Ok(Advance::Waiting(request)),
                }
            }
        };
        if let Some(s) = self.state.survivor_mut(actor) {
            s.turn.status = TurnStatus::Active;
        }
        debug!(target: "horde::engine", %actor, "survivor activated");
        self.state.phases.replace_top(Phase::ActionSelect { actor });
        Ok(Advance::Progressed)
    }

    /// Level-up choice from the survivor's tree for the next unhandled
    /// danger level.
    pub(super) fn new_skill(
        &mut self,
        provider: &mut dyn DecisionProvider,
        actor: ActorId,
    ) -> Result<Advance, EngineError> {
        let Some(survivor) = self.state.survivor(actor) else {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        };
        let Some(level) = survivor.level_granted.next() else {
            self.state.phases.pop();
            return Ok(Advance::Progressed);
        };
        let options: Vec<_> = survivor
            .tree
            .choices(level)
            .iter()
            .copied()
            .filter(|k| !survivor.skills.contains(*k))
            .collect();
        let chosen = match options.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => {
                let request = self.request(
                    Some(actor),
                    DecisionOptions::Skills(options.clone()),
                    false,
                );
                match self.pick(provider, request) {
                    Ok(i) => Some(options[i]),
                    Err(request) => return Ok(Advance::Waiting(request)),
                }
            }
        };
        if let Some(s) = self.state.survivor_mut(actor) {
            if let Some(skill) = chosen {
                s.skills.acquire(skill);
            }
            s.level_granted = level;
        }
        info!(target: "horde::engine", %actor, %level, skill = ?chosen, "danger level reached");
        self.state.phases.pop();
        Ok(Advance::Progressed)
    }

    /// Round-end modifiers, temporary skills and board cleanup, then the
    /// next round.
    pub(super) fn end_round(&mut self, quest: &mut dyn QuestHooks) -> Result<Advance, EngineError> {
        for actor in self.state.actors.iter_mut() {
            let Some(s) = actor.survivor_mut() else { continue };
            if s.is_in_play() {
                for effect in s.skills.pipeline().round_end() {
                    match effect {
                        RoundEndEffect::HealAll => s.heal(s.health),
                    }
                }
            }
            s.skills.clear_temporary();
        }
        self.state.board.end_round();
        self.state.round.number += 1;
        if !self.state.players.is_empty() {
            self.state.round.first_player =
                (self.state.round.first_player + 1) % self.state.players.len();
        }
        let round = self.state.round.number;
        info!(target: "horde::engine", round, "round ends");
        self.emit(quest, QuestEvent::RoundEnded { round });
        self.state.phases.replace_top(Phase::BeginRound);
        Ok(Advance::Progressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Survivor;
    use crate::env::NoQuest;
    use crate::spawn::{SpawnCard, SpawnDeck};
    use crate::state::tests::street_state;

    #[test]
    fn spawn_step_places_adversaries_and_stops_when_full() {
        let mut state = street_state(&[]);
        state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        let card = SpawnCard {
            effects: [SpawnEffect::Adversaries(AdversaryKind::Walker, 20); 4],
        };
        state.spawns = SpawnDeck::stacked(&[card]);
        state.phases.replace_top(Phase::Spawn {
            zones: vec![ZoneId(1)],
            next: 0,
        });

        let mut engine = GameEngine::new(&mut state);
        engine.spawn_step(&mut NoQuest, &[ZoneId(1)], 0).unwrap();
        let walkers = state.actors.adversaries().count();
        assert_eq!(walkers, crate::config::GameConfig::MAX_QUADRANTS - 1);
        assert!(matches!(state.phases.top(), Phase::Spawn { next: 1, .. }));
    }

    #[test]
    fn end_round_rotates_the_first_player() {
        let mut state = street_state(&[]);
        state.add_player("p1");
        state.phases.replace_top(Phase::EndRound);
        GameEngine::new(&mut state).end_round(&mut NoQuest).unwrap();
        assert_eq!(state.round.number, 1);
        assert_eq!(state.round.first_player, 1);
        assert_eq!(state.phases.top(), &Phase::BeginRound);
    }
}
