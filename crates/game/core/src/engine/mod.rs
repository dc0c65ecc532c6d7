//! Phase-stack state machine.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Each
//! call to [`GameEngine::advance`] performs at most one transition or one
//! visible action and reports whether it progressed, is waiting on a
//! decision, or the game is over. Callers loop until it stops progressing.

mod actions;
mod adversaries;
mod catalogue;
mod errors;
mod phase;
mod turns;

pub use catalogue::{Catalogue, Move, MoveOption, build_catalogue};
pub use errors::EngineError;
pub use phase::{Intent, Phase, PhaseStack, PhaseTag};

use tracing::{info, warn};

use crate::env::{Answer, DecisionProvider, DecisionRequest, QuestEvent, QuestHooks};
use crate::state::{ActorId, GameState, PlayerId};

/// Terminal verdict of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOver {
    pub victory: bool,
    pub reason: String,
}

impl GameOver {
    pub fn victory(reason: impl Into<String>) -> Self {
        Self {
            victory: true,
            reason: reason.into(),
        }
    }

    pub fn defeat(reason: impl Into<String>) -> Self {
        Self {
            victory: false,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GameOver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.victory { "victory" } else { "defeat" };
        write!(f, "{verdict}: {}", self.reason)
    }
}

/// Result of one [`GameEngine::advance`] step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Progressed,
    /// The provider has no (valid) answer yet; nothing changed.
    Waiting(DecisionRequest),
    Finished(GameOver),
}

impl Advance {
    pub fn is_progress(&self) -> bool {
        matches!(self, Advance::Progressed)
    }
}

/// Outcome of routing one request to the provider.
pub(crate) enum Reply {
    Pick(usize),
    Back,
    Waiting(DecisionRequest),
}

/// Drives a [`GameState`] through its phases.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Performs one unit of work.
    ///
    /// Errors are invariant violations; the session must stop. Stale or
    /// out-of-range answers are logged and the same phase is asked again.
    pub fn advance(
        &mut self,
        provider: &mut dyn DecisionProvider,
        quest: &mut dyn QuestHooks,
    ) -> Result<Advance, EngineError> {
        if let Some(over) = &self.state.outcome {
            return Ok(Advance::Finished(over.clone()));
        }
        if let Some(over) = self.check_game_over(quest) {
            self.conclude(over.clone());
            return Ok(Advance::Finished(over));
        }

        let phase = self.state.phases.top().clone();
        match phase {
            Phase::Init => self.init(),
            Phase::BeginRound => self.begin_round(),
            Phase::Spawn { zones, next } => self.spawn_step(quest, &zones, next),
            Phase::PlayerSelect => self.player_select(provider),
            Phase::CharacterSelect { player } => self.character_select(provider, player),
            Phase::ActionSelect { actor } => self.action_select(provider, quest, actor),
            Phase::ChooseTarget {
                actor,
                intent,
                cost,
                free,
            } => self.choose_target(provider, quest, actor, intent, cost, free),
            Phase::Reroll { pending } => self.reroll_step(provider, quest, pending),
            Phase::NewSkill { actor } => self.new_skill(provider, actor),
            Phase::KeepEquipment { actor, found } => self.keep_equipment(provider, actor, found),
            Phase::Organize { actor, partner } => self.organize(provider, actor, partner),
            Phase::FamiliarAction { familiar } => self.familiar_action(provider, quest, familiar),
            Phase::SpawnRemoval { actor, remaining } => {
                self.spawn_removal(provider, actor, remaining)
            }
            Phase::AdversaryStage {
                queue,
                only,
                started,
            } => self.adversary_stage(quest, queue, only, started),
            Phase::EndRound => self.end_round(quest),
            Phase::GameOver => Ok(Advance::Finished(
                self.state
                    .outcome
                    .clone()
                    .unwrap_or_else(|| GameOver::defeat("game over")),
            )),
        }
    }

    /// Loss and win conditions, checked before every unit of work.
    fn check_game_over(&self, quest: &dyn QuestHooks) -> Option<GameOver> {
        let top = self.state.phases.top().tag();
        if top == PhaseTag::Init {
            return None;
        }
        if let Some(over) = quest.outcome(self.state) {
            return Some(over);
        }
        let survivors: Vec<_> = self
            .state
            .actors
            .survivors()
            .filter_map(|a| a.survivor())
            .collect();
        if !survivors.iter().any(|s| s.is_alive()) {
            return Some(GameOver::defeat("every survivor is dead"));
        }
        if !survivors.iter().any(|s| s.is_in_play()) {
            return Some(GameOver::victory("the survivors escaped"));
        }
        let spawn_zones = self.state.board.spawn_zones().count();
        if spawn_zones > self.state.config.max_spawn_zones as usize {
            return Some(GameOver::defeat(format!(
                "{spawn_zones} spawn zones are open"
            )));
        }
        if top == PhaseTag::BeginRound
            && let Some(limit) = self.state.config.round_limit
            && self.state.round.number >= limit
        {
            return Some(GameOver::defeat(format!("round limit {limit} reached")));
        }
        None
    }

    fn conclude(&mut self, over: GameOver) {
        info!(target: "horde::engine", round = self.state.round.number, %over, "game over");
        self.state.outcome = Some(over);
        self.state.phases.reset(Phase::GameOver);
    }

    /// Routes `request` to the provider and validates the reply.
    pub(crate) fn ask(
        &self,
        provider: &mut dyn DecisionProvider,
        request: DecisionRequest,
    ) -> Reply {
        match request.ask(provider, self.state) {
            Some(answer) if request.accepts(answer) => match answer {
                Answer::Pick(i) => Reply::Pick(i),
                Answer::Back => Reply::Back,
            },
            Some(answer) => {
                warn!(
                    target: "horde::engine",
                    phase = %request.phase,
                    ?answer,
                    options = request.options.len(),
                    "stale decision ignored"
                );
                Reply::Waiting(request)
            }
            None => Reply::Waiting(request),
        }
    }

    /// [`ask`](Self::ask) for requests that cannot be cancelled.
    pub(crate) fn pick(
        &self,
        provider: &mut dyn DecisionProvider,
        request: DecisionRequest,
    ) -> Result<usize, DecisionRequest> {
        debug_assert!(!request.cancellable);
        match self.ask(provider, request.clone()) {
            Reply::Pick(i) => Ok(i),
            Reply::Back => Err(request),
            Reply::Waiting(request) => Err(request),
        }
    }

    pub(crate) fn request(
        &self,
        actor: Option<ActorId>,
        options: crate::env::DecisionOptions,
        cancellable: bool,
    ) -> DecisionRequest {
        DecisionRequest {
            phase: self.state.phases.top().tag(),
            player: actor.and_then(|a| self.player_of(a)),
            actor,
            options,
            cancellable,
        }
    }

    /// Player controlling `actor`; familiars answer to their owner's player.
    pub(crate) fn player_of(&self, actor: ActorId) -> Option<PlayerId> {
        let entry = self.state.actors.get(actor)?;
        if let Some(s) = entry.survivor() {
            return Some(s.player);
        }
        let owner = entry.familiar()?.owner;
        self.state.survivor(owner).map(|s| s.player)
    }

    pub(crate) fn emit(&self, quest: &mut dyn QuestHooks, event: QuestEvent) {
        quest.on_event(self.state, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{AdversaryKind, Survivor};
    use crate::env::{
        FamiliarMove, KeepChoice, NoQuest, OrganizeStep, RerollChoice, ZonePurpose,
    };
    use crate::item::{Equipment, EquipmentKind};
    use crate::skills::SkillKind;
    use crate::state::tests::street_state;
    use crate::state::ZoneId;

    /// Always picks the first option, or nothing when `silent`.
    #[derive(Default)]
    struct FirstPick {
        silent: bool,
        acting: Vec<PlayerId>,
    }

    impl FirstPick {
        fn pick(&self) -> Option<Answer> {
            (!self.silent).then_some(Answer::Pick(0))
        }
    }

    impl DecisionProvider for FirstPick {
        fn acting_player_changed(&mut self, _state: &GameState, player: PlayerId) {
            self.acting.push(player);
        }
        fn choose_survivor(&mut self, _: &GameState, _: PlayerId, _: &[ActorId]) -> Option<Answer> {
            self.pick()
        }
        fn choose_move(&mut self, _: &GameState, _: ActorId, _: &[MoveOption]) -> Option<Answer> {
            self.pick()
        }
        fn choose_zone(
            &mut self,
            _: &GameState,
            _: ActorId,
            _: ZonePurpose,
            _: &[ZoneId],
        ) -> Option<Answer> {
            self.pick()
        }
        fn choose_equipment(
            &mut self,
            _: &GameState,
            _: ActorId,
            _: &Equipment,
            _: &[KeepChoice],
        ) -> Option<Answer> {
            self.pick()
        }
        fn choose_organize(
            &mut self,
            _: &GameState,
            _: ActorId,
            options: &[OrganizeStep],
        ) -> Option<Answer> {
            (!self.silent).then(|| Answer::Pick(options.len() - 1))
        }
        fn choose_skill(&mut self, _: &GameState, _: ActorId, _: &[SkillKind]) -> Option<Answer> {
            self.pick()
        }
        fn choose_reroll(
            &mut self,
            _: &GameState,
            _: ActorId,
            _: &[u8],
            _: &[RerollChoice],
        ) -> Option<Answer> {
            self.pick()
        }
        fn choose_familiar_move(
            &mut self,
            _: &GameState,
            _: ActorId,
            _: &[FamiliarMove],
        ) -> Option<Answer> {
            self.pick()
        }
    }

    fn run_until_waiting(state: &mut GameState, provider: &mut FirstPick) -> Advance {
        let mut engine = GameEngine::new(state);
        for _ in 0..200 {
            let step = engine.advance(provider, &mut NoQuest).unwrap();
            if !step.is_progress() {
                return step;
            }
        }
        panic!("engine kept progressing");
    }

    #[test]
    fn init_fails_without_survivors() {
        let mut state = street_state(&[]);
        let err = GameEngine::new(&mut state)
            .advance(&mut FirstPick::default(), &mut NoQuest)
            .unwrap_err();
        assert!(matches!(err, EngineError::Setup(_)));
    }

    #[test]
    fn first_round_waits_on_the_move_catalogue() {
        let mut state = street_state(&[]);
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.give_equipment(ann, EquipmentKind::Sword).unwrap();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        let mut provider = FirstPick {
            silent: true,
            ..FirstPick::default()
        };

        let step = run_until_waiting(&mut state, &mut provider);
        let Advance::Waiting(request) = step else {
            panic!("expected a decision, got {step:?}");
        };
        assert_eq!(request.phase, PhaseTag::ActionSelect);
        assert_eq!(request.actor, Some(ann));
        assert_eq!(provider.acting, vec![PlayerId(0)]);
        assert_eq!(state.actors.get(ann).unwrap().actions_left, 3);
        assert_eq!(
            state.phases.tags(),
            vec![PhaseTag::PlayerSelect, PhaseTag::ActionSelect]
        );
    }

    #[test]
    fn stale_answer_keeps_the_phase() {
        struct OutOfRange;
        impl DecisionProvider for OutOfRange {
            fn choose_survivor(
                &mut self,
                _: &GameState,
                _: PlayerId,
                _: &[ActorId],
            ) -> Option<Answer> {
                Some(Answer::Pick(0))
            }
            fn choose_move(
                &mut self,
                _: &GameState,
                _: ActorId,
                o: &[MoveOption],
            ) -> Option<Answer> {
                Some(Answer::Pick(o.len()))
            }
            fn choose_zone(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: ZonePurpose,
                _: &[ZoneId],
            ) -> Option<Answer> {
                None
            }
            fn choose_equipment(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: &Equipment,
                _: &[KeepChoice],
            ) -> Option<Answer> {
                None
            }
            fn choose_organize(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: &[OrganizeStep],
            ) -> Option<Answer> {
                None
            }
            fn choose_skill(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: &[SkillKind],
            ) -> Option<Answer> {
                None
            }
            fn choose_reroll(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: &[u8],
                _: &[RerollChoice],
            ) -> Option<Answer> {
                None
            }
            fn choose_familiar_move(
                &mut self,
                _: &GameState,
                _: ActorId,
                _: &[FamiliarMove],
            ) -> Option<Answer> {
                None
            }
        }

        let mut state = street_state(&[]);
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.give_equipment(ann, EquipmentKind::Sword).unwrap();
        state.add_adversary(AdversaryKind::Walker, ZoneId(1)).unwrap();
        let mut engine = GameEngine::new(&mut state);
        let mut last = Advance::Progressed;
        for _ in 0..20 {
            last = engine.advance(&mut OutOfRange, &mut NoQuest).unwrap();
            if !last.is_progress() {
                break;
            }
        }
        assert!(matches!(last, Advance::Waiting(_)));
        let before = state.clone();
        let again = GameEngine::new(&mut state)
            .advance(&mut OutOfRange, &mut NoQuest)
            .unwrap();
        assert!(matches!(again, Advance::Waiting(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn dead_survivors_end_the_game() {
        let mut state = street_state(&[]);
        let ann = state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.phases.replace_top(Phase::BeginRound);
        state.survivor_mut(ann).unwrap().wound(3);

        let step = GameEngine::new(&mut state)
            .advance(&mut FirstPick::default(), &mut NoQuest)
            .unwrap();
        let Advance::Finished(over) = step else {
            panic!("expected game over");
        };
        assert!(!over.victory);
        assert_eq!(state.phases.tags(), vec![PhaseTag::GameOver]);
        assert_eq!(state.outcome, Some(over));
    }

    #[test]
    fn round_limit_is_a_loss() {
        let mut state = street_state(&[]);
        state
            .add_survivor(Survivor::new("Ann", PlayerId(0), 3))
            .unwrap();
        state.config.round_limit = Some(2);
        state.round.number = 2;
        state.phases.replace_top(Phase::BeginRound);
        let step = GameEngine::new(&mut state)
            .advance(&mut FirstPick::default(), &mut NoQuest)
            .unwrap();
        assert!(matches!(step, Advance::Finished(GameOver { victory: false, .. })));
    }
}
