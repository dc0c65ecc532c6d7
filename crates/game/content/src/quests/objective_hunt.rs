use tracing::info;

use horde_core::{
    ActorId, Faction, GameOver, GameState, QuestEvent, QuestHooks, QuestMove, ZoneId,
};

/// Take every objective on the board, then walk out through the exit zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectiveHunt {
    exit: ZoneId,
    no_casualties: bool,
    casualties: u32,
    escaped: Vec<ActorId>,
}

impl ObjectiveHunt {
    /// Quest move code for leaving the board.
    pub const ESCAPE: u16 = 1;

    pub fn new(exit: ZoneId, no_casualties: bool) -> Self {
        Self {
            exit,
            no_casualties,
            casualties: 0,
            escaped: Vec::new(),
        }
    }

    pub fn escaped(&self) -> &[ActorId] {
        &self.escaped
    }

    fn exit_open(&self, state: &GameState) -> bool {
        state.board.objectives_left() == 0 && !state.board.has_faction(self.exit, Faction::Horde)
    }
}

impl QuestHooks for ObjectiveHunt {
    fn moves(&self, state: &GameState, actor: ActorId) -> Vec<QuestMove> {
        let at_exit = state.board.zone_of(actor) == Some(self.exit);
        let is_survivor = state.survivor(actor).is_some();
        if at_exit && is_survivor && self.exit_open(state) {
            vec![QuestMove {
                code: Self::ESCAPE,
                zone: Some(self.exit),
            }]
        } else {
            Vec::new()
        }
    }

    fn perform(&mut self, state: &mut GameState, actor: ActorId, mv: QuestMove) -> bool {
        if mv.code != Self::ESCAPE
            || state.board.zone_of(actor) != Some(self.exit)
            || !self.exit_open(state)
        {
            return false;
        }
        let Some(survivor) = state.survivor_mut(actor) else {
            return false;
        };
        survivor.escaped = true;
        state.actors.take_off_board(&mut state.board, actor);
        self.escaped.push(actor);
        info!(target: "horde::quest", %actor, "survivor escaped");
        true
    }

    fn on_event(&mut self, _state: &GameState, event: &QuestEvent) {
        if let QuestEvent::SurvivorDied { .. } = event {
            self.casualties += 1;
        }
    }

    fn outcome(&self, state: &GameState) -> Option<GameOver> {
        if self.no_casualties && self.casualties > 0 {
            return Some(GameOver::defeat("a survivor fell"));
        }
        let everyone_out = state
            .actors
            .survivors()
            .filter_map(|a| a.survivor())
            .filter(|s| s.is_alive())
            .all(|s| s.escaped);
        (everyone_out && !self.escaped.is_empty())
            .then(|| GameOver::victory("the objectives are taken and the survivors escaped"))
    }
}
