use horde_core::{GameOver, GameState, QuestHooks, RerollBand};

/// Survive a fixed number of rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Holdout {
    rounds: u32,
    reroll_band: Option<RerollBand>,
}

impl Holdout {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds,
            reroll_band: None,
        }
    }

    pub fn with_reroll_band(mut self, band: Option<RerollBand>) -> Self {
        self.reroll_band = band;
        self
    }
}

impl QuestHooks for Holdout {
    fn outcome(&self, state: &GameState) -> Option<GameOver> {
        let alive = state.survivors_in_play().next().is_some();
        (alive && state.round.number >= self.rounds)
            .then(|| GameOver::victory(format!("held out for {} rounds", self.rounds)))
    }

    fn reroll_band(&self) -> Option<RerollBand> {
        self.reroll_band
    }
}
