//! Fixed answer queue, mostly for tests and replays.

use std::collections::VecDeque;

use horde_core::{
    ActorId, Answer, DecisionProvider, Equipment, FamiliarMove, GameState, KeepChoice,
    MoveOption, OrganizeStep, PlayerId, RerollChoice, SkillKind, ZoneId, ZonePurpose,
};

/// Answers decisions from a queue, in order, whatever they are. Once the
/// queue runs dry the session waits.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    answers: VecDeque<Answer>,
    asked: usize,
}

impl ScriptedProvider {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }

    pub fn push(&mut self, answer: Answer) {
        self.answers.push_back(answer);
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Number of decisions this provider was asked, answered or not.
    pub fn asked(&self) -> usize {
        self.asked
    }

    fn next(&mut self) -> Option<Answer> {
        self.asked += 1;
        self.answers.pop_front()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn choose_survivor(&mut self, _: &GameState, _: PlayerId, _: &[ActorId]) -> Option<Answer> {
        self.next()
    }

    fn choose_move(&mut self, _: &GameState, _: ActorId, _: &[MoveOption]) -> Option<Answer> {
        self.next()
    }

    fn choose_zone(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: ZonePurpose,
        _: &[ZoneId],
    ) -> Option<Answer> {
        self.next()
    }

    fn choose_equipment(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: &Equipment,
        _: &[KeepChoice],
    ) -> Option<Answer> {
        self.next()
    }

    fn choose_organize(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: &[OrganizeStep],
    ) -> Option<Answer> {
        self.next()
    }

    fn choose_skill(&mut self, _: &GameState, _: ActorId, _: &[SkillKind]) -> Option<Answer> {
        self.next()
    }

    fn choose_reroll(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: &[u8],
        _: &[RerollChoice],
    ) -> Option<Answer> {
        self.next()
    }

    fn choose_familiar_move(
        &mut self,
        _: &GameState,
        _: ActorId,
        _: &[FamiliarMove],
    ) -> Option<Answer> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_come_out_in_order() {
        let mut script = ScriptedProvider::new([Answer::Pick(2), Answer::Back]);
        script.push(Answer::Pick(0));
        assert_eq!(script.remaining(), 3);
        assert_eq!(script.next(), Some(Answer::Pick(2)));
        assert_eq!(script.next(), Some(Answer::Back));
        assert_eq!(script.next(), Some(Answer::Pick(0)));
        assert_eq!(script.next(), None);
        assert_eq!(script.asked(), 4);
    }
}
