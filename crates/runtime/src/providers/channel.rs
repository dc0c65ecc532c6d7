//! Seat whose answers arrive through a [`SessionHandle`](crate::SessionHandle).

use horde_core::{
    ActorId, Answer, DecisionProvider, Equipment, FamiliarMove, GameState, KeepChoice,
    MoveOption, OrganizeStep, PlayerId, RerollChoice, SkillKind, ZoneId, ZonePurpose,
};
use tokio::sync::mpsc;

/// Answers whatever decision is pending with the next queued answer, or
/// reports no answer when the inbox is empty.
///
/// The session worker only forwards answers after checking them against the
/// pending request, so the inbox holds at most one entry in practice.
#[derive(Debug)]
pub struct ChannelProvider {
    inbox: mpsc::UnboundedReceiver<Answer>,
}

impl ChannelProvider {
    /// Creates the provider and the sender feeding it.
    pub fn pair() -> (Self, mpsc::UnboundedSender<Answer>) {
        let (tx, inbox) = mpsc::unbounded_channel();
        (Self { inbox }, tx)
    }

    /// Drops every queued answer.
    pub fn clear(&mut self) {
        while self.inbox.try_recv().is_ok() {}
    }

    fn next(&mut self) -> Option<Answer> {
        self.inbox.try_recv().ok()
    }
}

impl DecisionProvider for ChannelProvider {
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
