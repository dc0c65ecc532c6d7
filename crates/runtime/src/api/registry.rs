//! Seat registry routing each decision to the provider of its player.
//!
//! Players bound to a provider are answered by it; every other player is an
//! external seat whose answers arrive through the handle.

use std::collections::HashMap;

use horde_core::{
    ActorId, Answer, DecisionProvider, Equipment, FamiliarMove, GameState, KeepChoice,
    MoveOption, OrganizeStep, PlayerId, RerollChoice, SkillKind, ZoneId, ZonePurpose,
};

use crate::providers::ChannelProvider;

/// Player-to-provider routing with an external fallback.
///
/// ```text
/// SeatRegistry
/// ├── seats: HashMap<PlayerId, Provider>  (bound seats)
/// └── external: ChannelProvider           (everyone else)
/// ```
pub struct SeatRegistry {
    seats: HashMap<PlayerId, Box<dyn DecisionProvider + Send>>,
    external: ChannelProvider,
}

impl SeatRegistry {
    pub fn new(external: ChannelProvider) -> Self {
        Self {
            seats: HashMap::new(),
            external,
        }
    }

    /// Binds `player` to `provider`, replacing any earlier binding.
    pub fn bind(&mut self, player: PlayerId, provider: Box<dyn DecisionProvider + Send>) {
        self.seats.insert(player, provider);
    }

    /// Turns `player` back into an external seat.
    pub fn unbind(&mut self, player: PlayerId) -> Option<Box<dyn DecisionProvider + Send>> {
        self.seats.remove(&player)
    }

    /// True if decisions of `player` are answered through the handle.
    pub fn is_external(&self, player: Option<PlayerId>) -> bool {
        player.is_none_or(|p| !self.seats.contains_key(&p))
    }

    /// Drops answers queued for external seats.
    pub fn clear_inbox(&mut self) {
        self.external.clear();
    }

    fn seat(&mut self, player: Option<PlayerId>) -> &mut dyn DecisionProvider {
        match player.and_then(|p| self.seats.get_mut(&p)) {
            Some(provider) => &mut **provider,
            None => &mut self.external,
        }
    }
}

/// Player controlling `actor`; familiars answer to their owner's player.
pub fn controller(state: &GameState, actor: ActorId) -> Option<PlayerId> {
    let entry = state.actors.get(actor)?;
    if let Some(survivor) = entry.survivor() {
        return Some(survivor.player);
    }
    let owner = entry.familiar()?.owner;
    state.survivor(owner).map(|s| s.player)
}

impl DecisionProvider for SeatRegistry {
    fn acting_player_changed(&mut self, state: &GameState, player: PlayerId) {
        self.seat(Some(player)).acting_player_changed(state, player);
    }

    fn choose_survivor(
        &mut self,
        state: &GameState,
        player: PlayerId,
        options: &[ActorId],
    ) -> Option<Answer> {
        self.seat(Some(player))
            .choose_survivor(state, player, options)
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[MoveOption],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_move(state, actor, options)
    }

    fn choose_zone(
        &mut self,
        state: &GameState,
        actor: ActorId,
        purpose: ZonePurpose,
        options: &[ZoneId],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_zone(state, actor, purpose, options)
    }

    fn choose_equipment(
        &mut self,
        state: &GameState,
        actor: ActorId,
        found: &Equipment,
        options: &[KeepChoice],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_equipment(state, actor, found, options)
    }

    fn choose_organize(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[OrganizeStep],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_organize(state, actor, options)
    }

    fn choose_skill(
        &mut self,
        state: &GameState,
        actor: ActorId,
        options: &[SkillKind],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_skill(state, actor, options)
    }

    fn choose_reroll(
        &mut self,
        state: &GameState,
        actor: ActorId,
        faces: &[u8],
        options: &[RerollChoice],
    ) -> Option<Answer> {
        self.seat(controller(state, actor))
            .choose_reroll(state, actor, faces, options)
    }

    fn choose_familiar_move(
        &mut self,
        state: &GameState,
        familiar: ActorId,
        options: &[FamiliarMove],
    ) -> Option<Answer> {
        self.seat(controller(state, familiar))
            .choose_familiar_move(state, familiar, options)
    }
}
