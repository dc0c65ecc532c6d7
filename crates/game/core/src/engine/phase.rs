//! Phase frames and the never-empty phase stack.

use arrayvec::ArrayVec;

use crate::actor::AdversaryKind;
use crate::combat::PendingAttack;
use crate::item::Equipment;
use crate::skills::FreeActions;
use crate::state::{ActorId, EquipmentId, PlayerId, ZoneId};

/// What a survivor is aiming once a target zone is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Attack {
        weapons: ArrayVec<EquipmentId, 2>,
    },
    Throw {
        item: EquipmentId,
    },
    Enchant {
        spell: EquipmentId,
    },
    Siege {
        engine: ActorId,
    },
}

/// One frame of the state machine. Round-level frames sit at the bottom of
/// the stack and replace each other; sub-decisions are pushed on top and
/// popped once resolved.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(PhaseTag), derive(Hash, strum::Display))]
#[cfg_attr(
    feature = "serde",
    strum_discriminants(derive(serde::Serialize, serde::Deserialize))
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Init,
    BeginRound,
    /// Draws a spawn card for each zone in turn.
    Spawn {
        zones: Vec<ZoneId>,
        next: usize,
    },
    PlayerSelect,
    CharacterSelect {
        player: PlayerId,
    },
    ActionSelect {
        actor: ActorId,
    },
    /// Cancellable; the cost is paid only once a zone is picked.
    ChooseTarget {
        actor: ActorId,
        intent: Intent,
        cost: u8,
        free: FreeActions,
    },
    Reroll {
        pending: PendingAttack,
    },
    NewSkill {
        actor: ActorId,
    },
    KeepEquipment {
        actor: ActorId,
        found: Equipment,
    },
    Organize {
        actor: ActorId,
        partner: Option<ActorId>,
    },
    FamiliarAction {
        familiar: ActorId,
    },
    SpawnRemoval {
        actor: ActorId,
        remaining: u8,
    },
    /// Activation queue. `only` restricts it to one kind (extra activation
    /// cards); the queue is filled on the first step.
    AdversaryStage {
        queue: Vec<ActorId>,
        only: Option<AdversaryKind>,
        started: bool,
    },
    EndRound,
    GameOver,
}

impl Phase {
    pub fn tag(&self) -> PhaseTag {
        PhaseTag::from(self)
    }
}

static INIT: Phase = Phase::Init;

/// Ordered stack of phase frames. It always holds at least one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseStack {
    frames: Vec<Phase>,
}

impl Default for PhaseStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Phase::Init],
        }
    }

    pub fn top(&self) -> &Phase {
        self.frames.last().unwrap_or(&INIT)
    }

    pub fn top_mut(&mut self) -> &mut Phase {
        if self.frames.is_empty() {
            self.frames.push(Phase::Init);
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn push(&mut self, phase: Phase) {
        tracing::trace!(
            target: "horde::engine",
            phase = %phase.tag(),
            depth = self.frames.len() + 1,
            "push"
        );
        self.frames.push(phase);
    }

    /// Pops the top frame. The bottom frame is never popped.
    pub fn pop(&mut self) -> Option<Phase> {
        if self.frames.len() <= 1 {
            return None;
        }
        let phase = self.frames.pop();
        tracing::trace!(target: "horde::engine", depth = self.frames.len(), "pop");
        phase
    }

    /// Swaps the top frame for `phase`, returning the old one.
    pub fn replace_top(&mut self, phase: Phase) -> Phase {
        std::mem::replace(self.top_mut(), phase)
    }

    /// Drops every frame and leaves only `phase`.
    pub fn reset(&mut self, phase: Phase) {
        self.frames.clear();
        self.frames.push(phase);
    }

    /// Finishes the top frame: pops it, or replaces it with `next` when it is
    /// the bottom frame.
    pub fn finish(&mut self, next: Phase) {
        if self.pop().is_none() {
            self.replace_top(next);
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame tags from bottom to top.
    pub fn tags(&self) -> Vec<PhaseTag> {
        self.frames.iter().map(Phase::tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_frame_is_never_popped() {
        let mut stack = PhaseStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top().tag(), PhaseTag::Init);
        stack.push(Phase::EndRound);
        assert_eq!(stack.pop(), Some(Phase::EndRound));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn finish_pops_or_replaces() {
        let mut stack = PhaseStack::new();
        stack.replace_top(Phase::PlayerSelect);
        stack.push(Phase::CharacterSelect {
            player: PlayerId(0),
        });
        stack.finish(Phase::EndRound);
        assert_eq!(stack.tags(), vec![PhaseTag::PlayerSelect]);
        stack.finish(Phase::EndRound);
        assert_eq!(stack.tags(), vec![PhaseTag::EndRound]);
    }
}
