//! Bounded undo history of full-state snapshots.

use std::collections::VecDeque;

use horde_core::{DynQuest, GameState};

/// State and scenario as they were before an answer was applied.
#[derive(Clone)]
pub struct Snapshot {
    pub state: GameState,
    pub quest: Box<dyn DynQuest>,
}

impl Snapshot {
    pub fn capture(state: &GameState, quest: &dyn DynQuest) -> Self {
        Self {
            state: state.clone(),
            quest: quest.clone_quest(),
        }
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("round", &self.state.round.number)
            .field("phase", &self.state.phases.top().tag())
            .finish_non_exhaustive()
    }
}

/// Stack of snapshots holding at most `depth` entries; pushing onto a full
/// history forgets the oldest one.
#[derive(Debug)]
pub struct SnapshotHistory {
    depth: usize,
    entries: VecDeque<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            entries: VecDeque::with_capacity(depth),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.depth == 0 {
            return;
        }
        if self.entries.len() == self.depth {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
