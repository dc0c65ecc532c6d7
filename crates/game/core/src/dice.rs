//! Finite shuffled dice bag.
//!
//! Instead of independent rolls, attacks draw faces from a fixed multiset
//! (weighted by difficulty) that is shuffled once and consumed. When the bag
//! runs dry a fresh copy of the multiset is shuffled in.

use crate::config::Difficulty;
use crate::env::{PcgRng, RngOracle, streams};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceBag {
    counts: [u8; 6],
    faces: Vec<u8>,
    cursor: usize,
    rng: PcgRng,
}

impl DiceBag {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut bag = Self {
            counts: difficulty.face_counts(),
            faces: Vec::new(),
            cursor: 0,
            rng: PcgRng::new(seed, streams::DICE),
        };
        bag.refill();
        bag
    }

    /// A bag whose next draws are exactly `faces`, in order. Used by tests and
    /// replays; after the stacked faces run out it behaves like a Normal bag.
    pub fn stacked(faces: &[u8]) -> Self {
        Self {
            counts: Difficulty::Normal.face_counts(),
            faces: faces.iter().map(|f| (*f).clamp(1, 6)).collect(),
            cursor: 0,
            rng: PcgRng::new(0, streams::DICE),
        }
    }

    /// Faces in one full bag.
    pub fn capacity(&self) -> usize {
        self.counts.iter().map(|c| *c as usize).sum()
    }

    /// Faces left before the next refill.
    pub fn remaining(&self) -> usize {
        self.faces.len() - self.cursor
    }

    /// Undrawn faces, in draw order.
    pub fn pending(&self) -> &[u8] {
        &self.faces[self.cursor..]
    }

    pub fn draw(&mut self) -> u8 {
        if self.cursor >= self.faces.len() {
            self.refill();
        }
        // refill() never leaves the bag empty unless every count is zero
        let face = self.faces.get(self.cursor).copied().unwrap_or(1);
        self.cursor += 1;
        face
    }

    pub fn roll(&mut self, dice: u8) -> Vec<u8> {
        (0..dice).map(|_| self.draw()).collect()
    }

    fn refill(&mut self) {
        self.faces.clear();
        for (index, count) in self.counts.iter().enumerate() {
            let face = index as u8 + 1;
            self.faces.extend(std::iter::repeat_n(face, *count as usize));
        }
        self.rng.shuffle(&mut self.faces);
        self.cursor = 0;
        tracing::trace!(target: "horde::combat", size = self.faces.len(), "dice bag refilled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_faces_come_out_in_order() {
        let mut bag = DiceBag::stacked(&[4, 5, 1]);
        assert_eq!(bag.roll(3), vec![4, 5, 1]);
        assert_eq!(bag.remaining(), 0);
        // falls back to a fresh Normal bag
        let next = bag.draw();
        assert!((1..=6).contains(&next));
        assert_eq!(bag.remaining(), 35);
    }

    #[test]
    fn one_full_cycle_draws_the_multiset() {
        let mut bag = DiceBag::new(Difficulty::Hard, 11);
        let drawn = bag.roll(bag.capacity() as u8);
        let mut counts = [0u8; 6];
        for face in drawn {
            counts[face as usize - 1] += 1;
        }
        assert_eq!(counts, Difficulty::Hard.face_counts());
    }

    #[test]
    fn seeded_bags_replay() {
        let mut a = DiceBag::new(Difficulty::Normal, 99);
        let mut b = DiceBag::new(Difficulty::Normal, 99);
        assert_eq!(a.roll(20), b.roll(20));
    }
}
