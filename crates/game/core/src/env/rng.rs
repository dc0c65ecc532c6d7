//! Deterministic random number generation.
//!
//! Every shuffle in the kernel (dice bag, equipment deck, spawn deck) draws
//! from a seeded generator stored in the game state, so a session replays
//! identically from its seed and decision log.

/// Source of deterministic randomness.
///
/// Implementations must be deterministic and produce the same sequence
/// given the same seed.
pub trait RngOracle {
    /// Advance the generator and return the next 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Rejection sampling keeps the distribution uniform.
        let zone = u32::MAX - (u32::MAX % bound);
        loop {
            let value = self.next_u32();
            if value < zone {
                return value % bound;
            }
        }
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.below(sides) + 1
    }

    /// Fisher-Yates shuffle in place.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator for one named stream of a game seed.
    pub fn new(seed: u64, stream: u32) -> Self {
        Self {
            state: compute_seed(seed, stream),
        }
    }

    /// `state' = state * multiplier + increment (mod 2^64)`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Well-known stream numbers so each deck draws independently.
pub mod streams {
    pub const DICE: u32 = 1;
    pub const EQUIPMENT: u32 = 2;
    pub const SPAWN: u32 = 3;
}

/// Derive a per-stream seed from the game seed.
///
/// Constants are the SplitMix64 and FxHash multipliers.
pub fn compute_seed(game_seed: u64, stream: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= (stream as u64).wrapping_mul(0x9e3779b97f4a7c15);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::new(42, streams::DICE);
        let mut b = PcgRng::new(42, streams::DICE);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn streams_diverge() {
        let mut a = PcgRng::new(42, streams::DICE);
        let mut b = PcgRng::new(42, streams::SPAWN);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn roll_die_stays_in_range() {
        let mut rng = PcgRng::new(7, 0);
        for _ in 0..500 {
            let face = rng.roll_die(6);
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = PcgRng::new(3, 0);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
