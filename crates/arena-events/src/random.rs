//! Swappable randomness source for event selection and pacing.
//!
//! Everything random in the engine -- weighted event draws, fight odds,
//! pacing offsets, player shuffles -- goes through [`RandomSource`] so tests
//! can substitute a seeded generator and get reproducible runs.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A source of randomness the engine can draw from.
///
/// The two primitive operations are [`unit`] and [`below`]; weighted choice
/// and shuffling are provided on top of them, so a deterministic
/// implementation of the primitives makes every derived draw deterministic
/// as well.
///
/// [`unit`]: RandomSource::unit
/// [`below`]: RandomSource::below
pub trait RandomSource: Send {
    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer in `[0, upper)`. Returns 0 when `upper` is 0.
    fn below(&mut self, upper: u64) -> u64;

    /// Bernoulli trial with the given success probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Weighted choice over a slice of weights: returns the index of the
    /// selected entry, with probability proportional to its weight.
    ///
    /// Returns `None` when the weights sum to zero (nothing to choose).
    fn weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total = weights
            .iter()
            .fold(0u64, |acc, w| acc.saturating_add(u64::from(*w)));
        if total == 0 {
            return None;
        }

        let mut roll = self.below(total);
        for (index, weight) in weights.iter().enumerate() {
            let weight = u64::from(*weight);
            if roll < weight {
                return Some(index);
            }
            roll = roll.saturating_sub(weight);
        }
        None
    }

    /// Uniformly shuffled indices `0..len` (Fisher-Yates over [`below`]).
    ///
    /// [`below`]: RandomSource::below
    fn shuffle_indices(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        let mut i = len;
        while i > 1 {
            i = i.saturating_sub(1);
            let bound = u64::try_from(i.saturating_add(1)).unwrap_or(u64::MAX);
            let j = usize::try_from(self.below(bound)).unwrap_or(0);
            indices.swap(i, j);
        }
        indices
    }
}

/// Production randomness backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl ThreadRandom {
    /// Create a new thread-local randomness source.
    pub const fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRandom {
    fn unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn below(&mut self, upper: u64) -> u64 {
        if upper == 0 {
            0
        } else {
            rand::rng().random_range(0..upper)
        }
    }
}

/// Deterministic randomness for tests, seeded explicitly.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a deterministic source from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn below(&mut self, upper: u64) -> u64 {
        if upper == 0 {
            0
        } else {
            self.rng.random_range(0..upper)
        }
    }
}
