//! Deterministic randomness for the simulation
//!
//! All stochastic decisions go through a [`RandomSource`] so that a run is
//! fully determined by its seed, and tests can swap in a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws. Implementations advance their state on every call.
pub trait RandomSource: Send {
    /// Next value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Next integer in the inclusive range `lo..=hi`
    fn next_int(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = hi - lo + 1;
        let offset = (self.next_f64() * span as f64) as u64;
        lo + offset.min(span - 1)
    }

    /// Index of a uniformly chosen element of a collection of length `len`
    fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.next_int(0, len as u64 - 1) as usize)
    }
}

/// Pick a random element from a slice
pub fn choice<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    rng.choose_index(items.len()).map(|index| &items[index])
}

/// Seeded pseudo-random stream backed by `StdRng`
///
/// Two streams built from the same seed yield the same sequence.
pub struct RandomStream {
    seed: u64,
    rng: StdRng,
}

impl RandomStream {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for RandomStream {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_int(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed list of draws, wrapping around at the end
///
/// Values are clamped into `[0, 1)`. An empty list always yields `0.0`.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
