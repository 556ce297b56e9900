//! Deterministic, explicitly passed RNG.
//!
//! # Determinism strategy
//!
//! Nothing in the simulator touches global randomness.  Each consumer of a
//! run gets its own child stream of a root [`SimRng`] seeded from the
//! workload seed:
//!
//!   child_seed = parent.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.  Because
//! each consumer (order sampling, heatmap sampling, congestion jitter) draws
//! from its own stream, adding draws to one of them never shifts the others.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Well-known child-stream offsets used by a simulation run.
pub mod streams {
    pub const ORDERS:  u64 = 1;
    pub const HEATMAP: u64 = 2;
    pub const JITTER:  u64 = 3;
}

/// Seedable simulation RNG.
///
/// Used only in single-threaded contexts.  Parallel sweeps give each run its
/// own root `SimRng` from that run's seed.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Uniform draw from the closed interval `[lo, hi]`.
    ///
    /// Returns `lo` without consuming randomness when the interval is
    /// degenerate (`lo >= hi`).
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
