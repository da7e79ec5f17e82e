//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and exposes
//! the handful of draws the optimizer needs: fair bits, unit-interval floats and
//! bounded indices.
//!
//! ## Example
//!
//! ```rust
//! use knapsack_ga::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let index = rng.index_below(10);
//! assert!(index < 10);
//! ```
//!
//! ## Per-worker generators
//!
//! Generators are never shared between workers. A master generator hands out one
//! independently seeded generator per worker before a parallel phase starts, and
//! each worker owns its generator exclusively:
//!
//! ```rust
//! use knapsack_ga::rng::RandomNumberGenerator;
//!
//! let mut master = RandomNumberGenerator::from_seed(42);
//! let workers = master.spawn_workers(4);
//! assert_eq!(workers.len(), 4);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform bit.
    pub fn next_bit(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Draws a uniform float in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a uniform index in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn index_below(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    /// Builds `count` generators, each seeded from a fresh draw of this one.
    ///
    /// The returned generators are meant to be moved into distinct workers; the
    /// sequence is deterministic whenever `self` was seeded deterministically.
    pub fn spawn_workers(&mut self, count: usize) -> Vec<RandomNumberGenerator> {
        (0..count)
            .map(|_| RandomNumberGenerator::from_seed(self.rng.gen::<u64>()))
            .collect()
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
