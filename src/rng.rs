//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct wraps the `rand` crate's `StdRng` and is
//! passed explicitly to every component that needs randomness. There is no
//! process-wide random source: an engine owns one generator and hands
//! independent, deterministically derived generators to each pipeline phase.
//!
//! ## Example
//!
//! ```rust
//! use evostream::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let mut phase_rng = rng.fork();
//!
//! let x: f64 = phase_rng.gen_range(0.0..1.0);
//! assert!((0.0..1.0).contains(&x));
//! ```

use rand::{
    distributions::uniform::{SampleRange, SampleUniform},
    rngs::StdRng,
    Rng, RngCore, SeedableRng,
};

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
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

    /// Creates an independent generator seeded from this one.
    ///
    /// Forking in a fixed order yields the same child streams for the same
    /// parent seed, which is what keeps concurrently running phases
    /// reproducible.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.next_u64())
    }

    /// Generates a random value in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// Returns `true` with the given probability.
    ///
    /// Values outside `[0, 1]` are clamped.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Returns a uniformly distributed index in `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_range_with_negative_range() {
        let mut rng = RandomNumberGenerator::new();
        for _ in 0..100 {
            let num: f64 = rng.gen_range(-1.0..1.0);
            assert!((-1.0..1.0).contains(&num));
        }
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();

        // Both RNGs should generate the same sequence after cloning
        let nums1: Vec<u32> = (0..5).map(|_| rng1.gen_range(0..1000)).collect();
        let nums2: Vec<u32> = (0..5).map(|_| rng2.gen_range(0..1000)).collect();

        assert_eq!(nums1, nums2);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut parent1 = RandomNumberGenerator::from_seed(7);
        let mut parent2 = RandomNumberGenerator::from_seed(7);

        let mut a1 = parent1.fork();
        let mut b1 = parent1.fork();
        let mut a2 = parent2.fork();
        let mut b2 = parent2.fork();

        assert_eq!(a1.gen_range(0..u64::MAX), a2.gen_range(0..u64::MAX));
        assert_eq!(b1.gen_range(0..u64::MAX), b2.gen_range(0..u64::MAX));
    }

    #[test]
    fn test_gen_bool_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(2.0));
    }
}
