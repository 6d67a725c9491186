//! # RandomNumberGenerator
//!
//! Randomness for candidate keys and their mutations. Seed the generator to
//! make a whole optimization run reproducible:
//!
//! ```rust
//! use stablematch::rng::RandomNumberGenerator;
//!
//! let mut a = RandomNumberGenerator::from_seed(11);
//! let mut b = RandomNumberGenerator::from_seed(11);
//! assert_eq!(a.fetch_keys(4), b.fetch_keys(4));
//! ```
//!
//! Parallel breeding draws from [`ThreadLocalRng`] instead, which needs no
//! synchronization but cannot be seeded.

use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};

/// Per-thread generator backed by `rand::thread_rng`, seeded from system entropy.
pub struct ThreadLocalRng;

impl ThreadLocalRng {
    /// `num` perturbations drawn uniformly from `[-step, step)`. `step` must be positive and finite.
    pub fn fetch_deltas(step: f64, num: usize) -> Vec<f64> {
        let mut rng = thread_rng();
        (0..num).map(|_| rng.gen_range(-step..step)).collect()
    }
}

/// A seedable wrapper around the `rand` crate's `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a generator with a fixed seed, for reproducible runs, tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `num` random keys in `[0, 1)`.
    pub fn fetch_keys(&mut self, num: usize) -> Vec<f64> {
        (0..num).map(|_| self.rng.gen::<f64>()).collect()
    }

    /// `num` perturbations drawn uniformly from `[-step, step)`. `step` must be positive and finite.
    pub fn fetch_deltas(&mut self, step: f64, num: usize) -> Vec<f64> {
        (0..num).map(|_| self.rng.gen_range(-step..step)).collect()
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
    fn test_fetch_keys() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let keys = rng.fetch_keys(100);

        assert_eq!(keys.len(), 100);
        assert!(keys.iter().all(|k| (0.0..1.0).contains(k)));
    }

    #[test]
    fn test_fetch_deltas_stay_within_step() {
        let mut rng = RandomNumberGenerator::new();
        let deltas = rng.fetch_deltas(0.25, 50);

        assert_eq!(deltas.len(), 50);
        assert!(deltas.iter().all(|d| (-0.25..0.25).contains(d)));
    }

    #[test]
    fn test_fetch_nothing() {
        let mut rng = RandomNumberGenerator::new();
        assert!(rng.fetch_keys(0).is_empty());
        assert!(rng.fetch_deltas(1.0, 0).is_empty());
    }

    #[test]
    fn test_seeded_generators_differ_by_seed() {
        let mut rng1 = RandomNumberGenerator::from_seed(1);
        let mut rng2 = RandomNumberGenerator::from_seed(2);

        assert_ne!(rng1.fetch_keys(8), rng2.fetch_keys(8));
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();

        // A clone continues the same sequence.
        assert_eq!(rng1.fetch_deltas(0.1, 5), rng2.fetch_deltas(0.1, 5));
    }

    #[test]
    fn test_thread_local_rng() {
        let deltas = ThreadLocalRng::fetch_deltas(0.5, 5);

        assert_eq!(deltas.len(), 5);
        assert!(deltas.iter().all(|d| (-0.5..0.5).contains(d)));
    }
}
