//! # Phenotype
//!
//! The `Phenotype` trait is what the evolution driver breeds. The matching
//! engine uses a single phenotype, [`CandidateKeys`]: one random key per
//! individual, decoded by sorting individuals by key into a proposal order.
//!
//! ## Example
//!
//! ```rust
//! use stablematch::phenotype::{Bounded, CandidateKeys, Phenotype};
//! use stablematch::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let mut keys = CandidateKeys::random(6, &mut rng);
//! assert_eq!(keys.len(), 6);
//! assert!(keys.in_bounds());
//!
//! let other = CandidateKeys::random(6, &mut rng);
//! keys.crossover(&other);
//! keys.mutate(&mut rng);
//! ```

use std::fmt::Debug;

use crate::rng::{RandomNumberGenerator, ThreadLocalRng};

/// Trait for types that represent individuals in an evolutionary algorithm.
///
/// Types implementing this trait must also implement `Clone`, `Debug`, `Send`
/// and `Sync` so generations can be scored in parallel.
pub trait Phenotype: Clone + Debug + Send + Sync {
    /// Combines the genetic material of `self` with `other`, in place.
    fn crossover(&mut self, other: &Self);

    /// Introduces random changes using the provided random number generator.
    fn mutate(&mut self, rng: &mut RandomNumberGenerator);

    /// Mutation for parallel breeding, where no shared generator is available.
    ///
    /// The default implementation mutates with a freshly seeded generator.
    fn mutate_thread_local(&mut self) {
        let mut temp_rng = RandomNumberGenerator::new();
        self.mutate(&mut temp_rng);
    }
}

/// Phenotypes that only make sense inside a validity region.
pub trait Bounded {
    fn in_bounds(&self) -> bool;
}

/// Default largest change a single mutation applies to one key.
pub const DEFAULT_MUTATION_STEP: f64 = 0.1;

/// Random-key encoding of a matching candidate: one key in `[0, 1)` per
/// individual. Lower keys propose first.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateKeys {
    keys: Vec<f64>,
    step: f64,
}

impl CandidateKeys {
    pub fn new(keys: Vec<f64>) -> Self {
        Self {
            keys,
            step: DEFAULT_MUTATION_STEP,
        }
    }

    /// `size` keys drawn uniformly from `[0, 1)`.
    pub fn random(size: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new(rng.fetch_keys(size))
    }

    /// Keys that make individuals propose in ascending id order.
    pub fn identity(size: usize) -> Self {
        let keys = (0..size).map(|i| i as f64 / size.max(1) as f64).collect();
        Self::new(keys)
    }

    /// Sets the largest perturbation a mutation applies to one key. A step
    /// that is not positive and finite turns mutation off.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn mutation_step(&self) -> Option<f64> {
        (self.step > 0.0 && self.step.is_finite()).then_some(self.step)
    }

    fn apply_deltas(&mut self, deltas: Vec<f64>) {
        for (key, delta) in self.keys.iter_mut().zip(deltas) {
            *key += delta;
        }
    }
}

impl Phenotype for CandidateKeys {
    /// Midpoint blend of both parents' keys.
    fn crossover(&mut self, other: &Self) {
        for (key, other_key) in self.keys.iter_mut().zip(&other.keys) {
            *key = (*key + other_key) / 2.0;
        }
    }

    fn mutate(&mut self, rng: &mut RandomNumberGenerator) {
        let Some(step) = self.mutation_step() else {
            return;
        };
        let deltas = rng.fetch_deltas(step, self.keys.len());
        self.apply_deltas(deltas);
    }

    fn mutate_thread_local(&mut self) {
        let Some(step) = self.mutation_step() else {
            return;
        };
        self.apply_deltas(ThreadLocalRng::fetch_deltas(step, self.keys.len()));
    }
}

impl Bounded for CandidateKeys {
    fn in_bounds(&self) -> bool {
        self.keys.iter().all(|k| (0.0..1.0).contains(k))
    }
}
