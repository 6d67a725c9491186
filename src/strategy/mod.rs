//! # BreedStrategy
//!
//! A breeding strategy turns the surviving parents of one generation into the
//! candidates of the next. The first parent is always the previous winner.

pub mod bounded;
pub mod ordinary;

use std::fmt::Debug;

use crate::{
    error::Result, evolution::options::EvolutionOptions, phenotype::Phenotype,
    rng::RandomNumberGenerator,
};

pub trait BreedStrategy<Pheno: Phenotype>
where
    Self: Debug + Clone + Send + Sync,
{
    /// Breeds `evol_options.get_num_offspring()` candidates from `parents`.
    ///
    /// # Errors
    ///
    /// Fails on an empty `parents` slice, or when a strategy cannot produce a
    /// valid candidate.
    fn breed(
        &self,
        parents: &[Pheno],
        evol_options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Pheno>>;
}

pub use bounded::BoundedBreedStrategy;
pub use ordinary::OrdinaryStrategy;
