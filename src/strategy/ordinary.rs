use rayon::prelude::*;

use super::BreedStrategy;
use crate::{
    error::{MatchingError, Result},
    evolution::options::EvolutionOptions,
    phenotype::Phenotype,
    rng::RandomNumberGenerator,
};

/// Elitist breeding: the previous winner survives unchanged, every other
/// parent is crossed with the winner and mutated, and the remaining slots are
/// filled with mutated copies of the winner.
///
/// Generations at least as large as the options' parallel threshold are bred
/// with Rayon and thread-local mutation.
#[derive(Debug, Clone, Default)]
pub struct OrdinaryStrategy;

impl OrdinaryStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl<Pheno> BreedStrategy<Pheno> for OrdinaryStrategy
where
    Pheno: Phenotype + Send + Sync,
{
    fn breed(
        &self,
        parents: &[Pheno],
        evol_options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Pheno>> {
        let winner = parents.first().ok_or(MatchingError::EmptyPopulation)?;
        let mut children = Vec::with_capacity(evol_options.get_num_offspring());
        children.push(winner.clone());

        let crossover_parents = &parents[1..];
        let num_mutation_only = evol_options
            .get_num_offspring()
            .saturating_sub(parents.len());

        if crossover_parents.len() + num_mutation_only >= evol_options.get_parallel_threshold() {
            children.par_extend(crossover_parents.par_iter().map(|parent| {
                let mut child = winner.clone();
                child.crossover(parent);
                child.mutate_thread_local();
                child
            }));
            children.par_extend((0..num_mutation_only).into_par_iter().map(|_| {
                let mut child = winner.clone();
                child.mutate_thread_local();
                child
            }));
        } else {
            for parent in crossover_parents {
                let mut child = winner.clone();
                child.crossover(parent);
                child.mutate(rng);
                children.push(child);
            }
            for _ in 0..num_mutation_only {
                let mut child = winner.clone();
                child.mutate(rng);
                children.push(child);
            }
        }

        Ok(children)
    }
}
