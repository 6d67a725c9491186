use super::BreedStrategy;
use crate::{
    error::{MatchingError, Result},
    evolution::options::EvolutionOptions,
    phenotype::{Bounded, Phenotype},
    rng::RandomNumberGenerator,
};

const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Like [`OrdinaryStrategy`](super::OrdinaryStrategy), but every child is
/// re-mutated until it lies inside its bounds.
///
/// A child that is still out of bounds after `max_attempts` mutations fails
/// the breed with [`MatchingError::Breeding`].
#[derive(Debug, Clone)]
pub struct BoundedBreedStrategy {
    max_attempts: usize,
}

impl BoundedBreedStrategy {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn develop<Pheno>(
        &self,
        pheno: Pheno,
        rng: &mut RandomNumberGenerator,
        initial_mutate: bool,
    ) -> Result<Pheno>
    where
        Pheno: Phenotype + Bounded,
    {
        let mut phenotype = pheno;
        if initial_mutate {
            phenotype.mutate(rng);
        }

        for _ in 0..self.max_attempts {
            if phenotype.in_bounds() {
                return Ok(phenotype);
            }
            phenotype.mutate(rng);
        }

        if phenotype.in_bounds() {
            Ok(phenotype)
        } else {
            Err(MatchingError::Breeding(format!(
                "Phenotype still out of bounds after {} mutations",
                self.max_attempts
            )))
        }
    }
}

impl Default for BoundedBreedStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl<Pheno> BreedStrategy<Pheno> for BoundedBreedStrategy
where
    Pheno: Phenotype + Bounded,
{
    fn breed(
        &self,
        parents: &[Pheno],
        evol_options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Pheno>> {
        let winner = parents.first().ok_or(MatchingError::EmptyPopulation)?;
        let mut children = Vec::with_capacity(evol_options.get_num_offspring());
        children.push(self.develop(winner.clone(), rng, false)?);

        for parent in &parents[1..] {
            let mut child = winner.clone();
            child.crossover(parent);
            children.push(self.develop(child, rng, true)?);
        }

        for _ in parents.len()..evol_options.get_num_offspring() {
            children.push(self.develop(winner.clone(), rng, true)?);
        }

        Ok(children)
    }
}
