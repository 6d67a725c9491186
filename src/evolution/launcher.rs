use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::debug;

use super::{
    challenge::Challenge,
    options::{EvolutionOptions, LogLevel},
};
use crate::{
    error::{MatchingError, OptionExt, Result},
    phenotype::Phenotype,
    rng::RandomNumberGenerator,
    strategy::BreedStrategy,
};

/// A phenotype together with its score.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct EvolutionResult<Pheno: Phenotype> {
    pub pheno: Pheno,
    pub score: f64,
}

/// Runs generations of a breeding strategy against a challenge.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct EvolutionLauncher<Pheno, Strategy, Chall>
where
    Pheno: Phenotype,
    Chall: Challenge<Pheno>,
    Strategy: BreedStrategy<Pheno>,
{
    strategy: Strategy,
    challenge: Chall,
    _marker: PhantomData<Pheno>,
}

impl<Pheno, Strategy, Chall> EvolutionLauncher<Pheno, Strategy, Chall>
where
    Pheno: Phenotype + Send + Sync,
    Chall: Challenge<Pheno> + Send + Sync,
    Strategy: BreedStrategy<Pheno>,
{
    pub fn new(strategy: Strategy, challenge: Chall) -> Self {
        Self {
            strategy,
            challenge,
            _marker: PhantomData,
        }
    }

    pub fn challenge(&self) -> &Chall {
        &self.challenge
    }

    /// Evolves `starting_value` over `options.get_num_generations()` generations
    /// and returns the best phenotype of the last one.
    ///
    /// # Errors
    ///
    /// - the population size or the offspring count is zero;
    /// - breeding fails;
    /// - a candidate cannot be scored, or scores a non-finite value.
    ///
    /// Generations at least as large as the options' parallel threshold are
    /// scored in parallel with Rayon.
    pub fn evolve(
        &self,
        options: &EvolutionOptions,
        starting_value: Pheno,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult<Pheno>> {
        options.validate()?;

        let mut fitness: Vec<EvolutionResult<Pheno>> = vec![EvolutionResult {
            score: self.score(&starting_value)?,
            pheno: starting_value.clone(),
        }];
        let mut parents: Vec<Pheno> = vec![starting_value];

        for generation in 0..options.get_num_generations() {
            let candidates = self
                .strategy
                .breed(&parents, options, rng)
                .map_err(|e| {
                    MatchingError::Breeding(format!(
                        "Failed to breed candidates in generation {}: {}",
                        generation, e
                    ))
                })?;

            fitness = if candidates.len() >= options.get_parallel_threshold() {
                candidates
                    .into_par_iter()
                    .map(|pheno| self.score(&pheno).map(|score| EvolutionResult { pheno, score }))
                    .collect::<Result<Vec<_>>>()?
            } else {
                candidates
                    .into_iter()
                    .map(|pheno| self.score(&pheno).map(|score| EvolutionResult { pheno, score }))
                    .collect::<Result<Vec<_>>>()?
            };

            if fitness.is_empty() {
                return Err(MatchingError::Evolution(format!(
                    "No viable candidates produced in generation {}",
                    generation
                )));
            }

            // Stable: among equal scores the earlier candidate (the previous winner) stays first.
            fitness.sort_by(|a, b| b.score.total_cmp(&a.score));

            match options.get_log_level() {
                LogLevel::Minimal => debug!(generation, best = fitness[0].score, "Generation done"),
                LogLevel::Verbose => fitness.iter().for_each(|result| {
                    debug!(generation, score = result.score, pheno = ?result.pheno, "Candidate scored");
                }),
                LogLevel::None => {}
            }

            parents = fitness
                .iter()
                .take(options.get_population_size())
                .map(|result| result.pheno.clone())
                .collect();
        }

        fitness.into_iter().next().ok_or_else_matching(|| {
            MatchingError::Evolution(
                "Evolution completed but no viable candidates were produced".to_string(),
            )
        })
    }

    fn score(&self, pheno: &Pheno) -> Result<f64> {
        let score = self.challenge.score(pheno)?;
        if !score.is_finite() {
            return Err(MatchingError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }
        Ok(score)
    }
}
