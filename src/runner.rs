//! # MatchingRunner
//!
//! Runs every registered breeding algorithm against one problem a fixed
//! number of times and reports what each run found. With a base seed, run
//! `i` of the `a`-th algorithm is seeded with `seed + a * run_count + i`, so a
//! whole comparison is reproducible.
//!
//! ```rust
//! use stablematch::data::MatchingData;
//! use stablematch::evolution::EvolutionOptions;
//! use stablematch::problem::StableMatchingProblem;
//! use stablematch::requirement::Requirement;
//! use stablematch::runner::{Algorithm, AlgorithmReport, MatchingRunner};
//!
//! let data = MatchingData::builder()
//!     .set_indices(vec![0, 0, 1, 1])
//!     .capacities(vec![1; 4])
//!     .properties(vec![vec![2.0], vec![6.0], vec![5.0], vec![9.0]])
//!     .weights(vec![vec![1.0]; 4])
//!     .requirements(vec![vec![Requirement::target_scale(7.0)]; 4])
//!     .build()
//!     .unwrap();
//! let problem = StableMatchingProblem::builder(data).build().unwrap();
//!
//! let options = EvolutionOptions::builder().num_generations(5).build();
//! let reports = MatchingRunner::new(problem, options)
//!     .with_run_count(2)
//!     .with_seed(42)
//!     .register(Algorithm::ordinary())
//!     .register(Algorithm::bounded())
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(reports.len(), 4);
//! assert!(AlgorithmReport::best(&reports).is_some());
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;

use crate::{
    error::{MatchingError, Result},
    evolution::{EvolutionLauncher, EvolutionOptions},
    matches::Matches,
    phenotype::CandidateKeys,
    problem::StableMatchingProblem,
    rng::RandomNumberGenerator,
    strategy::{BoundedBreedStrategy, BreedStrategy, OrdinaryStrategy},
};

/// A breeding algorithm the runner can execute.
#[derive(Debug, Clone)]
pub enum Algorithm {
    Ordinary(OrdinaryStrategy),
    Bounded(BoundedBreedStrategy),
}

impl Algorithm {
    pub fn ordinary() -> Self {
        Algorithm::Ordinary(OrdinaryStrategy::new())
    }

    pub fn bounded() -> Self {
        Algorithm::Bounded(BoundedBreedStrategy::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Ordinary(_) => "ordinary",
            Algorithm::Bounded(_) => "bounded",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BreedStrategy<CandidateKeys> for Algorithm {
    fn breed(
        &self,
        parents: &[CandidateKeys],
        evol_options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<CandidateKeys>> {
        match self {
            Algorithm::Ordinary(strategy) => strategy.breed(parents, evol_options, rng),
            Algorithm::Bounded(strategy) => strategy.breed(parents, evol_options, rng),
        }
    }
}

/// The outcome of one run of one algorithm.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmReport {
    pub algorithm: String,
    pub run_index: usize,
    pub runtime: Duration,
    pub matches: Matches,
    pub satisfactions: Vec<f64>,
    pub fitness: f64,
}

impl AlgorithmReport {
    /// The report with the highest fitness; the earliest wins ties.
    pub fn best(reports: &[AlgorithmReport]) -> Option<&AlgorithmReport> {
        reports.iter().reduce(|best, report| {
            if report.fitness > best.fitness {
                report
            } else {
                best
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct MatchingRunner {
    problem: StableMatchingProblem,
    options: EvolutionOptions,
    run_count: usize,
    seed: Option<u64>,
    algorithms: Vec<Algorithm>,
}

impl MatchingRunner {
    /// A runner doing one unseeded run per algorithm, with no algorithm registered yet.
    pub fn new(problem: StableMatchingProblem, options: EvolutionOptions) -> Self {
        Self {
            problem,
            options,
            run_count: 1,
            seed: None,
            algorithms: Vec::new(),
        }
    }

    pub fn with_run_count(mut self, run_count: usize) -> Self {
        self.run_count = run_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn register(mut self, algorithm: Algorithm) -> Self {
        self.algorithms.push(algorithm);
        self
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn problem(&self) -> &StableMatchingProblem {
        &self.problem
    }

    /// Runs every registered algorithm `run_count` times, in registration order.
    pub fn run(&self) -> Result<Vec<AlgorithmReport>> {
        if self.algorithms.is_empty() {
            return Err(MatchingError::Configuration(
                "No algorithm registered".to_string(),
            ));
        }
        if self.run_count == 0 {
            return Err(MatchingError::Configuration(
                "Run count cannot be zero".to_string(),
            ));
        }
        self.options.validate()?;

        let mut reports = Vec::with_capacity(self.algorithms.len() * self.run_count);
        for (position, algorithm) in self.algorithms.iter().enumerate() {
            for run_index in 0..self.run_count {
                let mut rng = match self.seed {
                    Some(seed) => RandomNumberGenerator::from_seed(
                        seed.wrapping_add((position * self.run_count + run_index) as u64),
                    ),
                    None => RandomNumberGenerator::new(),
                };
                reports.push(self.run_once(algorithm, run_index, &mut rng)?);
            }
        }

        if let Some(best) = AlgorithmReport::best(&reports) {
            info!(
                problem = self.problem.name(),
                runs = reports.len(),
                best_algorithm = %best.algorithm,
                best_fitness = best.fitness,
                "All runs finished"
            );
        }
        Ok(reports)
    }

    fn run_once(
        &self,
        algorithm: &Algorithm,
        run_index: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<AlgorithmReport> {
        let start = self.problem.random_candidate(rng);
        let launcher = EvolutionLauncher::new(algorithm.clone(), &self.problem);

        let timer = Instant::now();
        let result = launcher.evolve(&self.options, start, rng)?;
        let runtime = timer.elapsed();

        let evaluation = self.problem.evaluate(result.pheno.keys())?;
        info!(
            algorithm = %algorithm,
            run = run_index,
            fitness = evaluation.fitness,
            left_overs = evaluation.matches.left_overs().len(),
            runtime_ms = runtime.as_millis() as u64,
            "Run finished"
        );

        Ok(AlgorithmReport {
            algorithm: algorithm.name().to_string(),
            run_index,
            runtime,
            matches: evaluation.matches,
            satisfactions: evaluation.satisfactions,
            fitness: evaluation.fitness,
        })
    }
}
