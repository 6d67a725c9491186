//! # stablematch
//!
//! Generalized stable matching (one-to-one, one-to-many, many-to-many and
//! three-set triplets) scored for an evolutionary search.
//!
//! A problem is described by [`MatchingData`]. Every individual ranks the
//! members of the other set(s) once, through its [`Requirement`]s and weights
//! or a per-set evaluation expression. A candidate is a vector of random keys;
//! decoding it runs deferred acceptance in the order the keys give, and the
//! resulting [`Matches`] are scored by a [`FitnessFunction`].
//!
//! ```rust
//! use stablematch::prelude::*;
//!
//! let data = MatchingData::builder()
//!     .set_indices(vec![0, 0, 1, 1])
//!     .capacities(vec![1; 4])
//!     .properties(vec![vec![2.0], vec![6.0], vec![5.0], vec![9.0]])
//!     .weights(vec![vec![1.0]; 4])
//!     .requirement_strings(&[vec!["7"], vec!["5++"], vec!["4:8"], vec!["9--"]])
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let problem = StableMatchingProblem::builder(data)
//!     .fitness_expression("SIGMA{S1 * 2} + S(2)")
//!     .build()
//!     .unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(3);
//! let launcher = EvolutionLauncher::new(OrdinaryStrategy::new(), &problem);
//! let options = EvolutionOptions::builder().num_generations(10).build();
//! let best = launcher
//!     .evolve(&options, problem.random_candidate(&mut rng), &mut rng)
//!     .unwrap();
//!
//! let evaluation = problem.evaluate(best.pheno.keys()).unwrap();
//! assert_eq!(evaluation.fitness, best.score);
//! ```

pub mod data;
pub mod error;
pub mod evolution;
pub mod expr;
pub mod fitness;
pub mod matches;
pub mod matching;
pub mod phenotype;
pub mod preference;
pub mod problem;
pub mod requirement;
pub mod rng;
pub mod runner;
pub mod strategy;

pub use data::{MatchingData, MatchingInput};
pub use error::{ExpressionError, MatchingError, OptionExt, Result};
pub use fitness::FitnessFunction;
pub use matches::Matches;
pub use matching::MatchingVariant;
pub use problem::{Evaluation, StableMatchingProblem};
pub use requirement::Requirement;

pub mod prelude {
    pub use crate::data::{MatchingData, MatchingInput};
    pub use crate::error::{MatchingError, Result};
    pub use crate::evolution::{Challenge, EvolutionLauncher, EvolutionOptions, LogLevel};
    pub use crate::fitness::FitnessFunction;
    pub use crate::matches::Matches;
    pub use crate::matching::MatchingVariant;
    pub use crate::phenotype::{Bounded, CandidateKeys, Phenotype};
    pub use crate::preference::{EvaluationFunction, PreferenceList, PreferenceListWrapper};
    pub use crate::problem::{Evaluation, StableMatchingProblem};
    pub use crate::requirement::{BoundDirection, Requirement};
    pub use crate::rng::RandomNumberGenerator;
    pub use crate::runner::{Algorithm, AlgorithmReport, MatchingRunner};
    pub use crate::strategy::{BoundedBreedStrategy, BreedStrategy, OrdinaryStrategy};
}
