//! # StableMatchingProblem
//!
//! The facade an optimizer talks to. A problem bundles validated
//! [`MatchingData`], the matching variant, the preference lists built from the
//! per-set evaluation functions, and the fitness function. It is immutable
//! once built, so one problem can score any number of candidates
//! concurrently.
//!
//! Each evaluation runs `decode → satisfactions → fitness` on state it owns.
//!
//! ## Example
//!
//! ```rust
//! use stablematch::data::MatchingData;
//! use stablematch::matching::MatchingVariant;
//! use stablematch::problem::StableMatchingProblem;
//! use stablematch::requirement::Requirement;
//!
//! let data = MatchingData::builder()
//!     .set_indices(vec![0, 0, 1, 1])
//!     .capacities(vec![1, 1, 1, 1])
//!     .properties(vec![vec![3.0], vec![8.0], vec![4.0], vec![7.0]])
//!     .weights(vec![vec![1.0]; 4])
//!     .requirements(vec![vec![Requirement::target_scale(8.0)]; 4])
//!     .build()
//!     .unwrap();
//!
//! let problem = StableMatchingProblem::builder(data)
//!     .variant(MatchingVariant::OneToOne)
//!     .fitness_expression("SIGMA{S1} + 2 * S(2)")
//!     .build()
//!     .unwrap();
//!
//! let evaluation = problem.evaluate(&[0.1, 0.2, 0.3, 0.4]).unwrap();
//! assert_eq!(evaluation.matches.pairs(), vec![(0, 2), (1, 3)]);
//! assert!(evaluation.fitness > 0.0);
//! ```

use tracing::debug;

use crate::{
    data::MatchingData,
    error::{MatchingError, Result},
    evolution::Challenge,
    fitness::{FitnessFunction, Satisfactions},
    matches::Matches,
    matching::MatchingVariant,
    phenotype::CandidateKeys,
    preference::{EvaluationFunction, PreferenceListWrapper},
    rng::RandomNumberGenerator,
};

/// Everything one evaluation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matches: Matches,
    pub satisfactions: Vec<f64>,
    pub fitness: f64,
}

/// A built, immutable matching problem.
#[derive(Debug, Clone)]
pub struct StableMatchingProblem {
    name: String,
    data: MatchingData,
    variant: MatchingVariant,
    preferences: PreferenceListWrapper,
    fitness: FitnessFunction,
}

impl StableMatchingProblem {
    pub fn builder(data: MatchingData) -> StableMatchingProblemBuilder {
        StableMatchingProblemBuilder::new(data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &MatchingData {
        &self.data
    }

    pub fn variant(&self) -> MatchingVariant {
        self.variant
    }

    pub fn preferences(&self) -> &PreferenceListWrapper {
        &self.preferences
    }

    pub fn fitness_function(&self) -> &FitnessFunction {
        &self.fitness
    }

    /// Decodes a random-key candidate into a matching.
    pub fn decode(&self, keys: &[f64]) -> Result<Matches> {
        self.variant.decode(&self.data, &self.preferences, keys)
    }

    /// Per individual, the summed score of its partners in its own preference list.
    pub fn satisfactions(&self, matches: &Matches) -> Vec<f64> {
        self.preferences.get_matches_satisfactions(matches)
    }

    /// Aggregates a satisfaction vector with the problem's fitness function.
    pub fn fitness(&self, satisfactions: &[f64]) -> Result<f64> {
        let view = Satisfactions::new(
            satisfactions,
            self.data.set_indices(),
            self.data.set_count(),
        );
        let fitness = self.fitness.evaluate(&view)?;
        if !fitness.is_finite() {
            return Err(MatchingError::FitnessCalculation(format!(
                "Fitness evaluated to {}",
                fitness
            )));
        }
        Ok(fitness)
    }

    pub fn evaluate(&self, keys: &[f64]) -> Result<Evaluation> {
        let matches = self.decode(keys)?;
        let satisfactions = self.satisfactions(&matches);
        let fitness = self.fitness(&satisfactions)?;
        Ok(Evaluation {
            matches,
            satisfactions,
            fitness,
        })
    }

    /// The objective vector of a candidate. There is a single objective, the fitness.
    pub fn objectives(&self, keys: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![self.evaluate(keys)?.fitness])
    }

    /// One key per individual.
    pub fn num_variables(&self) -> usize {
        self.data.size()
    }

    pub fn num_objectives(&self) -> usize {
        1
    }

    /// `[0, 1)` for every key.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.num_variables()]
    }

    /// A uniformly random candidate for this problem.
    pub fn random_candidate(&self, rng: &mut RandomNumberGenerator) -> CandidateKeys {
        CandidateKeys::random(self.num_variables(), rng)
    }
}

impl Challenge<CandidateKeys> for StableMatchingProblem {
    fn score(&self, phenotype: &CandidateKeys) -> Result<f64> {
        Ok(self.evaluate(phenotype.keys())?.fitness)
    }
}

/// Builder for [`StableMatchingProblem`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct StableMatchingProblemBuilder {
    data: MatchingData,
    name: Option<String>,
    variant: Option<MatchingVariant>,
    fitness: FitnessFunction,
    evaluation_functions: Vec<String>,
}

impl StableMatchingProblemBuilder {
    pub fn new(data: MatchingData) -> Self {
        Self {
            data,
            name: None,
            variant: None,
            fitness: FitnessFunction::Default,
            evaluation_functions: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Without an explicit variant, [`MatchingVariant::infer`] picks one from the data.
    pub fn variant(mut self, variant: MatchingVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// A fitness expression; a blank string keeps the default sum.
    pub fn fitness_expression(mut self, source: impl Into<String>) -> Self {
        self.fitness = FitnessFunction::expression(source);
        self
    }

    pub fn fitness(mut self, fitness: FitnessFunction) -> Self {
        self.fitness = fitness;
        self
    }

    /// One evaluation function per set, in set order. Blank entries, and sets
    /// beyond the end of `functions`, use the default weighted sum.
    pub fn evaluation_functions<S: Into<String>>(mut self, functions: Vec<S>) -> Self {
        self.evaluation_functions = functions.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<StableMatchingProblem> {
        let data = self.data;
        let variant = self
            .variant
            .unwrap_or_else(|| MatchingVariant::infer(&data));
        variant.validate(&data)?;

        if self.evaluation_functions.len() > data.set_count() {
            return Err(MatchingError::Configuration(format!(
                "Expected at most {} evaluation functions, found {}",
                data.set_count(),
                self.evaluation_functions.len()
            )));
        }
        let functions = (0..data.set_count())
            .map(|set| {
                let source = self
                    .evaluation_functions
                    .get(set)
                    .map_or("", String::as_str);
                EvaluationFunction::compile(source, data.property_count())
            })
            .collect::<Result<Vec<_>>>()?;

        // Surface syntax and set-range errors now instead of on the first candidate.
        let zeros = vec![0.0; data.size()];
        let dry_run = Satisfactions::new(&zeros, data.set_indices(), data.set_count());
        self.fitness.evaluate(&dry_run)?;

        let preferences = PreferenceListWrapper::build(&data, &functions)?;
        let name = self
            .name
            .unwrap_or_else(|| format!("{} matching of {} individuals", variant, data.size()));

        debug!(
            name = %name,
            variant = %variant,
            individuals = data.size(),
            sets = data.set_count(),
            properties = data.property_count(),
            excluded_pairs = data.excluded_pairs().len(),
            "Built stable matching problem"
        );

        Ok(StableMatchingProblem {
            name,
            data,
            variant,
            preferences,
            fitness: self.fitness,
        })
    }
}
