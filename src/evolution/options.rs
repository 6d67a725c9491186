//! # EvolutionOptions
//!
//! Configuration of one evolution run: how many generations to breed, how
//! many parents survive each generation, how many offspring they produce,
//! from which generation size on scoring runs in parallel, and how much of
//! the progress is logged.
//!
//! ## Example
//!
//! ```rust
//! use stablematch::evolution::options::{EvolutionOptions, LogLevel};
//!
//! let custom = EvolutionOptions::new(200, LogLevel::Minimal, 10, 50);
//! assert_eq!(custom.get_num_offspring(), 50);
//!
//! let defaults = EvolutionOptions::default();
//! assert_eq!(defaults.get_parallel_threshold(), 1000);
//! ```

use crate::error::{MatchingError, Result};

const DEFAULT_GENERATIONS: usize = 100;
const DEFAULT_POPULATION: usize = 2;
const DEFAULT_OFFSPRING: usize = 20;
const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// How much of an evolution run is reported through `tracing`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Every scored candidate of every generation, at `debug`.
    Verbose,
    /// One line per generation with the best score, at `debug`.
    Minimal,
    #[default]
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    num_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    num_offsprings: usize,
    /// Generation size from which candidates are bred and scored in parallel.
    parallel_threshold: usize,
}

impl EvolutionOptions {
    pub fn new(
        num_generations: usize,
        log_level: LogLevel,
        population_size: usize,
        num_offsprings: usize,
    ) -> Self {
        Self::new_with_threshold(
            num_generations,
            log_level,
            population_size,
            num_offsprings,
            DEFAULT_PARALLEL_THRESHOLD,
        )
    }

    pub fn new_with_threshold(
        num_generations: usize,
        log_level: LogLevel,
        population_size: usize,
        num_offsprings: usize,
        parallel_threshold: usize,
    ) -> Self {
        Self {
            num_generations,
            log_level,
            population_size,
            num_offsprings,
            parallel_threshold,
        }
    }

    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }

    /// Rejects options no evolution can run with.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(MatchingError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.num_offsprings == 0 {
            return Err(MatchingError::Configuration(
                "Number of offspring cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_offspring(&self) -> usize {
        self.num_offsprings
    }

    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_num_offspring(&mut self, num_offsprings: usize) {
        self.num_offsprings = num_offsprings;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self::new(
            DEFAULT_GENERATIONS,
            LogLevel::None,
            DEFAULT_POPULATION,
            DEFAULT_OFFSPRING,
        )
    }
}

/// Fluent builder for [`EvolutionOptions`]; unset fields take the defaults.
///
/// ```rust
/// use stablematch::evolution::options::{EvolutionOptions, LogLevel};
///
/// let options = EvolutionOptions::builder()
///     .num_generations(50)
///     .log_level(LogLevel::Minimal)
///     .population_size(8)
///     .num_offspring(40)
///     .parallel_threshold(500)
///     .build();
/// assert_eq!(options.get_population_size(), 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    num_offsprings: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl EvolutionOptionsBuilder {
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn num_offspring(mut self, value: usize) -> Self {
        self.num_offsprings = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn build(self) -> EvolutionOptions {
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(DEFAULT_GENERATIONS),
            log_level: self.log_level.unwrap_or_default(),
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION),
            num_offsprings: self.num_offsprings.unwrap_or(DEFAULT_OFFSPRING),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        assert_eq!(EvolutionOptions::builder().build(), EvolutionOptions::default());
    }

    #[test]
    fn test_validate() {
        assert!(EvolutionOptions::default().validate().is_ok());
        assert!(matches!(
            EvolutionOptions::new(10, LogLevel::None, 0, 5).validate(),
            Err(MatchingError::Configuration(msg)) if msg.contains("Population size")
        ));
        assert!(matches!(
            EvolutionOptions::new(10, LogLevel::None, 2, 0).validate(),
            Err(MatchingError::Configuration(msg)) if msg.contains("offspring")
        ));
    }

    #[test]
    fn test_setters() {
        let mut options = EvolutionOptions::default();
        options.set_num_generations(7);
        options.set_log_level(LogLevel::Verbose);
        options.set_population_size(3);
        options.set_num_offspring(9);
        options.set_parallel_threshold(4);
        assert_eq!(
            options,
            EvolutionOptions::new_with_threshold(7, LogLevel::Verbose, 3, 9, 4)
        );
    }
}
