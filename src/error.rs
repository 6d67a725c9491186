//! # Error Types
//!
//! This module defines the error types for the stable matching library.
//! Errors fall into three groups:
//!
//! - **configuration errors** (malformed requirement syntax, ragged input
//!   arrays, evaluation functions referencing unknown variables) are raised
//!   while a [`MatchingData`](crate::data::MatchingData) or a
//!   [`StableMatchingProblem`](crate::problem::StableMatchingProblem) is built;
//! - **expression errors** ([`ExpressionError`]) fail the single evaluation
//!   that hit them;
//! - **degenerate data** ([`MatchingError::DegenerateWeights`]) is reported
//!   separately so callers can tell bad input from a bad expression.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use stablematch::error::{MatchingError, Result};
//!
//! fn check_capacity(capacity: usize) -> Result<usize> {
//!     if capacity == 0 {
//!         return Err(MatchingError::Configuration(
//!             "Capacity must be at least 1".to_string(),
//!         ));
//!     }
//!     Ok(capacity)
//! }
//!
//! assert!(check_capacity(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use stablematch::error::{MatchingError, OptionExt};
//!
//! fn best_fitness(values: &[f64]) -> stablematch::error::Result<f64> {
//!     values
//!         .iter()
//!         .cloned()
//!         .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
//!         .ok_or_else_matching(|| MatchingError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_fitness(&[1.0, 3.0, 2.0]).unwrap(), 3.0);
//! ```

use thiserror::Error;

/// Represents errors that can occur while building or evaluating a matching problem.
#[derive(Error, Debug)]
pub enum MatchingError {
    /// Invalid problem configuration: ragged arrays, bad set indices, bad
    /// capacities or an evaluation function that cannot be used.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A requirement string could not be decoded.
    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    /// Every weight of an individual is zero, so no candidate can ever be preferred.
    #[error("Degenerate data: all weights of individual {individual} are zero")]
    DegenerateWeights { individual: usize },

    /// A fitness or evaluation expression could not be expanded or evaluated.
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// A candidate vector does not fit the problem it was handed to.
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// NaN or infinity where a finite number is required.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// The fitness of a candidate could not be computed.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// A breeding operation failed.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// The evolution loop failed.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// An operation required a non-empty population.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

}

/// Errors raised by the fitness dialect expander and the arithmetic evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("unbalanced braces in SIGMA starting at position {position}")]
    UnbalancedBraces { position: usize },

    #[error("expected digits after 'M' at position {position}")]
    MissingPosition { position: usize },

    #[error("position M{position} is out of range for {len} satisfaction values")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("SIGMA{{{inner}}} does not reference a set variable")]
    MissingSetVariable { inner: String },

    #[error("SIGMA{{{inner}}} references more than one set variable")]
    AmbiguousSetVariable { inner: String },

    #[error("set {set} does not exist (problem has {set_count} sets)")]
    UnknownSet { set: usize, set_count: usize },

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unexpected token '{token}'")]
    UnexpectedToken { token: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    WrongArity {
        function: String,
        expected: usize,
        found: usize,
    },
}

/// A specialized Result type for matching operations.
pub type Result<T> = std::result::Result<T, MatchingError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, MatchingError>` using `err_fn`
    /// to build the error.
    fn ok_or_else_matching<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> MatchingError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_matching<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> MatchingError,
    {
        self.ok_or_else(err_fn)
    }
}
