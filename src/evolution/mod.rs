//! # Evolution
//!
//! The generational driver that searches candidate keys for a matching with
//! high fitness: breed offspring from the current parents, score them, keep
//! the best as the next parents.

pub mod challenge;
pub mod launcher;
pub mod options;

pub use challenge::Challenge;
pub use launcher::{EvolutionLauncher, EvolutionResult};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel};
