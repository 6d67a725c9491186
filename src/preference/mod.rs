//! # Preferences
//!
//! Every individual ranks the members of the other set(s) once, when the
//! problem is built. The decode routines then only ever read these rankings.
//!
//! - [`PreferenceList`] is one owner's view: a score per candidate (unknown
//!   candidates score `0.0`) and the ranking derived from it.
//! - [`PreferenceListWrapper`] holds the list of every individual and answers
//!   the questions a decode asks: who a full holder would drop, and whether a
//!   judge prefers one individual to another.
//! - [`EvaluationFunction`] decides how the owners of a set score candidates.
//!
//! Rankings are deterministic: higher score first, lower id first on equal
//! scores.

mod evaluation;
mod list;
mod wrapper;

pub use evaluation::EvaluationFunction;
pub use list::{PreferenceList, RankedScores};
pub use wrapper::PreferenceListWrapper;
