//! # Fitness expressions
//!
//! A fitness expression aggregates the per-individual satisfaction vector into
//! one number. On top of plain arithmetic it understands three tokens:
//!
//! - `SIGMA{expr}`: evaluates `expr` once per member of the set named by the
//!   single set variable `S<d>` inside it, with `S<d>` bound to that member's
//!   satisfaction, and sums the results;
//! - `S(<d>)`: the summed satisfaction of set `<d>`;
//! - `M<n>`: the satisfaction at 1-based position `<n>`.
//!
//! Sets are numbered from 1. Evaluation is a two-phase pipeline: [`expand`]
//! rewrites the tokens into numbers, producing a plain arithmetic string, and
//! the result is handed to [`expr::evaluate`](crate::expr::evaluate).
//!
//! ```rust
//! use stablematch::fitness::{FitnessFunction, Satisfactions};
//!
//! let satisfactions = Satisfactions::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0, 0, 0, 0, 0], 2);
//! let fitness = FitnessFunction::expression("SIGMA{S1} + SIGMA{S2}");
//! assert_eq!(fitness.evaluate(&satisfactions).unwrap(), 15.0);
//! ```

use crate::error::{ExpressionError, Result};
use crate::expr;

const SIGMA_OPEN: &str = "SIGMA{";

/// Satisfaction values together with the set each value belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Satisfactions<'a> {
    values: &'a [f64],
    set_of: &'a [usize],
    set_count: usize,
}

impl<'a> Satisfactions<'a> {
    /// `values[i]` belongs to the 0-based set `set_of[i]`; `set_count` counts
    /// sets even when some of them hold no value.
    pub fn new(values: &'a [f64], set_of: &'a [usize], set_count: usize) -> Self {
        Self {
            values,
            set_of,
            set_count,
        }
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Satisfactions of the 1-based set `set`, in individual order.
    fn of_set(&self, set: usize) -> std::result::Result<Vec<f64>, ExpressionError> {
        if set == 0 || set > self.set_count {
            return Err(ExpressionError::UnknownSet {
                set,
                set_count: self.set_count,
            });
        }
        Ok(self
            .values
            .iter()
            .zip(self.set_of)
            .filter(|(_, &s)| s + 1 == set)
            .map(|(&v, _)| v)
            .collect())
    }
}

/// How a satisfaction vector is turned into a fitness value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FitnessFunction {
    /// Sum of every satisfaction.
    #[default]
    Default,
    /// A user expression in the fitness dialect.
    Expression(String),
}

impl FitnessFunction {
    /// An expression fitness; blank strings fall back to [`FitnessFunction::Default`].
    pub fn expression(source: impl Into<String>) -> Self {
        let source = source.into();
        if source.trim().is_empty() {
            FitnessFunction::Default
        } else {
            FitnessFunction::Expression(source)
        }
    }

    pub fn evaluate(&self, satisfactions: &Satisfactions<'_>) -> Result<f64> {
        match self {
            FitnessFunction::Default => Ok(default_fitness_evaluation(satisfactions.values())),
            FitnessFunction::Expression(source) => {
                let plain = expand(source, satisfactions)?;
                Ok(expr::evaluate(&plain)?)
            }
        }
    }
}

/// Sums the satisfaction vector.
pub fn default_fitness_evaluation(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Rewrites every dialect token of `source` into a number.
pub fn expand(
    source: &str,
    satisfactions: &Satisfactions<'_>,
) -> std::result::Result<String, ExpressionError> {
    expand_with(source, satisfactions, None)
}

/// A set variable `S<set>` bound to `value` while expanding a `SIGMA` body.
#[derive(Debug, Clone, Copy)]
struct Binding {
    set: usize,
    value: f64,
}

fn expand_with(
    source: &str,
    satisfactions: &Satisfactions<'_>,
    binding: Option<Binding>,
) -> std::result::Result<String, ExpressionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            'S' if starts_with(&chars, i, SIGMA_OPEN) => {
                let body_start = i + SIGMA_OPEN.len();
                let body_end = matching_brace(&chars, body_start)
                    .ok_or(ExpressionError::UnbalancedBraces { position: i })?;
                let body: String = chars[body_start..body_end].iter().collect();
                let body = match binding {
                    Some(b) => substitute(&body, b),
                    None => body,
                };
                out.push_str(&format_number(sigma(&body, satisfactions)?));
                i = body_end + 1;
            }
            'S' if chars.get(i + 1) == Some(&'(')
                && chars.get(i + 2).is_some_and(char::is_ascii_digit)
                && chars.get(i + 3) == Some(&')') =>
            {
                let set = digit_at(&chars, i + 2);
                let sum: f64 = satisfactions.of_set(set)?.iter().sum();
                out.push_str(&format_number(sum));
                i += 4;
            }
            'S' if binding.is_some_and(|b| set_variable_at(&chars, i) == Some(b.set)) => {
                if let Some(b) = binding {
                    out.push_str(&format_number(b.value));
                }
                i += 2;
            }
            'M' => {
                let digits: String = chars[i + 1..]
                    .iter()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                if digits.is_empty() {
                    return Err(ExpressionError::MissingPosition { position: i });
                }
                let len = satisfactions.values().len();
                let position = digits.parse::<usize>().unwrap_or(usize::MAX);
                if position == 0 || position > len {
                    return Err(ExpressionError::PositionOutOfRange { position, len });
                }
                out.push_str(&format_number(satisfactions.values()[position - 1]));
                i += 1 + digits.len();
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn sigma(
    body: &str,
    satisfactions: &Satisfactions<'_>,
) -> std::result::Result<f64, ExpressionError> {
    let set = detect_set_variable(body)?;
    let mut total = 0.0;
    for value in satisfactions.of_set(set)? {
        let plain = expand_with(body, satisfactions, Some(Binding { set, value }))?;
        total += expr::evaluate(&plain)?;
    }
    Ok(total)
}

/// Replaces the bound set variable everywhere in `body`, nested bodies included.
fn substitute(body: &str, binding: Binding) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        if set_variable_at(&chars, i) == Some(binding.set) {
            out.push_str(&format_number(binding.value));
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Finds the single set variable `S<d>` a `SIGMA` body iterates over.
/// Variables inside nested `SIGMA` bodies belong to those bodies.
fn detect_set_variable(body: &str) -> std::result::Result<usize, ExpressionError> {
    let chars: Vec<char> = body.chars().collect();
    let mut found: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        if starts_with(&chars, i, SIGMA_OPEN) {
            let nested_start = i + SIGMA_OPEN.len();
            i = matching_brace(&chars, nested_start).map_or(chars.len(), |end| end + 1);
            continue;
        }
        if let Some(set) = set_variable_at(&chars, i) {
            match found {
                Some(existing) if existing != set => {
                    return Err(ExpressionError::AmbiguousSetVariable {
                        inner: body.to_string(),
                    })
                }
                _ => found = Some(set),
            }
            i += 2;
            continue;
        }
        i += 1;
    }

    found.ok_or_else(|| ExpressionError::MissingSetVariable {
        inner: body.to_string(),
    })
}

/// `S<d>` at `i`, not part of a longer name or number.
fn set_variable_at(chars: &[char], i: usize) -> Option<usize> {
    if chars.get(i) != Some(&'S') {
        return None;
    }
    if i > 0 && chars[i - 1].is_alphanumeric() {
        return None;
    }
    if !chars.get(i + 1).is_some_and(char::is_ascii_digit) {
        return None;
    }
    if chars.get(i + 2).is_some_and(char::is_ascii_alphanumeric) {
        return None;
    }
    Some(digit_at(chars, i + 1))
}

fn digit_at(chars: &[char], i: usize) -> usize {
    chars[i].to_digit(10).map_or(0, |d| d as usize)
}

fn starts_with(chars: &[char], i: usize, pattern: &str) -> bool {
    let mut idx = i;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

/// Index of the `}` closing a body that starts at `start` (just past its `{`).
fn matching_brace(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Plain decimal notation, parenthesised when negative.
fn format_number(value: f64) -> String {
    if value < 0.0 {
        format!("({})", value)
    } else {
        format!("{}", value)
    }
}
