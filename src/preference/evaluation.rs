use crate::data::MatchingData;
use crate::error::{MatchingError, Result};
use crate::expr::Expr;

/// How the owners of one set score their candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EvaluationFunction {
    /// Weighted sum of the owner's requirement scaling over each candidate property.
    #[default]
    Default,
    /// A compiled expression over `P<k>`, `W<k>` and `R<k>`.
    Expression(Expr),
}

impl EvaluationFunction {
    /// Compiles `source`, checking every variable against `property_count`.
    /// A blank string selects [`EvaluationFunction::Default`].
    pub fn compile(source: &str, property_count: usize) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(EvaluationFunction::Default);
        }

        let expr = Expr::parse(source)?;
        for name in expr.variables() {
            if parse_variable(&name, property_count).is_none() {
                return Err(MatchingError::Configuration(format!(
                    "Evaluation function '{}' references unknown variable '{}' (expected P, W or R followed by 1..={})",
                    source, name, property_count
                )));
            }
        }
        Ok(EvaluationFunction::Expression(expr))
    }

    /// Score `owner` assigns to `candidate`.
    pub fn score(&self, data: &MatchingData, owner: usize, candidate: usize) -> Result<f64> {
        let score = match self {
            EvaluationFunction::Default => (0..data.property_count())
                .map(|k| {
                    data.requirement(owner, k)
                        .default_scaling(data.property(candidate, k))
                        * data.weight(owner, k)
                })
                .sum(),
            EvaluationFunction::Expression(expr) => expr.eval_with(|name| {
                let (kind, k) = parse_variable(name, data.property_count())?;
                Some(match kind {
                    Variable::Property => data.property(candidate, k),
                    Variable::Weight => data.weight(owner, k),
                    Variable::Requirement => data.requirement(owner, k).value_for_function(),
                })
            })?,
        };

        if !score.is_finite() {
            return Err(MatchingError::InvalidNumericValue(format!(
                "Score of candidate {} for individual {} is {}",
                candidate, owner, score
            )));
        }
        Ok(score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variable {
    Property,
    Weight,
    Requirement,
}

/// Splits `P3` into `(Property, 2)`. Indices are 1-based in the source.
fn parse_variable(name: &str, property_count: usize) -> Option<(Variable, usize)> {
    let mut chars = name.chars();
    let kind = match chars.next()? {
        'P' => Variable::Property,
        'W' => Variable::Weight,
        'R' => Variable::Requirement,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    (1..=property_count)
        .contains(&index)
        .then_some((kind, index - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    fn data() -> MatchingData {
        MatchingData::builder()
            .set_indices(vec![0, 1])
            .capacities(vec![1, 1])
            .properties(vec![vec![4.0, 1.0], vec![6.0, 3.0]])
            .weights(vec![vec![2.0, 1.0], vec![1.0, 1.0]])
            .requirements(vec![
                vec![Requirement::target_scale(6.0), Requirement::two_bound(0.0, 4.0)],
                vec![Requirement::target_scale(4.0), Requirement::target_scale(1.0)],
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn test_blank_is_default() {
        assert_eq!(
            EvaluationFunction::compile("  ", 2).unwrap(),
            EvaluationFunction::Default
        );
    }

    #[test]
    fn test_default_weighted_sum() {
        let data = data();
        // target 6 vs 6 → 2.0 * w 2.0; two-bound 0:4 at 3 → 1.5 * w 1.0
        let score = EvaluationFunction::Default.score(&data, 0, 1).unwrap();
        assert!((score - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_expression_variables() {
        let data = data();
        let function = EvaluationFunction::compile("P1 * W1 + R2", 2).unwrap();
        // P1 of 1 = 6, W1 of 0 = 2, R2 of 0 = midpoint 2
        assert_eq!(function.score(&data, 0, 1).unwrap(), 14.0);
    }

    #[test]
    fn test_rejects_unknown_variables() {
        for source in ["P3", "P0", "X1", "P", "Pa", "S1 + 1"] {
            assert!(
                matches!(
                    EvaluationFunction::compile(source, 2),
                    Err(MatchingError::Configuration(_))
                ),
                "{} should be rejected",
                source
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_score() {
        let data = data();
        let function = EvaluationFunction::compile("P1 / 0", 2).unwrap();
        assert!(matches!(
            function.score(&data, 0, 1),
            Err(MatchingError::InvalidNumericValue(_))
        ));
    }

    #[test]
    fn test_syntax_error_is_expression_error() {
        assert!(matches!(
            EvaluationFunction::compile("P1 +", 2),
            Err(MatchingError::Expression(_))
        ));
    }
}
