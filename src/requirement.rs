//! # Requirement
//!
//! A `Requirement` is the rule an individual uses to turn a raw property value of
//! a candidate into a desirability score. Scores live roughly in `[0, 2]`, except
//! for one-sided bounds which grow without limit past the bound.
//!
//! Requirements are written in a small syntax:
//!
//! | syntax    | variant                                   |
//! |-----------|-------------------------------------------|
//! | `7`       | `TargetScale { target: 7.0 }`             |
//! | `4++`     | `OneBound { bound: 4.0, Increasing }`     |
//! | `4--`     | `OneBound { bound: 4.0, Decreasing }`     |
//! | `2:8`     | `TwoBound { lower: 2.0, upper: 8.0 }`     |
//!
//! ## Example
//!
//! ```rust
//! use stablematch::requirement::Requirement;
//!
//! let requirement: Requirement = "2:8".parse().unwrap();
//! assert_eq!(requirement.default_scaling(5.0), 2.0);
//! assert_eq!(requirement.default_scaling(8.0), 0.0);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{MatchingError, Result};

/// Upper end of the fixed property scale used by target-scale requirements.
const SCALE_MAX: f64 = 10.0;

/// Which side of a one-sided bound is favourable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundDirection {
    /// Values at or above the bound are accepted.
    Increasing,
    /// Values at or below the bound are accepted.
    Decreasing,
}

/// Discriminator of a [`Requirement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    TargetScale,
    OneBound,
    TwoBound,
}

/// A per-attribute scoring rule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    /// Bell-shaped preference around `target` on the `0..=10` scale.
    TargetScale { target: f64 },
    /// Accept one side of `bound`, rewarding distance past it.
    OneBound {
        bound: f64,
        direction: BoundDirection,
    },
    /// Accept the open interval `(lower, upper)`, peaking at its midpoint.
    TwoBound { lower: f64, upper: f64 },
}

impl Requirement {
    pub fn target_scale(target: f64) -> Self {
        Requirement::TargetScale { target }
    }

    pub fn one_bound(bound: f64, direction: BoundDirection) -> Self {
        Requirement::OneBound { bound, direction }
    }

    pub fn two_bound(lower: f64, upper: f64) -> Self {
        Requirement::TwoBound { lower, upper }
    }

    /// Scores a raw property value.
    pub fn default_scaling(&self, value: f64) -> f64 {
        match *self {
            Requirement::TargetScale { target } => {
                if !(0.0..=SCALE_MAX).contains(&value) {
                    return 0.0;
                }
                let distance = (value - target).abs();
                if distance > 7.0 {
                    0.0
                } else if distance > 5.0 {
                    1.0
                } else {
                    (SCALE_MAX - distance) / SCALE_MAX + 1.0
                }
            }
            Requirement::OneBound { bound, direction } => {
                let favourable = match direction {
                    BoundDirection::Increasing => value >= bound,
                    BoundDirection::Decreasing => value <= bound,
                };
                if !favourable {
                    0.0
                } else if bound == 0.0 {
                    2.0
                } else {
                    (bound + (value - bound).abs()) / bound
                }
            }
            Requirement::TwoBound { lower, upper } => {
                if lower == upper || value <= lower || value >= upper {
                    return 0.0;
                }
                let half_width = (upper - lower) / 2.0;
                let midpoint = lower + half_width;
                (half_width - (value - midpoint).abs()) / half_width + 1.0
            }
        }
    }

    /// The single number that stands for this requirement inside a user
    /// evaluation expression (`R<k>`).
    pub fn value_for_function(&self) -> f64 {
        match *self {
            Requirement::TargetScale { target } => target,
            Requirement::OneBound { bound, .. } => bound,
            Requirement::TwoBound { lower, upper } => (lower + upper) / 2.0,
        }
    }

    pub fn kind(&self) -> RequirementKind {
        match self {
            Requirement::TargetScale { .. } => RequirementKind::TargetScale,
            Requirement::OneBound { .. } => RequirementKind::OneBound,
            Requirement::TwoBound { .. } => RequirementKind::TwoBound,
        }
    }
}

fn parse_number(raw: &str, source: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        MatchingError::InvalidRequirement(format!("'{}' is not a number in '{}'", raw, source))
    })?;
    if !value.is_finite() {
        return Err(MatchingError::InvalidRequirement(format!(
            "'{}' must be finite",
            source
        )));
    }
    Ok(value)
}

impl FromStr for Requirement {
    type Err = MatchingError;

    fn from_str(s: &str) -> Result<Self> {
        let source = s.trim();
        if source.is_empty() {
            return Err(MatchingError::InvalidRequirement(
                "empty requirement".to_string(),
            ));
        }

        if let Some(bound) = source.strip_suffix("++") {
            return Ok(Requirement::one_bound(
                parse_number(bound, source)?,
                BoundDirection::Increasing,
            ));
        }
        if let Some(bound) = source.strip_suffix("--") {
            return Ok(Requirement::one_bound(
                parse_number(bound, source)?,
                BoundDirection::Decreasing,
            ));
        }
        if let Some((lower, upper)) = source.split_once(':') {
            let lower = parse_number(lower, source)?;
            let upper = parse_number(upper, source)?;
            if lower > upper {
                return Err(MatchingError::InvalidRequirement(format!(
                    "lower bound exceeds upper bound in '{}'",
                    source
                )));
            }
            return Ok(Requirement::two_bound(lower, upper));
        }

        Ok(Requirement::target_scale(parse_number(source, source)?))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::TargetScale { target } => write!(f, "{}", target),
            Requirement::OneBound {
                bound,
                direction: BoundDirection::Increasing,
            } => write!(f, "{}++", bound),
            Requirement::OneBound {
                bound,
                direction: BoundDirection::Decreasing,
            } => write!(f, "{}--", bound),
            Requirement::TwoBound { lower, upper } => write!(f, "{}:{}", lower, upper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_target_scale_peaks_at_target() {
        let req = Requirement::target_scale(5.0);
        assert_eq!(req.default_scaling(5.0), 2.0);
        assert!((req.default_scaling(7.0) - 1.8).abs() < 1e-12);
        assert_eq!(req.default_scaling(10.0), 1.5);
    }

    #[test]
    fn test_target_scale_plateau_and_cutoff() {
        let req = Requirement::target_scale(1.0);
        assert_eq!(req.default_scaling(7.5), 1.0);
        assert_eq!(req.default_scaling(8.0), 1.0);
        assert_eq!(req.default_scaling(8.5), 0.0);
        assert_eq!(req.default_scaling(-0.1), 0.0);
        assert_eq!(req.default_scaling(10.1), 0.0);
    }

    #[test]
    fn test_one_bound_zero_is_exactly_two() {
        let req = Requirement::one_bound(0.0, BoundDirection::Increasing);
        assert_eq!(req.default_scaling(0.0), 2.0);
        assert_eq!(req.default_scaling(-1.0), 0.0);
    }

    #[test]
    fn test_one_bound_rewards_distance() {
        let up = Requirement::one_bound(4.0, BoundDirection::Increasing);
        assert_eq!(up.default_scaling(4.0), 1.0);
        assert_eq!(up.default_scaling(6.0), 1.5);
        assert_eq!(up.default_scaling(3.9), 0.0);

        let down = Requirement::one_bound(4.0, BoundDirection::Decreasing);
        assert_eq!(down.default_scaling(2.0), 1.5);
        assert_eq!(down.default_scaling(4.1), 0.0);
    }

    #[test]
    fn test_two_bound_degenerate() {
        let req = Requirement::two_bound(3.0, 3.0);
        assert_eq!(req.default_scaling(3.0), 0.0);
    }

    #[test]
    fn test_two_bound_edges() {
        let req = Requirement::two_bound(2.0, 8.0);
        assert_eq!(req.default_scaling(5.0), 2.0);
        assert_eq!(req.default_scaling(2.0), 0.0);
        assert_eq!(req.default_scaling(8.0), 0.0);
        assert_eq!(req.default_scaling(1.0), 0.0);
        assert!((req.default_scaling(3.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_for_function() {
        assert_eq!(Requirement::target_scale(3.0).value_for_function(), 3.0);
        assert_eq!(
            Requirement::one_bound(6.0, BoundDirection::Decreasing).value_for_function(),
            6.0
        );
        assert_eq!(Requirement::two_bound(2.0, 8.0).value_for_function(), 5.0);
    }

    #[test]
    fn test_parse_all_forms() {
        assert_eq!(
            "7".parse::<Requirement>().unwrap(),
            Requirement::target_scale(7.0)
        );
        assert_eq!(
            " 4.5++ ".parse::<Requirement>().unwrap(),
            Requirement::one_bound(4.5, BoundDirection::Increasing)
        );
        assert_eq!(
            "-2--".parse::<Requirement>().unwrap(),
            Requirement::one_bound(-2.0, BoundDirection::Decreasing)
        );
        assert_eq!(
            "1: 9".parse::<Requirement>().unwrap(),
            Requirement::two_bound(1.0, 9.0)
        );
        assert_eq!(
            "3:3".parse::<Requirement>().unwrap().kind(),
            RequirementKind::TwoBound
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "abc", "3+", "9:1", "1:x", "inf"] {
            match raw.parse::<Requirement>() {
                Err(MatchingError::InvalidRequirement(_)) => {}
                other => panic!("Expected InvalidRequirement for '{}', got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_display_parses_back() {
        let req = Requirement::one_bound(2.5, BoundDirection::Decreasing);
        assert_eq!(req.to_string().parse::<Requirement>().unwrap(), req);
    }

    proptest! {
        #[test]
        fn prop_two_bound_peak_and_monotone(
            lower in -50.0f64..50.0,
            width in 0.01f64..40.0,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let upper = lower + width;
            let req = Requirement::two_bound(lower, upper);
            let mid = lower + width / 2.0;
            prop_assert!((req.default_scaling(mid) - 2.0).abs() < 1e-9);
            prop_assert_eq!(req.default_scaling(lower), 0.0);
            prop_assert_eq!(req.default_scaling(upper), 0.0);
            prop_assert_eq!(req.default_scaling(upper + width), 0.0);

            // Two points on the same side of the midpoint: the farther one never scores higher.
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let half = width / 2.0;
            let near_score = req.default_scaling(mid + near * half);
            let far_score = req.default_scaling(mid + far * half);
            prop_assert!(far_score <= near_score + 1e-12);
        }

        #[test]
        fn prop_target_scale_in_range(target in 0.0f64..10.0, value in -5.0f64..15.0) {
            let score = Requirement::target_scale(target).default_scaling(value);
            prop_assert!((0.0..=2.0).contains(&score));
        }
    }
}
