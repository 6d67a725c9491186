//! # Stable Matching Decode
//!
//! Turns a random-key candidate into a [`Matches`]. The keys only decide the
//! order in which individuals start proposing: individuals are sorted by
//! ascending key, ties by ascending id. Everything after that is fixed by
//! the preference lists, so the same keys always decode to the same matching.
//!
//! Two routines cover the supported variants:
//!
//! - two sets ([`MatchingVariant::OneToOne`], [`MatchingVariant::OneToMany`],
//!   [`MatchingVariant::ManyToMany`]) run capacitated deferred acceptance;
//! - three sets ([`MatchingVariant::Triplet`]) grow one-member-per-set groups.
//!
//! Individuals left without a partner are a normal outcome, not an error.

mod triplet;
mod two_set;

use std::fmt;

use tracing::debug;

use crate::data::MatchingData;
use crate::error::{MatchingError, Result};
use crate::matches::Matches;
use crate::preference::PreferenceListWrapper;

/// The shape of matching a problem asks for.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchingVariant {
    /// Two sets, every individual holds at most one partner.
    OneToOne,
    /// Two sets; members of the first set may hold several partners,
    /// members of the second set at most one.
    OneToMany,
    /// Two sets, capacities are free on both sides.
    ManyToMany,
    /// Three sets, individuals form groups with one member of each set.
    ///
    /// Capacity counts groups: every individual needs capacity 1 and joins at
    /// most one group, where it holds the other two members as partners.
    Triplet,
}

impl MatchingVariant {
    pub fn set_count(self) -> usize {
        match self {
            MatchingVariant::Triplet => 3,
            _ => 2,
        }
    }

    /// The narrowest variant `data` fits: three sets make a triplet problem,
    /// otherwise the capacities decide.
    pub fn infer(data: &MatchingData) -> Self {
        let single = |individual: &usize| data.capacity_of(*individual) == 1;
        if data.set_count() == 3 {
            MatchingVariant::Triplet
        } else if data.members_of(0).iter().all(single) && data.members_of(1).iter().all(single) {
            MatchingVariant::OneToOne
        } else if data.members_of(1).iter().all(single) {
            MatchingVariant::OneToMany
        } else {
            MatchingVariant::ManyToMany
        }
    }

    /// Checks that `data` has the set count and capacities this variant needs.
    pub fn validate(self, data: &MatchingData) -> Result<()> {
        if data.set_count() != self.set_count() {
            return Err(MatchingError::Configuration(format!(
                "{} matching needs {} sets, found {}",
                self,
                self.set_count(),
                data.set_count()
            )));
        }

        match self {
            MatchingVariant::OneToOne | MatchingVariant::Triplet => {
                self.require_single_capacity(data, 0..data.size())
            }
            MatchingVariant::OneToMany => {
                self.require_single_capacity(data, data.members_of(1).iter().copied())
            }
            MatchingVariant::ManyToMany => Ok(()),
        }
    }

    fn require_single_capacity(
        self,
        data: &MatchingData,
        mut individuals: impl Iterator<Item = usize>,
    ) -> Result<()> {
        match individuals.find(|&i| data.capacity_of(i) != 1) {
            Some(individual) => Err(MatchingError::Configuration(format!(
                "{} matching needs capacity 1, individual {} has {}",
                self,
                individual,
                data.capacity_of(individual)
            ))),
            None => Ok(()),
        }
    }

    /// Decodes `keys` into a matching. `data` must have passed [`validate`](Self::validate).
    pub fn decode(
        self,
        data: &MatchingData,
        preferences: &PreferenceListWrapper,
        keys: &[f64],
    ) -> Result<Matches> {
        let order = decode_order(keys, data.size())?;
        let matches = match self {
            MatchingVariant::Triplet => triplet::decode(data, preferences, &order),
            _ => two_set::decode(data, preferences, &order),
        };

        let left_overs = matches.left_overs();
        if !left_overs.is_empty() {
            debug!(variant = %self, ?left_overs, "Individuals left unmatched");
        }
        Ok(matches)
    }
}

impl fmt::Display for MatchingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchingVariant::OneToOne => "one-to-one",
            MatchingVariant::OneToMany => "one-to-many",
            MatchingVariant::ManyToMany => "many-to-many",
            MatchingVariant::Triplet => "triplet",
        };
        f.write_str(name)
    }
}

/// Individuals sorted by ascending key, ties by ascending id.
pub fn decode_order(keys: &[f64], size: usize) -> Result<Vec<usize>> {
    if keys.len() != size {
        return Err(MatchingError::InvalidCandidate(format!(
            "Expected {} keys, found {}",
            size,
            keys.len()
        )));
    }
    if let Some(position) = keys.iter().position(|k| !k.is_finite()) {
        return Err(MatchingError::InvalidNumericValue(format!(
            "Key {} of the candidate is {}",
            position, keys[position]
        )));
    }

    let mut order: Vec<usize> = (0..size).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]).then(a.cmp(&b)));
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::EvaluationFunction;
    use crate::requirement::Requirement;

    fn sample(sets: Vec<usize>, capacities: Vec<usize>) -> MatchingData {
        let n = sets.len();
        MatchingData::builder()
            .set_indices(sets)
            .capacities(capacities)
            .properties(vec![vec![5.0]; n])
            .weights(vec![vec![1.0]; n])
            .requirements(vec![vec![Requirement::target_scale(5.0)]; n])
            .build()
            .unwrap()
    }

    #[test]
    fn test_decode_order() {
        assert_eq!(
            decode_order(&[0.5, 0.1, 0.5, 0.0], 4).unwrap(),
            vec![3, 1, 0, 2]
        );
    }

    #[test]
    fn test_decode_order_rejects_bad_keys() {
        assert!(matches!(
            decode_order(&[0.1, 0.2], 3),
            Err(MatchingError::InvalidCandidate(_))
        ));
        assert!(matches!(
            decode_order(&[0.1, f64::NAN], 2),
            Err(MatchingError::InvalidNumericValue(_))
        ));
    }

    #[test]
    fn test_variant_set_counts() {
        let two = sample(vec![0, 0, 1, 1], vec![1; 4]);
        let three = sample(vec![0, 1, 2], vec![1; 3]);
        assert!(MatchingVariant::OneToOne.validate(&two).is_ok());
        assert!(MatchingVariant::Triplet.validate(&three).is_ok());
        assert!(MatchingVariant::Triplet.validate(&two).is_err());
        assert!(MatchingVariant::ManyToMany.validate(&three).is_err());
    }

    #[test]
    fn test_variant_capacities() {
        let data = sample(vec![0, 0, 1, 1], vec![2, 1, 1, 1]);
        assert!(MatchingVariant::OneToOne.validate(&data).is_err());
        assert!(MatchingVariant::OneToMany.validate(&data).is_ok());
        assert!(MatchingVariant::ManyToMany.validate(&data).is_ok());

        let reversed = sample(vec![0, 0, 1, 1], vec![1, 1, 2, 1]);
        assert!(MatchingVariant::OneToMany.validate(&reversed).is_err());
    }

    #[test]
    fn test_capacity_error_names_individual() {
        let data = sample(vec![0, 0, 1, 1], vec![1, 1, 1, 3]);
        match MatchingVariant::OneToMany.validate(&data) {
            Err(MatchingError::Configuration(msg)) => assert!(msg.contains("individual 3 has 3")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_triplet_capacity_counts_groups() {
        let data = sample(vec![0, 1, 2, 0, 1, 2], vec![1; 6]);
        assert!(MatchingVariant::Triplet.validate(&data).is_ok());

        let wrapper = PreferenceListWrapper::build(
            &data,
            &[
                EvaluationFunction::Default,
                EvaluationFunction::Default,
                EvaluationFunction::Default,
            ],
        )
        .unwrap();
        let matches = MatchingVariant::Triplet
            .decode(&data, &wrapper, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .unwrap();

        assert_eq!(matches.groups().len(), 2);
        for individual in 0..6 {
            assert_eq!(matches.partners(individual).len(), 2);
            assert!(matches.is_full(individual, 2));
        }
    }

    #[test]
    fn test_infer() {
        let infer = |sets: Vec<usize>, caps: Vec<usize>| MatchingVariant::infer(&sample(sets, caps));
        assert_eq!(infer(vec![0, 0, 1, 1], vec![1; 4]), MatchingVariant::OneToOne);
        assert_eq!(infer(vec![0, 0, 1, 1], vec![3, 1, 1, 1]), MatchingVariant::OneToMany);
        assert_eq!(infer(vec![0, 0, 1, 1], vec![1, 1, 2, 1]), MatchingVariant::ManyToMany);
        assert_eq!(infer(vec![0, 1, 2], vec![1; 3]), MatchingVariant::Triplet);
    }

    #[test]
    fn test_display() {
        assert_eq!(MatchingVariant::OneToMany.to_string(), "one-to-many");
    }
}
