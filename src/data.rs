//! # MatchingData
//!
//! The immutable snapshot of a matching problem: which set every individual
//! belongs to, how many partners it may hold, its properties, the weights and
//! requirements it judges candidates with, and the pairs that may never match.
//!
//! `MatchingData` is validated once when it is built and is read-only
//! afterwards, so it can be shared by reference across every candidate
//! evaluation of an optimization run.
//!
//! ## Example
//!
//! ```rust
//! use stablematch::data::MatchingData;
//! use stablematch::requirement::Requirement;
//!
//! let data = MatchingData::builder()
//!     .set_indices(vec![0, 0, 1, 1])
//!     .capacities(vec![1, 1, 1, 1])
//!     .properties(vec![vec![5.0]; 4])
//!     .weights(vec![vec![1.0]; 4])
//!     .requirements(vec![vec![Requirement::target_scale(5.0)]; 4])
//!     .exclude(0, 3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(data.size(), 4);
//! assert_eq!(data.members_of(1), &[2, 3]);
//! assert!(data.is_excluded(3, 0));
//! ```

use std::collections::BTreeSet;

use crate::error::{MatchingError, Result};
use crate::requirement::Requirement;

/// Smallest and largest number of sets a problem may partition its individuals into.
pub const MIN_SETS: usize = 2;
pub const MAX_SETS: usize = 3;

/// Unordered pairs of individuals that must never be matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedPairs {
    pairs: BTreeSet<(usize, usize)>,
}

impl ExcludedPairs {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: usize, b: usize) -> (usize, usize) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn insert(&mut self, a: usize, b: usize) {
        self.pairs.insert(Self::key(a, b));
    }

    /// Symmetric lookup.
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.pairs.iter()
    }
}

impl FromIterator<(usize, usize)> for ExcludedPairs {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut excluded = ExcludedPairs::new();
        for (a, b) in iter {
            excluded.insert(a, b);
        }
        excluded
    }
}

/// Validated, read-only problem inputs.
#[derive(Debug, Clone)]
pub struct MatchingData {
    set_index_of: Vec<usize>,
    capacity_of: Vec<usize>,
    property_values: Vec<Vec<f64>>,
    property_weights: Vec<Vec<f64>>,
    requirements: Vec<Vec<Requirement>>,
    excluded_pairs: ExcludedPairs,
    property_count: usize,
    members: Vec<Vec<usize>>,
}

impl MatchingData {
    pub fn builder() -> MatchingDataBuilder {
        MatchingDataBuilder::default()
    }

    /// Total number of individuals.
    pub fn size(&self) -> usize {
        self.set_index_of.len()
    }

    pub fn property_count(&self) -> usize {
        self.property_count
    }

    pub fn set_count(&self) -> usize {
        self.members.len()
    }

    pub fn set_of(&self, individual: usize) -> usize {
        self.set_index_of[individual]
    }

    pub fn set_indices(&self) -> &[usize] {
        &self.set_index_of
    }

    pub fn capacity_of(&self, individual: usize) -> usize {
        self.capacity_of[individual]
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacity_of
    }

    pub fn property(&self, individual: usize, property: usize) -> f64 {
        self.property_values[individual][property]
    }

    pub fn weight(&self, individual: usize, property: usize) -> f64 {
        self.property_weights[individual][property]
    }

    pub fn requirement(&self, individual: usize, property: usize) -> &Requirement {
        &self.requirements[individual][property]
    }

    /// Individuals of `set`, ascending. Empty for an unknown set.
    pub fn members_of(&self, set: usize) -> &[usize] {
        self.members.get(set).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_excluded(&self, a: usize, b: usize) -> bool {
        self.excluded_pairs.contains(a, b)
    }

    pub fn excluded_pairs(&self) -> &ExcludedPairs {
        &self.excluded_pairs
    }
}

/// Builder for [`MatchingData`]. All validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct MatchingDataBuilder {
    set_indices: Option<Vec<usize>>,
    capacities: Option<Vec<usize>>,
    properties: Option<Vec<Vec<f64>>>,
    weights: Option<Vec<Vec<f64>>>,
    requirements: Option<Vec<Vec<Requirement>>>,
    excluded_pairs: ExcludedPairs,
}

impl MatchingDataBuilder {
    /// Sets the set index of every individual; the length defines the problem size.
    pub fn set_indices(mut self, value: Vec<usize>) -> Self {
        self.set_indices = Some(value);
        self
    }

    pub fn capacities(mut self, value: Vec<usize>) -> Self {
        self.capacities = Some(value);
        self
    }

    pub fn properties(mut self, value: Vec<Vec<f64>>) -> Self {
        self.properties = Some(value);
        self
    }

    pub fn weights(mut self, value: Vec<Vec<f64>>) -> Self {
        self.weights = Some(value);
        self
    }

    pub fn requirements(mut self, value: Vec<Vec<Requirement>>) -> Self {
        self.requirements = Some(value);
        self
    }

    /// Parses every requirement string with [`Requirement::from_str`](std::str::FromStr).
    pub fn requirement_strings<S: AsRef<str>>(mut self, value: &[Vec<S>]) -> Result<Self> {
        let parsed = value
            .iter()
            .map(|row| {
                row.iter()
                    .map(|raw| raw.as_ref().parse::<Requirement>())
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        self.requirements = Some(parsed);
        Ok(self)
    }

    pub fn exclude(mut self, a: usize, b: usize) -> Self {
        self.excluded_pairs.insert(a, b);
        self
    }

    pub fn excluded_pairs(mut self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        for (a, b) in pairs {
            self.excluded_pairs.insert(a, b);
        }
        self
    }

    pub fn build(self) -> Result<MatchingData> {
        let set_index_of = self
            .set_indices
            .ok_or_else(|| MatchingError::Configuration("Set indices not specified".to_string()))?;
        let capacity_of = self
            .capacities
            .ok_or_else(|| MatchingError::Configuration("Capacities not specified".to_string()))?;
        let property_values = self
            .properties
            .ok_or_else(|| MatchingError::Configuration("Properties not specified".to_string()))?;
        let property_weights = self
            .weights
            .ok_or_else(|| MatchingError::Configuration("Weights not specified".to_string()))?;
        let requirements = self.requirements.ok_or_else(|| {
            MatchingError::Configuration("Requirements not specified".to_string())
        })?;

        let size = set_index_of.len();
        if size == 0 {
            return Err(MatchingError::Configuration(
                "Problem must contain at least one individual".to_string(),
            ));
        }

        check_len("capacities", capacity_of.len(), size)?;
        check_len("properties", property_values.len(), size)?;
        check_len("weights", property_weights.len(), size)?;
        check_len("requirements", requirements.len(), size)?;

        let property_count = property_values[0].len();
        if property_count == 0 {
            return Err(MatchingError::Configuration(
                "Individuals must have at least one property".to_string(),
            ));
        }
        check_rectangular("properties", &property_values, property_count)?;
        check_rectangular("weights", &property_weights, property_count)?;
        check_rectangular("requirements", &requirements, property_count)?;

        for (individual, row) in property_values.iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(MatchingError::InvalidNumericValue(format!(
                    "Property of individual {} is not finite",
                    individual
                )));
            }
        }

        let set_count = set_index_of.iter().max().map_or(0, |max| max + 1);
        if !(MIN_SETS..=MAX_SETS).contains(&set_count) {
            return Err(MatchingError::Configuration(format!(
                "Expected between {} and {} sets, found {}",
                MIN_SETS, MAX_SETS, set_count
            )));
        }
        let mut members = vec![Vec::new(); set_count];
        for (individual, &set) in set_index_of.iter().enumerate() {
            members[set].push(individual);
        }
        if let Some(set) = members.iter().position(Vec::is_empty) {
            return Err(MatchingError::Configuration(format!(
                "Set indices must be contiguous from 0, set {} has no members",
                set
            )));
        }

        if let Some(individual) = capacity_of.iter().position(|&c| c == 0) {
            return Err(MatchingError::Configuration(format!(
                "Capacity of individual {} must be at least 1",
                individual
            )));
        }

        for &(a, b) in self.excluded_pairs.iter() {
            if a == b || b >= size {
                return Err(MatchingError::Configuration(format!(
                    "Excluded pair ({}, {}) is not a pair of distinct individuals",
                    a, b
                )));
            }
        }

        for (individual, row) in property_weights.iter().enumerate() {
            if row.iter().any(|w| !w.is_finite()) {
                return Err(MatchingError::InvalidNumericValue(format!(
                    "Weight of individual {} is not finite",
                    individual
                )));
            }
            if row.iter().all(|&w| w == 0.0) {
                return Err(MatchingError::DegenerateWeights { individual });
            }
        }

        Ok(MatchingData {
            set_index_of,
            capacity_of,
            property_values,
            property_weights,
            requirements,
            excluded_pairs: self.excluded_pairs,
            property_count,
            members,
        })
    }
}

fn check_len(name: &str, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        return Err(MatchingError::Configuration(format!(
            "Expected {} rows of {}, found {}",
            expected, name, found
        )));
    }
    Ok(())
}

fn check_rectangular<T>(name: &str, rows: &[Vec<T>], columns: usize) -> Result<()> {
    if let Some(row) = rows.iter().position(|r| r.len() != columns) {
        return Err(MatchingError::Configuration(format!(
            "Row {} of {} has {} columns, expected {}",
            row,
            name,
            rows[row].len(),
            columns
        )));
    }
    Ok(())
}

/// Request-shaped problem input, as decoded from the surrounding application.
///
/// Requirements are kept in their textual syntax and parsed on conversion.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchingInput {
    pub number_of_individuals: usize,
    pub number_of_properties: usize,
    pub individual_set_indices: Vec<usize>,
    pub individual_capacities: Vec<usize>,
    pub individual_properties: Vec<Vec<f64>>,
    pub individual_weights: Vec<Vec<f64>>,
    pub individual_requirements: Vec<Vec<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub excluded_pairs: Vec<(usize, usize)>,
}

impl TryFrom<MatchingInput> for MatchingData {
    type Error = MatchingError;

    fn try_from(input: MatchingInput) -> Result<Self> {
        check_len(
            "individual set indices",
            input.individual_set_indices.len(),
            input.number_of_individuals,
        )?;
        if input.individual_properties.first().map(Vec::len) != Some(input.number_of_properties)
        {
            return Err(MatchingError::Configuration(format!(
                "Expected {} properties per individual",
                input.number_of_properties
            )));
        }

        MatchingData::builder()
            .set_indices(input.individual_set_indices)
            .capacities(input.individual_capacities)
            .properties(input.individual_properties)
            .weights(input.individual_weights)
            .requirement_strings(&input.individual_requirements)?
            .excluded_pairs(input.excluded_pairs)
            .build()
    }
}
