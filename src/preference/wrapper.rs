use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::debug;

use super::evaluation::EvaluationFunction;
use super::list::PreferenceList;
use crate::data::MatchingData;
use crate::error::{MatchingError, Result};
use crate::matches::Matches;

/// Every individual's [`PreferenceList`], indexed by individual.
///
/// Built once per problem and read-only afterwards, so it is shared by every
/// concurrent decode.
#[derive(Debug, Clone)]
pub struct PreferenceListWrapper {
    lists: Vec<PreferenceList>,
    capacities: Vec<usize>,
}

impl PreferenceListWrapper {
    /// Scores every cross-set pair. `functions` holds one entry per set and is
    /// applied to the owners of that set.
    pub fn build(data: &MatchingData, functions: &[EvaluationFunction]) -> Result<Self> {
        if functions.len() != data.set_count() {
            return Err(MatchingError::Configuration(format!(
                "Expected {} evaluation functions, found {}",
                data.set_count(),
                functions.len()
            )));
        }

        let lists = (0..data.size())
            .into_par_iter()
            .map(|owner| build_list(data, &functions[data.set_of(owner)], owner))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            individuals = data.size(),
            sets = data.set_count(),
            "Built preference lists"
        );

        Ok(Self {
            lists,
            capacities: data.capacities().to_vec(),
        })
    }

    pub fn get(&self, individual: usize) -> &PreferenceList {
        &self.lists[individual]
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// The node `holder` gives up when `new_node` competes with its
    /// `current_nodes` from `set`. Returns `new_node` when the newcomer loses.
    pub fn get_least_score_node(
        &self,
        holder: usize,
        set: usize,
        new_node: usize,
        current_nodes: &[usize],
    ) -> usize {
        let list = &self.lists[holder];
        if let (1, [incumbent]) = (self.capacities[holder], current_nodes) {
            return if list.is_score_greater(new_node, *incumbent) {
                *incumbent
            } else {
                new_node
            };
        }
        list.get_least_node(set, new_node, current_nodes)
    }

    /// Whether `judge` strictly prefers `propose` to `incumbent`.
    pub fn is_preferred_over(&self, propose: usize, incumbent: usize, judge: usize) -> bool {
        self.lists[judge].is_score_greater(propose, incumbent)
    }

    /// Per individual, the sum of its partners' scores in its own list.
    pub fn get_matches_satisfactions(&self, matches: &Matches) -> Vec<f64> {
        (0..self.lists.len())
            .map(|node| {
                let list = &self.lists[node];
                matches
                    .partners(node)
                    .iter()
                    .map(|&partner| list.score_of(partner))
                    .sum()
            })
            .collect()
    }
}

fn build_list(
    data: &MatchingData,
    function: &EvaluationFunction,
    owner: usize,
) -> Result<PreferenceList> {
    let own_set = data.set_of(owner);
    let mut by_set: BTreeMap<usize, HashMap<usize, f64>> = BTreeMap::new();
    for set in (0..data.set_count()).filter(|&s| s != own_set) {
        let scores = data
            .members_of(set)
            .iter()
            .map(|&candidate| Ok((candidate, function.score(data, owner, candidate)?)))
            .collect::<Result<HashMap<_, _>>>()?;
        by_set.insert(set, scores);
    }

    if data.set_count() == 2 {
        let scores = by_set.into_values().flatten().collect();
        Ok(PreferenceList::two_set(scores))
    } else {
        Ok(PreferenceList::triplet(by_set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;

    fn data(capacities: Vec<usize>) -> MatchingData {
        MatchingData::builder()
            .set_indices(vec![0, 0, 1, 1])
            .capacities(capacities)
            .properties(vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]])
            .weights(vec![vec![1.0]; 4])
            .requirements(vec![vec![Requirement::target_scale(4.0)]; 4])
            .build()
            .unwrap()
    }

    fn wrapper(data: &MatchingData) -> PreferenceListWrapper {
        PreferenceListWrapper::build(data, &[EvaluationFunction::Default, EvaluationFunction::Default])
            .unwrap()
    }

    #[test]
    fn test_lists_cover_opposite_set_only() {
        let data = data(vec![1; 4]);
        let wrapper = wrapper(&data);
        assert_eq!(wrapper.len(), 4);
        assert_eq!(wrapper.get(0).ranking(), &[3, 2]);
        assert_eq!(wrapper.get(2).ranking(), &[1, 0]);
        assert_eq!(wrapper.get(0).score_of(1), 0.0);
    }

    #[test]
    fn test_function_count_must_match_sets() {
        let data = data(vec![1; 4]);
        assert!(matches!(
            PreferenceListWrapper::build(&data, &[EvaluationFunction::Default]),
            Err(MatchingError::Configuration(_))
        ));
    }

    #[test]
    fn test_least_score_node_capacity_one() {
        let data = data(vec![1; 4]);
        let wrapper = wrapper(&data);
        // Individual 2 prefers 1 over 0.
        assert_eq!(wrapper.get_least_score_node(2, 0, 1, &[0]), 0);
        assert_eq!(wrapper.get_least_score_node(2, 0, 0, &[1]), 0);
    }

    #[test]
    fn test_least_score_node_larger_capacity() {
        let data = data(vec![1, 1, 2, 1]);
        let wrapper = wrapper(&data);
        assert_eq!(wrapper.get_least_score_node(2, 0, 1, &[0]), 0);
    }

    #[test]
    fn test_is_preferred_over() {
        let data = data(vec![1; 4]);
        let wrapper = wrapper(&data);
        assert!(wrapper.is_preferred_over(3, 2, 0));
        assert!(!wrapper.is_preferred_over(2, 3, 0));
    }

    #[test]
    fn test_satisfactions_sum_partner_scores() {
        let data = data(vec![1; 4]);
        let wrapper = wrapper(&data);
        let mut matches = Matches::new(4);
        matches.add_match_bi(0, 3);

        let satisfactions = wrapper.get_matches_satisfactions(&matches);
        assert_eq!(satisfactions[0], wrapper.get(0).score_of(3));
        assert_eq!(satisfactions[3], wrapper.get(3).score_of(0));
        assert_eq!(satisfactions[1], 0.0);
        assert_eq!(satisfactions[2], 0.0);
    }
}
