use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Scores of one owner over the candidates of one opposite set, plus their ranking.
///
/// Unknown candidates score `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedScores {
    scores: HashMap<usize, f64>,
    ranking: Vec<usize>,
}

impl RankedScores {
    /// Builds the ranking: descending score, ascending candidate id on ties.
    pub fn new(scores: HashMap<usize, f64>) -> Self {
        let mut ranking: Vec<usize> = scores.keys().copied().collect();
        ranking.sort_by(|a, b| compare_desc(&scores, *a, *b));
        Self { scores, ranking }
    }

    pub fn score_of(&self, candidate: usize) -> f64 {
        self.scores.get(&candidate).copied().unwrap_or(0.0)
    }

    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

fn compare_desc(scores: &HashMap<usize, f64>, a: usize, b: usize) -> Ordering {
    let sa = scores.get(&a).copied().unwrap_or(0.0);
    let sb = scores.get(&b).copied().unwrap_or(0.0);
    sb.total_cmp(&sa).then(a.cmp(&b))
}

/// One individual's ranked view over the opposite set(s).
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceList {
    /// Owner of a two-set problem; candidates all come from the other set.
    TwoSet(RankedScores),
    /// Owner of a three-set problem; one ranking per opposite set, plus the
    /// merged ranking across both.
    Triplet {
        by_set: BTreeMap<usize, RankedScores>,
        merged: Vec<usize>,
    },
}

impl PreferenceList {
    pub fn two_set(scores: HashMap<usize, f64>) -> Self {
        PreferenceList::TwoSet(RankedScores::new(scores))
    }

    pub fn triplet(by_set: BTreeMap<usize, HashMap<usize, f64>>) -> Self {
        let by_set: BTreeMap<usize, RankedScores> = by_set
            .into_iter()
            .map(|(set, scores)| (set, RankedScores::new(scores)))
            .collect();
        let all: HashMap<usize, f64> = by_set
            .values()
            .flat_map(|ranked| ranked.scores.iter().map(|(&c, &s)| (c, s)))
            .collect();
        let mut merged: Vec<usize> = all.keys().copied().collect();
        merged.sort_by(|a, b| compare_desc(&all, *a, *b));
        PreferenceList::Triplet { by_set, merged }
    }

    pub fn score_of(&self, candidate: usize) -> f64 {
        match self {
            PreferenceList::TwoSet(ranked) => ranked.score_of(candidate),
            PreferenceList::Triplet { by_set, .. } => by_set
                .values()
                .find(|ranked| ranked.scores.contains_key(&candidate))
                .map_or(0.0, |ranked| ranked.score_of(candidate)),
        }
    }

    /// Every candidate, most preferred first.
    pub fn ranking(&self) -> &[usize] {
        match self {
            PreferenceList::TwoSet(ranked) => ranked.ranking(),
            PreferenceList::Triplet { merged, .. } => merged,
        }
    }

    /// Candidates of `set`, most preferred first. A two-set list ranks a single
    /// opposite set and ignores `set`.
    pub fn ranking_in_set(&self, set: usize) -> &[usize] {
        match self {
            PreferenceList::TwoSet(ranked) => ranked.ranking(),
            PreferenceList::Triplet { by_set, .. } => {
                by_set.get(&set).map_or(&[], RankedScores::ranking)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ranking().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking().is_empty()
    }

    fn in_set(&self, set: usize, candidate: usize) -> bool {
        match self {
            PreferenceList::TwoSet(_) => true,
            PreferenceList::Triplet { by_set, .. } => by_set
                .get(&set)
                .is_some_and(|ranked| ranked.scores.contains_key(&candidate)),
        }
    }

    /// The weakest of `current_nodes` and `new_node`.
    ///
    /// A newcomer that only ties the weakest incumbent loses; among tied
    /// incumbents the lowest id is the weakest. For triplet lists only current
    /// nodes of `set` compete.
    pub fn get_least_node(&self, set: usize, new_node: usize, current_nodes: &[usize]) -> usize {
        let weakest_incumbent = current_nodes
            .iter()
            .copied()
            .filter(|&node| self.in_set(set, node))
            .min_by(|&a, &b| {
                self.score_of(a)
                    .total_cmp(&self.score_of(b))
                    .then(a.cmp(&b))
            });

        match weakest_incumbent {
            Some(incumbent) if self.is_score_greater(new_node, incumbent) => incumbent,
            _ => new_node,
        }
    }

    /// Strictly prefers `proposer` to `incumbent`.
    pub fn is_score_greater(&self, proposer: usize, incumbent: usize) -> bool {
        self.score_of(proposer) > self.score_of(incumbent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_set(pairs: &[(usize, f64)]) -> PreferenceList {
        PreferenceList::two_set(pairs.iter().copied().collect())
    }

    #[test]
    fn test_ranking_descending_with_id_ties() {
        let list = two_set(&[(5, 1.0), (3, 2.0), (4, 1.0), (6, 0.5)]);
        assert_eq!(list.ranking(), &[3, 4, 5, 6]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_missing_candidate_scores_zero() {
        let list = two_set(&[(1, 1.5)]);
        assert_eq!(list.score_of(1), 1.5);
        assert_eq!(list.score_of(42), 0.0);
        assert!(list.is_score_greater(1, 42));
        assert!(!list.is_score_greater(42, 1));
    }

    #[test]
    fn test_least_node_picks_weakest() {
        let list = two_set(&[(1, 3.0), (2, 1.0), (3, 2.0), (4, 5.0)]);
        assert_eq!(list.get_least_node(0, 4, &[1, 2, 3]), 2);
        assert_eq!(list.get_least_node(0, 2, &[1, 3]), 2);
    }

    #[test]
    fn test_least_node_ties() {
        let list = two_set(&[(1, 1.0), (2, 1.0), (3, 1.0)]);
        // Newcomer tying the incumbents loses.
        assert_eq!(list.get_least_node(0, 3, &[2, 1]), 3);

        let list = two_set(&[(1, 1.0), (2, 1.0), (3, 4.0)]);
        // Among tied incumbents, the lowest id is dropped.
        assert_eq!(list.get_least_node(0, 3, &[2, 1]), 1);
    }

    #[test]
    fn test_least_node_without_incumbents() {
        let list = two_set(&[(1, 1.0)]);
        assert_eq!(list.get_least_node(0, 1, &[]), 1);
    }

    #[test]
    fn test_triplet_rankings() {
        let mut by_set = BTreeMap::new();
        by_set.insert(1, [(3, 1.0), (4, 2.0)].into_iter().collect());
        by_set.insert(2, [(6, 1.5), (7, 0.5)].into_iter().collect());
        let list = PreferenceList::triplet(by_set);

        assert_eq!(list.ranking(), &[4, 6, 3, 7]);
        assert_eq!(list.ranking_in_set(2), &[6, 7]);
        assert!(list.ranking_in_set(0).is_empty());
        assert_eq!(list.score_of(6), 1.5);
        assert_eq!(list.score_of(0), 0.0);
    }

    #[test]
    fn test_triplet_least_node_filters_by_set() {
        let mut by_set = BTreeMap::new();
        by_set.insert(1, [(3, 1.0), (4, 2.0)].into_iter().collect());
        by_set.insert(2, [(6, 0.1), (7, 0.5)].into_iter().collect());
        let list = PreferenceList::triplet(by_set);

        // 6 is weaker than 3 but belongs to set 2, so it does not compete in set 1.
        assert_eq!(list.get_least_node(1, 4, &[3, 6]), 3);
    }
}
