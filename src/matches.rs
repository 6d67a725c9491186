//! # Matches
//!
//! Mutable matching state for one decode: for every individual, the ordered set
//! of partners it currently holds. A `Matches` is created fresh for each
//! candidate and is never shared between evaluations.
//!
//! ```rust
//! use stablematch::matches::Matches;
//!
//! let mut matches = Matches::new(4);
//! matches.add_match_bi(0, 2);
//! assert!(matches.is_matched(2, 0));
//! assert_eq!(matches.left_overs(), vec![1, 3]);
//! ```

use std::collections::BTreeSet;

/// Partner sets indexed by individual.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    partners: Vec<BTreeSet<usize>>,
}

impl Matches {
    pub fn new(size: usize) -> Self {
        Self {
            partners: vec![BTreeSet::new(); size],
        }
    }

    pub fn size(&self) -> usize {
        self.partners.len()
    }

    /// Records `partner` as held by `node` only.
    pub fn add_match(&mut self, node: usize, partner: usize) {
        self.partners[node].insert(partner);
    }

    pub fn add_match_bi(&mut self, a: usize, b: usize) {
        self.partners[a].insert(b);
        self.partners[b].insert(a);
    }

    pub fn remove_match(&mut self, node: usize, partner: usize) {
        self.partners[node].remove(&partner);
    }

    pub fn remove_match_bi(&mut self, a: usize, b: usize) {
        self.partners[a].remove(&b);
        self.partners[b].remove(&a);
    }

    /// Whether `node` holds `partner`.
    pub fn is_matched(&self, node: usize, partner: usize) -> bool {
        self.partners[node].contains(&partner)
    }

    /// Whether `node` holds `capacity` or more pairwise partners.
    ///
    /// Triplet matching counts capacity in groups instead: a capacity-1
    /// individual belongs to at most one group and holds its two other
    /// members, so it is checked with [`is_unmatched`](Self::is_unmatched).
    pub fn is_full(&self, node: usize, capacity: usize) -> bool {
        self.partners[node].len() >= capacity
    }

    /// Current partners of `node`, ascending.
    pub fn partners(&self, node: usize) -> &BTreeSet<usize> {
        &self.partners[node]
    }

    pub fn is_unmatched(&self, node: usize) -> bool {
        self.partners[node].is_empty()
    }

    /// Individuals without any partner, ascending.
    pub fn left_overs(&self) -> Vec<usize> {
        self.partners
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .map(|(node, _)| node)
            .collect()
    }

    /// Bonds every member of `nodes` with every other member.
    pub fn add_match_for_group(&mut self, nodes: &[usize]) {
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                if a != b {
                    self.add_match_bi(a, b);
                }
            }
        }
    }

    /// `node` together with its partners, ascending.
    pub fn matches_and_target(&self, node: usize) -> Vec<usize> {
        let mut group: Vec<usize> = self.partners[node].iter().copied().collect();
        group.push(node);
        group.sort_unstable();
        group
    }

    /// Breaks every bond of `node` in both directions and returns its former partners.
    pub fn dis_match(&mut self, node: usize) -> Vec<usize> {
        let former = std::mem::take(&mut self.partners[node]);
        for &partner in &former {
            self.partners[partner].remove(&node);
        }
        former.into_iter().collect()
    }

    /// Every symmetric pair `(a, b)` with `a < b`, ascending.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.partners
            .iter()
            .enumerate()
            .flat_map(|(a, ps)| {
                ps.iter()
                    .copied()
                    .filter(move |&b| a < b)
                    .map(move |b| (a, b))
            })
            .filter(|&(a, b)| self.partners[b].contains(&a))
            .collect()
    }

    /// Distinct groups (an individual with all of its partners), ascending by
    /// smallest member. Unmatched individuals are not reported.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let groups: BTreeSet<Vec<usize>> = (0..self.size())
            .filter(|&node| !self.is_unmatched(node))
            .map(|node| self.matches_and_target(node))
            .collect();
        groups.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_add_remove() {
        let mut matches = Matches::new(3);
        matches.add_match_bi(0, 2);
        assert!(matches.is_matched(0, 2));
        assert!(matches.is_matched(2, 0));

        matches.remove_match_bi(0, 2);
        assert!(!matches.is_matched(0, 2));
        assert!(!matches.is_matched(2, 0));
    }

    #[test]
    fn test_one_directional() {
        let mut matches = Matches::new(2);
        matches.add_match(0, 1);
        assert!(matches.is_matched(0, 1));
        assert!(!matches.is_matched(1, 0));
        assert!(matches.pairs().is_empty());
        matches.remove_match(0, 1);
        assert!(matches.is_unmatched(0));
    }

    #[test]
    fn test_is_full() {
        let mut matches = Matches::new(4);
        assert!(!matches.is_full(0, 1));
        matches.add_match_bi(0, 1);
        assert!(matches.is_full(0, 1));
        assert!(!matches.is_full(0, 2));
        matches.add_match_bi(0, 2);
        assert!(matches.is_full(0, 2));
        assert!(matches.is_full(0, 1));
    }

    #[test]
    fn test_fresh_left_overs() {
        let matches = Matches::new(5);
        assert_eq!(matches.left_overs(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_group_is_clique() {
        let mut matches = Matches::new(6);
        matches.add_match_for_group(&[1, 3, 5]);
        assert_eq!(matches.partners(1).iter().copied().collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(matches.partners(3).iter().copied().collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(matches.partners(5).iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(matches.groups(), vec![vec![1, 3, 5]]);
        assert_eq!(matches.pairs(), vec![(1, 3), (1, 5), (3, 5)]);
    }

    #[test]
    fn test_dis_match_breaks_every_bond() {
        let mut matches = Matches::new(4);
        matches.add_match_for_group(&[0, 1, 2]);
        assert_eq!(matches.matches_and_target(1), vec![0, 1, 2]);

        let former = matches.dis_match(0);
        assert_eq!(former, vec![1, 2]);
        assert!(matches.is_unmatched(0));
        assert!(matches.is_matched(1, 2));
        assert!(!matches.is_matched(1, 0));
        assert_eq!(matches.left_overs(), vec![0, 3]);
    }

    #[test]
    fn test_pairs_for_one_to_many() {
        let mut matches = Matches::new(4);
        matches.add_match_bi(0, 2);
        matches.add_match_bi(0, 3);
        matches.add_match_bi(1, 2);
        assert_eq!(matches.pairs(), vec![(0, 2), (0, 3), (1, 2)]);
    }
}
