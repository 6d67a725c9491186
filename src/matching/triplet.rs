//! Group formation over three sets.

use std::collections::VecDeque;

use tracing::trace;

use crate::data::MatchingData;
use crate::matches::Matches;
use crate::preference::PreferenceListWrapper;

/// Forms groups holding exactly one member of each set.
///
/// Ungrouped individuals walk their merged ranking in `order`. A free
/// candidate starts a new group with the proposer's favourite free member of
/// the third set. A grouped candidate swaps out the proposer's same-set
/// incumbent only when both other members of the group prefer the proposer.
pub(super) fn decode(
    data: &MatchingData,
    preferences: &PreferenceListWrapper,
    order: &[usize],
) -> Matches {
    let size = data.size();
    let mut matches = Matches::new(size);
    let mut cursor = vec![0usize; size];
    let mut queued = vec![true; size];
    let mut queue: VecDeque<usize> = order.iter().copied().collect();

    while let Some(proposer) = queue.pop_front() {
        queued[proposer] = false;
        let list = preferences.get(proposer);
        let ranking = list.ranking();
        let own_set = data.set_of(proposer);

        while matches.is_unmatched(proposer) && cursor[proposer] < ranking.len() {
            let candidate = ranking[cursor[proposer]];
            cursor[proposer] += 1;
            if data.is_excluded(proposer, candidate) {
                continue;
            }
            let third_set = 3 - own_set - data.set_of(candidate);

            if matches.is_unmatched(candidate) {
                let partner = list.ranking_in_set(third_set).iter().copied().find(|&c| {
                    matches.is_unmatched(c)
                        && !data.is_excluded(proposer, c)
                        && !data.is_excluded(candidate, c)
                });
                if let Some(third) = partner {
                    trace!(proposer, candidate, third, "Group formed");
                    matches.add_match_for_group(&[proposer, candidate, third]);
                }
                continue;
            }

            let group = matches.matches_and_target(candidate);
            let member_of = |set: usize| group.iter().copied().find(|&m| data.set_of(m) == set);
            let (Some(incumbent), Some(third)) = (member_of(own_set), member_of(third_set)) else {
                continue;
            };
            if data.is_excluded(proposer, third) {
                continue;
            }

            if preferences.is_preferred_over(proposer, incumbent, candidate)
                && preferences.is_preferred_over(proposer, incumbent, third)
            {
                trace!(proposer, candidate, third, evicted = incumbent, "Group member replaced");
                matches.dis_match(incumbent);
                matches.add_match_for_group(&[proposer, candidate, third]);
                if !queued[incumbent] {
                    queued[incumbent] = true;
                    queue.push_back(incumbent);
                }
            }
        }
    }

    matches
}
