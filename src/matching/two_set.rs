//! Capacitated deferred acceptance over two sets.

use std::collections::VecDeque;

use tracing::trace;

use crate::data::MatchingData;
use crate::matches::Matches;
use crate::preference::PreferenceListWrapper;

/// Runs capacitated deferred acceptance.
///
/// The set of the first individual in `order` proposes and the other set
/// holds. Proposers enter the queue in `order` and walk their rankings from
/// the top while they have free slots; a holder keeps its best offers and
/// evicts its weakest partner for a strictly better one. An evicted proposer
/// resumes where it stopped. The result has no pair that would both rather
/// be together, and which of the two sets gets its preferred stable matching
/// is decided by the keys.
pub(super) fn decode(
    data: &MatchingData,
    preferences: &PreferenceListWrapper,
    order: &[usize],
) -> Matches {
    let size = data.size();
    let mut matches = Matches::new(size);
    let Some(&first) = order.first() else {
        return matches;
    };
    let proposing_set = data.set_of(first);

    let mut cursor = vec![0usize; size];
    let mut queued = vec![false; size];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(size);
    for &individual in order.iter().filter(|&&i| data.set_of(i) == proposing_set) {
        requeue(&mut queue, &mut queued, individual);
    }

    while let Some(proposer) = queue.pop_front() {
        queued[proposer] = false;
        let ranking = preferences.get(proposer).ranking();
        let capacity = data.capacity_of(proposer);

        while !matches.is_full(proposer, capacity) && cursor[proposer] < ranking.len() {
            let target = ranking[cursor[proposer]];
            cursor[proposer] += 1;
            if data.is_excluded(proposer, target) || matches.is_matched(proposer, target) {
                continue;
            }

            if matches.is_full(target, data.capacity_of(target)) {
                let incumbents: Vec<usize> = matches.partners(target).iter().copied().collect();
                let loser = preferences.get_least_score_node(
                    target,
                    proposing_set,
                    proposer,
                    &incumbents,
                );
                if loser == proposer {
                    trace!(proposer, target, "Proposal refused");
                    continue;
                }
                trace!(proposer, target, evicted = loser, "Proposal displaced a partner");
                matches.remove_match_bi(target, loser);
                requeue(&mut queue, &mut queued, loser);
            } else {
                trace!(proposer, target, "Proposal accepted");
            }
            matches.add_match_bi(proposer, target);
        }
    }

    matches
}

/// Appends `individual` to the queue unless it is already waiting in it.
fn requeue(queue: &mut VecDeque<usize>, queued: &mut [bool], individual: usize) {
    if !queued[individual] {
        queued[individual] = true;
        queue.push_back(individual);
    }
}
