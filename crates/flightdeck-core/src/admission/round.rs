//! Pending admission round state.

use crate::types::AccountId;
use ahash::AHashSet;

/// The distinct-voter set for the admission round currently in flight.
///
/// One round is shared by every nomination: the set is not keyed by
/// candidate, so endorsements pool together until an admission succeeds and
/// [`clear`](Self::clear) empties the set in full.
#[derive(Debug, Default)]
pub struct PendingRound {
    voters: AHashSet<AccountId>,
}

impl PendingRound {
    /// Creates an empty round.
    #[must_use]
    pub fn new() -> Self {
        Self { voters: AHashSet::new() }
    }

    /// Whether `voter` has already endorsed this round.
    #[must_use]
    pub fn has_voted(&self, voter: AccountId) -> bool {
        self.voters.contains(&voter)
    }

    /// Records an endorsement.
    ///
    /// Returns `false` when the account already voted in this round; the
    /// count is left unchanged in that case.
    pub fn record_vote(&mut self, voter: AccountId) -> bool {
        self.voters.insert(voter)
    }

    /// Number of distinct endorsements so far.
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }

    /// Empties the round after a successful admission.
    pub fn clear(&mut self) {
        self.voters.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }
}
