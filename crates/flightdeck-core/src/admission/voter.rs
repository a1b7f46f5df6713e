//! Bootstrap and majority admission decisions.

use super::{round::PendingRound, AdmissionError};
use crate::{ledger::LedgerStore, types::AccountId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of one nomination call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionOutcome {
    /// Whether the candidate was admitted by this call.
    pub admitted: bool,
    /// Distinct endorsements counted so far, this one included.
    pub votes: usize,
}

/// Decides carrier admissions.
///
/// Below the bootstrap threshold every nomination is admitted immediately
/// and the pending round is not touched. At or above it, the candidate
/// needs `ceil(member_count / 2)` distinct endorsements pooled in the
/// shared [`PendingRound`].
///
/// The round mutation, the threshold check, and the ledger persist happen
/// under one lock, so concurrent nominations observe each other's votes
/// and an admission clears the round before any later vote lands.
pub struct AdmissionVoter {
    ledger: Arc<dyn LedgerStore>,
    round: Mutex<PendingRound>,
    bootstrap_threshold: usize,
}

impl AdmissionVoter {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerStore>, bootstrap_threshold: usize) -> Self {
        Self { ledger, round: Mutex::new(PendingRound::new()), bootstrap_threshold }
    }

    /// Processes one endorsement of `candidate` by `voter`.
    ///
    /// `member_count` is the membership size at the time of the call; it
    /// selects between bootstrap and majority admission and sets the
    /// majority threshold.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::DuplicateVote`] if `voter` already
    /// endorsed the current round, or [`AdmissionError::Ledger`] if
    /// persisting the admitted carrier fails. Either way no vote is
    /// recorded and the round keeps its prior state.
    pub fn propose(
        &self,
        candidate_name: &str,
        candidate: AccountId,
        voter: AccountId,
        member_count: usize,
    ) -> Result<AdmissionOutcome, AdmissionError> {
        if member_count < self.bootstrap_threshold {
            self.ledger.register_carrier(candidate, candidate_name)?;
            info!(
                candidate = %candidate,
                members = member_count,
                "admitted carrier during bootstrap"
            );
            return Ok(AdmissionOutcome { admitted: true, votes: 1 });
        }

        let threshold = member_count.div_ceil(2);
        let mut round = self.round.lock();

        if round.has_voted(voter) {
            return Err(AdmissionError::DuplicateVote(voter));
        }

        let votes = round.vote_count() + 1;
        if votes >= threshold {
            // Persist before touching the round so a ledger failure aborts
            // with every recorded vote intact.
            self.ledger.register_carrier(candidate, candidate_name)?;
            round.clear();
            info!(candidate = %candidate, votes, threshold, "admitted carrier by majority");
            return Ok(AdmissionOutcome { admitted: true, votes });
        }

        round.record_vote(voter);
        debug!(
            candidate = %candidate,
            voter = %voter,
            votes,
            threshold,
            "recorded admission vote"
        );
        Ok(AdmissionOutcome { admitted: false, votes })
    }

    /// Distinct endorsements sitting in the current round.
    #[must_use]
    pub fn pending_votes(&self) -> usize {
        self.round.lock().vote_count()
    }
}
