//! # Carrier Admission Voting
//!
//! Membership grows in two phases:
//!
//! 1. **Bootstrap**: while the membership is smaller than the configured
//!    threshold, any authorized nomination admits the candidate
//!    immediately.
//! 2. **Majority**: once the membership reaches the threshold, a candidate
//!    needs endorsements from `ceil(n / 2)` distinct members, where `n` is
//!    the membership size at the time of each vote.
//!
//! One [`PendingRound`] is shared by all in-flight nominations; its voter
//! set is cleared in full the moment any admission succeeds. An account
//! endorsing the same round twice is rejected without changing the count.
//!
//! # Module Organization
//!
//! - [`round`]: the shared distinct-voter set
//! - [`voter`]: the bootstrap-vs-majority decision procedure

pub mod round;
pub mod voter;

pub use round::PendingRound;
pub use voter::{AdmissionOutcome, AdmissionVoter};

use crate::{ledger::LedgerError, types::AccountId};
use thiserror::Error;

/// Errors raised while processing a nomination.
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// The account already endorsed the current round.
    #[error("Account {0} has already voted in the current round")]
    DuplicateVote(AccountId),

    /// Persisting the admitted carrier failed; the round is left untouched.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
