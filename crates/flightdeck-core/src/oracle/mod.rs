//! # Oracle Quorum Pipeline
//!
//! Flight-status truth enters the registry through independent reporters
//! rather than a single feed. The pipeline routes each request to a shard,
//! collects responses from the reporters holding it, and settles payouts
//! only once enough of them agree.
//!
//! ## Pipeline Steps
//!
//! 1. **Shard Assignment**: A registering reporter draws three pairwise
//!    distinct shard indexes from the entropy feed
//! 2. **Request Routing**: Opening a request draws one shard index; only
//!    reporters holding that shard may answer it
//! 3. **Response Bucketing**: Submissions are grouped per request key and
//!    reported status
//! 4. **Quorum Check**: A bucket reaching `quorum_size` responses is
//!    finalized exactly once
//! 5. **Settlement**: Finalizing on an actionable status credits every open
//!    policy on the flight through the ledger
//!
//! ## Configuration
//!
//! - `quorum_size`: Matching responses required to finalize a bucket
//! - `shard_count`: Size of the shard space requests are routed over
//! - `entropy_lookback`: Window of feed positions the sampler rotates through
//! - `max_draw_attempts`: Redraw budget when shard draws collide
//!
//! ## Failure Modes
//!
//! - **Colliding draws**: A reporter whose redraws never produce distinct
//!   shards is rejected with [`OracleError::EntropyExhausted`]
//! - **Ledger failure at settlement**: The response is dropped and the
//!   bucket left untouched, so the reporter can resubmit
//!
//! # Module Organization
//!
//! - [`entropy`]: Pluggable randomness feed ([`EntropySource`])
//! - [`sampler`]: Nonce-rotating index draws ([`IndexSampler`])
//! - [`shards`]: Distinct shard sets and the reporter roster
//! - [`requests`]: Open requests keyed by their derived [`RequestKey`]
//! - [`aggregation`]: Per-status quorum counting and settlement

pub mod aggregation;
pub mod entropy;
pub mod requests;
pub mod sampler;
pub mod shards;


pub use aggregation::{ResponseAggregator, SubmissionOutcome};
pub use entropy::{EntropySource, ScriptedEntropy};
pub use requests::{FlightRequest, RequestKey, RequestRegistry};
pub use sampler::IndexSampler;
pub use shards::{Reporter, ReporterRegistry, ShardAssigner, ShardSet};

use crate::types::{AccountId, Amount};
use thiserror::Error;

/// Errors surfaced by the oracle pipeline.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The fee offered with a reporter registration is below the minimum.
    #[error("Offered fee {offered} is below the required reporter fee {required}")]
    FeeBelowMinimum {
        /// Fee attached to the registration.
        offered: Amount,
        /// Configured minimum.
        required: Amount,
    },

    /// The submitting account is not a registered reporter.
    #[error("Reporter {0} is not registered")]
    ReporterUnknown(AccountId),

    /// The reporter does not hold the shard the request was routed to.
    #[error("Reporter {reporter} does not hold shard {shard}")]
    ShardNotAssigned {
        /// Submitting reporter.
        reporter: AccountId,
        /// Shard the request lives on.
        shard: u8,
    },

    /// No open request exists under this key.
    #[error("No open request under key {0}")]
    UnknownRequest(RequestKey),

    /// Redrawing never produced enough distinct shards.
    #[error("Could not draw a distinct shard within {attempts} attempts")]
    EntropyExhausted {
        /// Attempts the redraw loop was allowed.
        attempts: u32,
    },
}
