//! Quorum counting over submitted flight-status responses.
//!
//! Responses are bucketed per request key and reported status. A bucket
//! that reaches the quorum threshold is finalized exactly once; responses
//! submitted afterwards are still appended but cannot re-trigger payouts.

use super::requests::{FlightRequest, RequestKey};
use crate::ledger::{LedgerError, LedgerStore};
use crate::types::{AccountId, FlightStatus};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Responses recorded for one `(request, status)` pair.
#[derive(Debug, Default)]
struct ResponseBucket {
    reporters: Vec<AccountId>,
    finalized: bool,
}

/// What a single submission did to its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Responses held by the bucket, including this one.
    pub responses: usize,
    /// Whether this submission pushed the bucket across quorum.
    pub finalized: bool,
}

/// Counts responses per `(request, status)` bucket and settles payouts
/// when a bucket crosses quorum.
pub struct ResponseAggregator {
    ledger: Arc<dyn LedgerStore>,
    buckets: Mutex<AHashMap<(RequestKey, FlightStatus), ResponseBucket>>,
    quorum_size: usize,
}

impl ResponseAggregator {
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerStore>, quorum_size: usize) -> Self {
        Self { ledger, buckets: Mutex::new(AHashMap::new()), quorum_size }
    }

    /// Records one response and settles the bucket if it crosses quorum.
    ///
    /// A crossing on an actionable status credits every open policy for the
    /// flight before the response is appended. If the credit fails the
    /// bucket is left exactly as it was, so the reporter can resubmit.
    pub fn record(
        &self,
        request: &FlightRequest,
        key: RequestKey,
        status: FlightStatus,
        reporter: AccountId,
    ) -> Result<SubmissionOutcome, LedgerError> {
        let mut buckets = self.buckets.lock();

        let (held, already_finalized) = buckets
            .get(&(key, status))
            .map_or((0, false), |bucket| (bucket.reporters.len(), bucket.finalized));
        let responses = held + 1;
        let crossing = responses >= self.quorum_size && !already_finalized;

        // Persist the payout before the bucket changes; a ledger failure
        // must leave the quorum state untouched.
        if crossing && status.is_actionable() {
            let credited = self.ledger.credit_policyholders(
                request.carrier,
                &request.flight,
                request.departure,
            )?;
            info!(
                key = %key,
                status = status.as_str(),
                responses,
                credited,
                "quorum crossed, policyholders credited"
            );
        } else if crossing {
            info!(key = %key, status = status.as_str(), responses, "quorum crossed");
        } else {
            debug!(key = %key, status = status.as_str(), responses, "response recorded");
        }

        let bucket = buckets.entry((key, status)).or_default();
        bucket.reporters.push(reporter);
        if crossing {
            bucket.finalized = true;
        }

        Ok(SubmissionOutcome { responses, finalized: crossing })
    }

    /// Responses held for a `(request, status)` pair.
    #[must_use]
    pub fn response_count(&self, key: RequestKey, status: FlightStatus) -> usize {
        self.buckets
            .lock()
            .get(&(key, status))
            .map_or(0, |bucket| bucket.reporters.len())
    }

    /// Whether the `(request, status)` bucket has crossed quorum.
    #[must_use]
    pub fn is_finalized(&self, key: RequestKey, status: FlightStatus) -> bool {
        self.buckets
            .lock()
            .get(&(key, status))
            .is_some_and(|bucket| bucket.finalized)
    }

    #[must_use]
    pub fn quorum_size(&self) -> usize {
        self.quorum_size
    }
}
