//! Open flight-status requests and their keys.

use crate::types::AccountId;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Identity of a flight-status request.
///
/// Derived by hashing the routed shard index together with the flight
/// identity, so identical requests collide into one entry by design.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey([u8; 32]);

impl RequestKey {
    /// Derives the key for a request.
    ///
    /// The flight code is length-prefixed before hashing so adjacent
    /// fields cannot be confused for one another.
    #[must_use]
    pub fn derive(shard: u8, carrier: AccountId, flight: &str, departure: i64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update([shard]);
        hasher.update(carrier.as_bytes());
        hasher.update((flight.len() as u64).to_be_bytes());
        hasher.update(flight.as_bytes());
        hasher.update(departure.to_be_bytes());

        let mut key = [0u8; 32];
        key.copy_from_slice(&hasher.finalize());
        Self(key)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestKey({self})")
    }
}

/// An open flight-status request.
#[derive(Debug, Clone)]
pub struct FlightRequest {
    /// Shard index the request was routed to.
    pub shard: u8,
    /// Operating carrier.
    pub carrier: AccountId,
    /// Flight code.
    pub flight: String,
    /// Scheduled departure as a unix timestamp.
    pub departure: i64,
    /// Account that opened the request.
    pub requested_by: AccountId,
    /// When the request was opened.
    pub opened_at: DateTime<Utc>,
    /// Set at creation and never cleared; requests are not closed.
    pub open: bool,
}

/// Open requests keyed by [`RequestKey`].
///
/// Opening a request under an existing key replaces the prior entry.
/// Requests are never closed or evicted; the response buckets keyed by the
/// same hash outlive any re-opened request.
pub struct RequestRegistry {
    requests: RwLock<AHashMap<RequestKey, FlightRequest>>,
}

impl RequestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { requests: RwLock::new(AHashMap::new()) }
    }

    /// Stores an open request, overwriting any prior entry under `key`.
    pub fn open(&self, key: RequestKey, request: FlightRequest) {
        let mut requests = self.requests.write();
        let replaced = requests.insert(key, request).is_some();
        drop(requests);

        debug!(key = %key, replaced, "opened flight-status request");
    }

    /// A snapshot of the request under `key`, if any.
    #[must_use]
    pub fn get(&self, key: RequestKey) -> Option<FlightRequest> {
        self.requests.read().get(&key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: RequestKey) -> bool {
        self.requests.read().contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.read().is_empty()
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
