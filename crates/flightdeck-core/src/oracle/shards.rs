//! Shard assignment and the reporter registry.

use super::{sampler::IndexSampler, OracleError};
use crate::types::AccountId;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// The three shard indexes assigned to a reporter.
///
/// Indexes are pairwise distinct; each lies in the assigner's
/// `[0, shard_count)` range. The order is the draw order and is kept as
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardSet([u8; 3]);

impl ShardSet {
    /// Builds a set from three pairwise-distinct indexes.
    ///
    /// Returns `None` when any two are equal.
    #[must_use]
    pub fn new(first: u8, second: u8, third: u8) -> Option<Self> {
        if first == second || first == third || second == third {
            return None;
        }
        Some(Self([first, second, third]))
    }

    /// Whether `shard` is one of the three assigned indexes.
    #[must_use]
    pub fn contains(&self, shard: u8) -> bool {
        self.0.contains(&shard)
    }

    /// The assignment in draw order.
    #[must_use]
    pub const fn as_array(&self) -> [u8; 3] {
        self.0
    }
}

/// Assigns reporters three pairwise-distinct shard indexes.
///
/// Sampling is by rejection: draw one index, then redraw until the second
/// differs from the first, then redraw until the third differs from both.
/// Every redraw advances the sampler nonce, so retries shift later draws.
/// The redraw loops are capped; exhausting the cap is an internal fault
/// not expected against an honest entropy feed.
pub struct ShardAssigner {
    sampler: Arc<IndexSampler>,
    max_draw_attempts: u32,
}

impl ShardAssigner {
    #[must_use]
    pub fn new(sampler: Arc<IndexSampler>, max_draw_attempts: u32) -> Self {
        Self { sampler, max_draw_attempts }
    }

    /// Draws a full shard assignment for `account`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::EntropyExhausted`] if a redraw loop runs out
    /// of attempts before finding a distinct index.
    pub fn assign(&self, account: AccountId) -> Result<ShardSet, OracleError> {
        let first = self.sampler.draw(account);
        let second = self.draw_excluding(account, &[first])?;
        let third = self.draw_excluding(account, &[first, second])?;

        // Distinctness is guaranteed by the redraw loops.
        ShardSet::new(first, second, third)
            .ok_or(OracleError::EntropyExhausted { attempts: self.max_draw_attempts })
    }

    fn draw_excluding(&self, account: AccountId, taken: &[u8]) -> Result<u8, OracleError> {
        for _ in 0..self.max_draw_attempts {
            let index = self.sampler.draw(account);
            if !taken.contains(&index) {
                return Ok(index);
            }
        }
        Err(OracleError::EntropyExhausted { attempts: self.max_draw_attempts })
    }
}

/// A registered data reporter.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// The reporter's shard assignment, fixed at registration.
    pub shards: ShardSet,
    /// When the reporter registered.
    pub registered_at: DateTime<Utc>,
}

/// Reporter records keyed by account.
///
/// Registration is not idempotent: registering an account again replaces
/// the previous record, shard assignment included.
pub struct ReporterRegistry {
    reporters: RwLock<AHashMap<AccountId, Reporter>>,
}

impl ReporterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { reporters: RwLock::new(AHashMap::new()) }
    }

    /// Stores a reporter record, overwriting any prior registration.
    pub fn register(&self, account: AccountId, shards: ShardSet) {
        let mut reporters = self.reporters.write();
        let replaced = reporters
            .insert(account, Reporter { shards, registered_at: Utc::now() })
            .is_some();
        drop(reporters);

        info!(
            reporter = %account,
            shards = ?shards.as_array(),
            replaced,
            "registered reporter"
        );
    }

    /// The account's shard assignment, if registered.
    #[must_use]
    pub fn shards_of(&self, account: AccountId) -> Option<ShardSet> {
        self.reporters.read().get(&account).map(|reporter| reporter.shards)
    }

    #[must_use]
    pub fn is_registered(&self, account: AccountId) -> bool {
        self.reporters.read().contains_key(&account)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reporters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reporters.read().is_empty()
    }
}

impl Default for ReporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
