//! Nonce-rotating shard index draws.

use super::entropy::EntropySource;
use crate::types::AccountId;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Draws pseudo-random shard indexes, one nonce step per draw.
///
/// Each draw hashes the entropy digest at the current nonce position
/// together with the drawing account, reduces the first eight bytes of
/// the hash modulo the shard count, and advances the nonce. The nonce
/// wraps to zero once it exceeds the entropy lookback, keeping every draw
/// inside the feed's addressable window.
///
/// `shard_count` must be at least 1; the engine validates configuration
/// before constructing a sampler.
pub struct IndexSampler {
    entropy: Arc<dyn EntropySource>,
    nonce: Mutex<u32>,
    shard_count: u8,
    entropy_lookback: u32,
}

impl IndexSampler {
    #[must_use]
    pub fn new(entropy: Arc<dyn EntropySource>, shard_count: u8, entropy_lookback: u32) -> Self {
        Self { entropy, nonce: Mutex::new(0), shard_count, entropy_lookback }
    }

    /// Draws one shard index in `[0, shard_count)` for `account`.
    #[allow(clippy::cast_possible_truncation)] // reduced modulo a u8 count
    pub fn draw(&self, account: AccountId) -> u8 {
        let mut nonce = self.nonce.lock();
        let digest = self.entropy.recent_digest(*nonce);

        *nonce += 1;
        if *nonce > self.entropy_lookback {
            *nonce = 0;
        }
        drop(nonce);

        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(account.as_bytes());
        let hash = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&hash[..8]);
        (u64::from_be_bytes(word) % u64::from(self.shard_count)) as u8
    }

    /// Feed position the next draw will read.
    #[must_use]
    pub fn nonce(&self) -> u32 {
        *self.nonce.lock()
    }

    /// Upper bound of the draw range.
    #[must_use]
    pub fn shard_count(&self) -> u8 {
        self.shard_count
    }
}
