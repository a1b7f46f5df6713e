//! External entropy capability.

use sha2::{Digest, Sha256};

/// Feed of entropy digests that seed shard-index draws.
///
/// The production feed exposes a sliding window of recent digests (block
/// identifiers in the reference deployment). `position` addresses into
/// that window, with `0` the most recent entry; callers never address
/// past the configured lookback.
pub trait EntropySource: Send + Sync {
    /// Returns the digest at `position` steps into the feed's window.
    fn recent_digest(&self, position: u32) -> [u8; 32];
}

/// Deterministic entropy for tests and embedding.
///
/// Serves digests from a fixed script: position `i` maps to
/// `digests[i % len]`. An empty script yields the zero digest for every
/// position.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    digests: Vec<[u8; 32]>,
}

impl ScriptedEntropy {
    #[must_use]
    pub fn new(digests: Vec<[u8; 32]>) -> Self {
        Self { digests }
    }

    /// Single-digest feed: every position returns the same value.
    #[must_use]
    pub fn constant(digest: [u8; 32]) -> Self {
        Self { digests: vec![digest] }
    }

    /// Generates `len` pseudo-random digests by hashing `seed` with each
    /// position, so different seeds give unrelated feeds.
    #[must_use]
    pub fn from_seed(seed: u64, len: usize) -> Self {
        let digests = (0..len)
            .map(|position| {
                let mut hasher = Sha256::new();
                hasher.update(seed.to_be_bytes());
                hasher.update((position as u64).to_be_bytes());
                hasher.finalize().into()
            })
            .collect();
        Self { digests }
    }
}

impl EntropySource for ScriptedEntropy {
    fn recent_digest(&self, position: u32) -> [u8; 32] {
        if self.digests.is_empty() {
            return [0u8; 32];
        }
        self.digests[position as usize % self.digests.len()]
    }
}
