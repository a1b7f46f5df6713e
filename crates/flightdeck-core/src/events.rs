//! Registry event broadcasting.
//!
//! The engine publishes an [`OracleEvent`] for every externally visible
//! oracle transition. Events are fire-and-forget: publishing never blocks
//! engine operations, and a subscriber that falls behind the channel
//! capacity misses events rather than slowing the registry down.

use crate::types::{AccountId, FlightStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Externally visible oracle transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleEvent {
    /// A flight-status request was opened and routed to a shard.
    RequestOpened {
        /// Shard the request was routed to.
        shard: u8,
        /// Operating carrier.
        carrier: AccountId,
        /// Flight code.
        flight: String,
        /// Scheduled departure as a unix timestamp.
        departure: i64,
    },

    /// A reporter's status response was recorded.
    ResponseRecorded {
        carrier: AccountId,
        flight: String,
        departure: i64,
        /// Status the reporter observed.
        status: FlightStatus,
    },

    /// A response bucket crossed quorum and was finalized.
    RequestFinalized {
        carrier: AccountId,
        flight: String,
        departure: i64,
        /// Status the quorum agreed on.
        status: FlightStatus,
    },
}

/// Broadcast fan-out for [`OracleEvent`]s.
///
/// Receivers only observe events published after they subscribe.
pub struct EventBus {
    sender: broadcast::Sender<OracleEvent>,
}

impl EventBus {
    /// Creates a bus whose channel buffers `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; [`RegistryConfig::validate`] rejects
    /// that configuration before an engine is built.
    ///
    /// [`RegistryConfig::validate`]: crate::config::RegistryConfig::validate
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Opens a receiver for events published from this point on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OracleEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Having no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: OracleEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
