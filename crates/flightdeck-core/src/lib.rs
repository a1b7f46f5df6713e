//! # Flightdeck Core
//!
//! Core library for the Flightdeck decentralized flight-insurance registry.
//!
//! This crate provides the consensus components for:
//!
//! - **[`admission`]**: Carrier membership voting with a bootstrap phase and
//!   majority rounds counted on a single shared ballot.
//!
//! - **[`oracle`]**: The flight-status pipeline: sharded reporter assignment,
//!   request routing, and per-status quorum aggregation with payout
//!   settlement.
//!
//! - **[`ledger`]**: The durable-state boundary (`LedgerStore`) the engine
//!   delegates persistence to, with a bundled in-memory backend.
//!
//! - **[`engine`]**: The `RegistryEngine` facade every operation enters
//!   through, gated on the registry's operating switch.
//!
//! - **[`events`]**: Broadcast notifications for externally visible oracle
//!   transitions.
//!
//! - **[`config`]**: Layered configuration from compiled defaults, TOML
//!   files, and `FLIGHTDECK_*` environment variables.
//!
//! - **[`errors`]**: The unified `RegistryError` surface with coarse
//!   `ErrorKind` classification.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       RegistryEngine                       │
//! │  ┌────────────────┐  ┌──────────────────┐  ┌────────────┐  │
//! │  │ AdmissionVoter │  │  Oracle Pipeline │  │  EventBus  │  │
//! │  └───────┬────────┘  └────────┬─────────┘  └─────┬──────┘  │
//! │          │                    │                  │         │
//! │  ┌───────▼────────┐  ┌────────▼─────────┐  ┌─────▼──────┐  │
//! │  │  PendingRound  │  │ IndexSampler     │  │ broadcast  │  │
//! │  │ (shared ballot)│  │ ShardAssigner    │  │ receivers  │  │
//! │  └────────────────┘  │ RequestRegistry  │  └────────────┘  │
//! │                      │ ResponseAggreg.  │                  │
//! │                      └──────────────────┘                  │
//! └─────────────────────────────┬──────────────────────────────┘
//!                               │
//!                        ┌──────▼──────┐
//!                        │ LedgerStore │
//!                        └─────────────┘
//! ```
//!
//! ## Settlement Flow
//!
//! ```text
//! open_flight_request
//!        │ draw shard, derive request key
//!        ▼
//! ┌──────────────┐
//! │ open request │ ──► RequestOpened event
//! └──────┬───────┘
//!        │
//! submit_response (per reporter)
//!        │ reporter holds the shard?
//!        ▼
//! ┌────────────────────┐
//! │ ResponseAggregator │ ─── below quorum ──► counted, keep waiting
//! └──────┬─────────────┘
//!        │ quorum crossed (first time only)
//!        ▼
//! actionable status? ─── no ──► bucket finalized
//!        │ yes
//!        ▼
//! ┌──────────────────────┐
//! │ credit policyholders │ ─── Err ──► bucket untouched, resubmittable
//! └──────┬───────────────┘
//!        │ Ok
//!        ▼
//! bucket finalized ──► RequestFinalized event
//! ```

pub mod admission;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod oracle;
pub mod types;
