//! Ledger collaboration layer.
//!
//! The consensus core never stores balances, carrier records, or policies
//! itself. All durable state lives behind [`LedgerStore`], a narrow
//! synchronous interface the engine calls at decision points such as
//! persisting an admitted carrier or crediting policyholders when a request
//! finalizes on an actionable status.
//!
//! # Repository Pattern
//!
//! [`LedgerStore`] follows the repository pattern so backends are swappable:
//!
//! - [`InMemoryLedger`]: bundled reference backend for tests and embedding
//! - External backends: contract adapters, databases, or RPC bridges
//!   implemented by the host application
//!
//! Every method is fallible. The engine treats a ledger failure as grounds
//! to abort the whole operation, so implementations must not apply partial
//! writes before returning an error.

pub mod memory;

pub use memory::InMemoryLedger;

use crate::types::{AccountId, Amount};
use thiserror::Error;

/// Errors surfaced by ledger backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Carrier is not present in the registry.
    #[error("Carrier {0} is not registered")]
    UnknownCarrier(AccountId),

    /// A carrier with this identity already exists.
    #[error("Carrier {0} is already registered")]
    CarrierExists(AccountId),

    /// The account holds no credited balance.
    #[error("Account {0} has no credited funds")]
    NothingToWithdraw(AccountId),

    /// The backing store failed.
    #[error("Ledger storage failure: {0}")]
    Storage(String),
}

/// Durable registry state the consensus core delegates to.
///
/// All methods are synchronous and must be atomic from the caller's point
/// of view: an `Err` return means nothing was written.
pub trait LedgerStore: Send + Sync {
    /// Whether the registry is accepting state-changing operations.
    fn is_operational(&self) -> Result<bool, LedgerError>;

    /// Flips the operating switch.
    fn set_operating_status(&self, operational: bool) -> Result<(), LedgerError>;

    /// Whether `carrier` has been admitted.
    fn is_carrier_registered(&self, carrier: AccountId) -> Result<bool, LedgerError>;

    /// Whether `carrier` has put up its membership stake.
    fn is_carrier_funded(&self, carrier: AccountId) -> Result<bool, LedgerError>;

    /// Persists a newly admitted carrier.
    fn register_carrier(&self, carrier: AccountId, name: &str) -> Result<(), LedgerError>;

    /// Number of admitted carriers.
    fn carrier_count(&self) -> Result<usize, LedgerError>;

    /// Records stake received from a carrier and marks it funded.
    ///
    /// The engine validates the amount against the configured minimum
    /// before forwarding, so backends only record what they are given.
    fn receive_funding(&self, carrier: AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Persists a flight announced by a carrier.
    fn register_flight(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<(), LedgerError>;

    /// Records a coverage purchase against a flight.
    fn record_purchase(
        &self,
        buyer: AccountId,
        carrier: AccountId,
        flight: &str,
        departure: i64,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Credits every open policy on the flight; returns how many were credited.
    ///
    /// Called exactly once per finalized actionable request. Policies
    /// already credited stay credited; a flight with no purchases credits
    /// zero and is not an error.
    fn credit_policyholders(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<usize, LedgerError>;

    /// Drains the account's credited balance; returns the amount paid out.
    fn pay_out(&self, account: AccountId) -> Result<Amount, LedgerError>;
}
