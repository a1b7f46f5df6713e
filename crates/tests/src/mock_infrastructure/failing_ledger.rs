//! A ledger whose write paths can be made to fail on demand.

use flightdeck_core::ledger::{InMemoryLedger, LedgerError, LedgerStore};
use flightdeck_core::types::{AccountId, Amount};
use parking_lot::RwLock;

/// Wraps [`InMemoryLedger`] with failure toggles on the write paths the
/// engine must treat as all-or-nothing.
///
/// While a toggle is set the corresponding method returns
/// [`LedgerError::Storage`] without touching the inner ledger, so tests can
/// verify that engine state is left intact and that the operation succeeds
/// once the backend recovers.
pub struct FailingLedger {
    inner: InMemoryLedger,
    fail_register: RwLock<bool>,
    fail_credit: RwLock<bool>,
}

impl FailingLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: InMemoryLedger::new(),
            fail_register: RwLock::new(false),
            fail_credit: RwLock::new(false),
        }
    }

    /// Makes `register_carrier` fail until cleared.
    pub fn set_fail_register(&self, fail: bool) {
        *self.fail_register.write() = fail;
    }

    /// Makes `credit_policyholders` fail until cleared.
    pub fn set_fail_credit(&self, fail: bool) {
        *self.fail_credit.write() = fail;
    }

    /// The wrapped ledger, for state inspection.
    #[must_use]
    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }
}

impl Default for FailingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for FailingLedger {
    fn is_operational(&self) -> Result<bool, LedgerError> {
        self.inner.is_operational()
    }

    fn set_operating_status(&self, operational: bool) -> Result<(), LedgerError> {
        self.inner.set_operating_status(operational)
    }

    fn is_carrier_registered(&self, carrier: AccountId) -> Result<bool, LedgerError> {
        self.inner.is_carrier_registered(carrier)
    }

    fn is_carrier_funded(&self, carrier: AccountId) -> Result<bool, LedgerError> {
        self.inner.is_carrier_funded(carrier)
    }

    fn register_carrier(&self, carrier: AccountId, name: &str) -> Result<(), LedgerError> {
        if *self.fail_register.read() {
            return Err(LedgerError::Storage("carrier store offline".to_string()));
        }
        self.inner.register_carrier(carrier, name)
    }

    fn carrier_count(&self) -> Result<usize, LedgerError> {
        self.inner.carrier_count()
    }

    fn receive_funding(&self, carrier: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.inner.receive_funding(carrier, amount)
    }

    fn register_flight(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<(), LedgerError> {
        self.inner.register_flight(carrier, flight, departure)
    }

    fn record_purchase(
        &self,
        buyer: AccountId,
        carrier: AccountId,
        flight: &str,
        departure: i64,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.inner.record_purchase(buyer, carrier, flight, departure, amount)
    }

    fn credit_policyholders(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<usize, LedgerError> {
        if *self.fail_credit.read() {
            return Err(LedgerError::Storage("credit store offline".to_string()));
        }
        self.inner.credit_policyholders(carrier, flight, departure)
    }

    fn pay_out(&self, account: AccountId) -> Result<Amount, LedgerError> {
        self.inner.pay_out(account)
    }
}
