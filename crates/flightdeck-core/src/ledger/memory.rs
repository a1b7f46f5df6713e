//! In-memory ledger backend.
//!
//! Reference implementation of [`LedgerStore`] holding everything in
//! process memory. Used by the test suites and by embedders that do not
//! need durability.

use super::{LedgerError, LedgerStore};
use crate::types::{AccountId, Amount};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

/// A carrier admitted to the registry.
#[derive(Debug, Clone)]
pub struct CarrierRecord {
    /// Display name supplied at nomination time.
    pub name: String,
    /// Total stake received so far.
    pub funded_stake: Amount,
    /// Whether the carrier has put up its membership stake.
    pub funded: bool,
    /// When the carrier was admitted.
    pub registered_at: DateTime<Utc>,
}

/// A flight announced by a carrier.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub carrier: AccountId,
    pub flight: String,
    pub departure: i64,
    pub registered_at: DateTime<Utc>,
}

/// One coverage purchase against a flight.
#[derive(Debug, Clone)]
struct PolicyRecord {
    buyer: AccountId,
    amount: Amount,
    credited: bool,
}

type FlightKey = (AccountId, String, i64);

/// In-memory [`LedgerStore`] backend.
///
/// Crediting a policy adds the purchased amount to the buyer's payout
/// balance unchanged; payout multipliers and pricing are a backend policy
/// this reference implementation does not model.
pub struct InMemoryLedger {
    operational: RwLock<bool>,
    carriers: RwLock<AHashMap<AccountId, CarrierRecord>>,
    flights: RwLock<AHashMap<FlightKey, FlightRecord>>,
    policies: RwLock<AHashMap<FlightKey, Vec<PolicyRecord>>>,
    balances: RwLock<AHashMap<AccountId, Amount>>,
}

impl InMemoryLedger {
    /// Creates an empty, operational ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operational: RwLock::new(true),
            carriers: RwLock::new(AHashMap::new()),
            flights: RwLock::new(AHashMap::new()),
            policies: RwLock::new(AHashMap::new()),
            balances: RwLock::new(AHashMap::new()),
        }
    }

    /// The account's credited balance without draining it.
    #[must_use]
    pub fn credited_balance(&self, account: AccountId) -> Amount {
        self.balances.read().get(&account).copied().unwrap_or(0)
    }

    /// Snapshot of a carrier record, if admitted.
    #[must_use]
    pub fn carrier(&self, account: AccountId) -> Option<CarrierRecord> {
        self.carriers.read().get(&account).cloned()
    }

    /// Number of flights registered so far.
    #[must_use]
    pub fn flight_count(&self) -> usize {
        self.flights.read().len()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn is_operational(&self) -> Result<bool, LedgerError> {
        Ok(*self.operational.read())
    }

    fn set_operating_status(&self, operational: bool) -> Result<(), LedgerError> {
        *self.operational.write() = operational;
        info!(operational, "ledger operating status changed");
        Ok(())
    }

    fn is_carrier_registered(&self, carrier: AccountId) -> Result<bool, LedgerError> {
        Ok(self.carriers.read().contains_key(&carrier))
    }

    fn is_carrier_funded(&self, carrier: AccountId) -> Result<bool, LedgerError> {
        Ok(self.carriers.read().get(&carrier).is_some_and(|record| record.funded))
    }

    fn register_carrier(&self, carrier: AccountId, name: &str) -> Result<(), LedgerError> {
        let mut carriers = self.carriers.write();
        if carriers.contains_key(&carrier) {
            return Err(LedgerError::CarrierExists(carrier));
        }

        carriers.insert(
            carrier,
            CarrierRecord {
                name: name.to_string(),
                funded_stake: 0,
                funded: false,
                registered_at: Utc::now(),
            },
        );
        info!(carrier = %carrier, name = %name, "registered carrier");
        Ok(())
    }

    fn carrier_count(&self) -> Result<usize, LedgerError> {
        Ok(self.carriers.read().len())
    }

    fn receive_funding(&self, carrier: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let mut carriers = self.carriers.write();
        let record = carriers.get_mut(&carrier).ok_or(LedgerError::UnknownCarrier(carrier))?;

        record.funded_stake = record.funded_stake.saturating_add(amount);
        record.funded = true;
        info!(carrier = %carrier, amount, total = record.funded_stake, "received carrier funding");
        Ok(())
    }

    fn register_flight(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<(), LedgerError> {
        if !self.carriers.read().contains_key(&carrier) {
            return Err(LedgerError::UnknownCarrier(carrier));
        }

        let key = (carrier, flight.to_string(), departure);
        self.flights.write().insert(
            key,
            FlightRecord {
                carrier,
                flight: flight.to_string(),
                departure,
                registered_at: Utc::now(),
            },
        );
        debug!(carrier = %carrier, flight = %flight, departure, "registered flight");
        Ok(())
    }

    fn record_purchase(
        &self,
        buyer: AccountId,
        carrier: AccountId,
        flight: &str,
        departure: i64,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let key = (carrier, flight.to_string(), departure);
        let mut policies = self.policies.write();
        policies.entry(key).or_default().push(PolicyRecord { buyer, amount, credited: false });
        debug!(buyer = %buyer, carrier = %carrier, flight = %flight, amount, "recorded purchase");
        Ok(())
    }

    fn credit_policyholders(
        &self,
        carrier: AccountId,
        flight: &str,
        departure: i64,
    ) -> Result<usize, LedgerError> {
        let key = (carrier, flight.to_string(), departure);
        let mut policies = self.policies.write();
        let Some(records) = policies.get_mut(&key) else {
            return Ok(0);
        };

        let mut balances = self.balances.write();
        let mut credited = 0usize;
        for record in records.iter_mut().filter(|record| !record.credited) {
            record.credited = true;
            let balance = balances.entry(record.buyer).or_insert(0);
            *balance = balance.saturating_add(record.amount);
            credited += 1;
        }

        debug!(carrier = %carrier, flight = %flight, credited, "credited policyholders");
        Ok(credited)
    }

    fn pay_out(&self, account: AccountId) -> Result<Amount, LedgerError> {
        let mut balances = self.balances.write();
        match balances.remove(&account) {
            Some(amount) if amount > 0 => {
                info!(account = %account, amount, "paid out credited balance");
                Ok(amount)
            }
            _ => Err(LedgerError::NothingToWithdraw(account)),
        }
    }
}
