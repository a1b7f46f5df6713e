//! Test Helper Functions and Fixtures
//!
//! Common helpers for building engines and walking accounts through the
//! registry's admission and reporter flows.

use flightdeck_core::{
    config::RegistryConfig,
    engine::RegistryEngine,
    errors::RegistryError,
    ledger::{InMemoryLedger, LedgerStore},
    oracle::{entropy::ScriptedEntropy, SubmissionOutcome},
    types::{AccountId, Amount, FlightStatus},
};
use std::sync::Arc;

/// Departure timestamp shared by the test flights.
pub const DEPARTURE: i64 = 1_735_689_600;

/// The operator account the test engines are built with.
#[must_use]
pub fn operator() -> AccountId {
    AccountId::from_low_u64(900)
}

/// A deterministic test account.
#[must_use]
pub fn account(n: u64) -> AccountId {
    AccountId::from_low_u64(n)
}

/// The configuration the test engines run under.
#[must_use]
pub fn test_config() -> RegistryConfig {
    RegistryConfig::default()
}

/// The minimum membership stake under [`test_config`].
#[must_use]
pub fn min_stake() -> Amount {
    test_config().admission.min_carrier_stake
}

/// The minimum reporter fee under [`test_config`].
#[must_use]
pub fn reporter_fee() -> Amount {
    test_config().oracle.reporter_fee
}

/// Builds an engine over a fresh in-memory ledger and a seeded entropy feed.
#[must_use]
pub fn build_engine() -> (RegistryEngine, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    (build_engine_over(Arc::<InMemoryLedger>::clone(&ledger)), ledger)
}

/// Builds an engine over the given ledger with the default configuration.
#[must_use]
pub fn build_engine_over(ledger: Arc<dyn LedgerStore>) -> RegistryEngine {
    RegistryEngine::new(
        test_config(),
        operator(),
        ledger,
        Arc::new(ScriptedEntropy::from_seed(42, 64)),
    )
}

/// Admits `carrier` through an operator nomination and funds its stake.
///
/// Only valid while the registry is still in its bootstrap phase; a carrier
/// that needs votes will fail the funding step loudly.
pub fn admit_funded_carrier(engine: &RegistryEngine, carrier: AccountId, name: &str) {
    engine.propose_admission(operator(), carrier, name).unwrap();
    engine.fund_membership(carrier, min_stake()).unwrap();
}

/// Registers fresh reporter accounts until `count` of them hold `shard`.
///
/// Reporter accounts are drawn from a high numeric range so they never
/// collide with the carriers and buyers the scenarios use. Call at most
/// once per engine; a second call would re-register the same accounts and
/// replace their assignments.
pub fn reporters_holding(engine: &RegistryEngine, shard: u8, count: usize) -> Vec<AccountId> {
    let mut holders = Vec::new();
    for n in 0..600u64 {
        if holders.len() == count {
            break;
        }
        let reporter = account(2_000 + n);
        let shards = engine.register_reporter(reporter, reporter_fee()).unwrap();
        if shards.contains(shard) {
            holders.push(reporter);
        }
    }
    assert_eq!(holders.len(), count, "entropy feed failed to cover shard {shard}");
    holders
}

/// Registers fresh reporter accounts until one does not hold `shard`.
pub fn reporter_avoiding(engine: &RegistryEngine, shard: u8) -> AccountId {
    for n in 0..100u64 {
        let reporter = account(4_000 + n);
        let shards = engine.register_reporter(reporter, reporter_fee()).unwrap();
        if !shards.contains(shard) {
            return reporter;
        }
    }
    panic!("every reporter held shard {shard}");
}

/// Submits a response for `flight` operated by the carrier under test.
///
/// The scenarios all fly carrier `account(1)` at the shared departure.
pub fn submit(
    engine: &RegistryEngine,
    reporter: AccountId,
    shard: u8,
    flight: &str,
    status: FlightStatus,
) -> Result<SubmissionOutcome, RegistryError> {
    engine.submit_response(reporter, shard, account(1), flight, DEPARTURE, status)
}
