//! Integration tests for carrier admission.
//!
//! These tests drive admissions through the full engine surface:
//! - Bootstrap nominations admit immediately while the registry is small
//! - Majority voting takes over once the bootstrap threshold is reached
//! - Endorsements pool on one shared round and clear on admission
//! - Duplicate endorsements are rejected without disturbing the round

use crate::mock_infrastructure::*;
use flightdeck_core::{
    admission::AdmissionError,
    engine::RegistryEngine,
    errors::{ErrorKind, RegistryError},
    ledger::LedgerStore,
    types::AccountId,
};

/// Admits and funds the four founding carriers through bootstrap nominations.
fn founding_members(engine: &RegistryEngine) -> Vec<AccountId> {
    let founders: Vec<AccountId> = (1..=4).map(account).collect();
    let names = ["Aurora Air", "Borealis", "Cirrus Lines", "Dovetail"];
    for (founder, name) in founders.iter().zip(names) {
        admit_funded_carrier(engine, *founder, name);
    }
    founders
}

#[test]
fn test_operator_nominations_bootstrap_the_registry() {
    let (engine, ledger) = build_engine();

    for (n, name) in [(1, "Aurora Air"), (2, "Borealis"), (3, "Cirrus Lines")] {
        let outcome = engine.propose_admission(operator(), account(n), name).unwrap();
        assert!(outcome.admitted);
        assert_eq!(outcome.votes, 1);
    }

    assert_eq!(ledger.carrier_count().unwrap(), 3);
    assert_eq!(engine.pending_votes(), 0);
}

#[test]
fn test_voting_takes_over_at_the_bootstrap_threshold() {
    let (engine, ledger) = build_engine();
    let founders = founding_members(&engine);
    let candidate = account(5);

    // Four members: the nomination is a vote now, and the threshold is two.
    let first = engine.propose_admission(operator(), candidate, "Eastwind").unwrap();
    assert!(!first.admitted);
    assert_eq!(first.votes, 1);
    assert!(!ledger.is_carrier_registered(candidate).unwrap());
    assert_eq!(engine.pending_votes(), 1);

    let second = engine.propose_admission(founders[0], candidate, "Eastwind").unwrap();
    assert!(second.admitted);
    assert_eq!(second.votes, 2);
    assert!(ledger.is_carrier_registered(candidate).unwrap());
    assert_eq!(ledger.carrier_count().unwrap(), 5);
    assert_eq!(engine.pending_votes(), 0);
}

#[test]
fn test_five_members_require_three_endorsements() {
    let (engine, ledger) = build_engine();
    let founders = founding_members(&engine);

    // Vote in the fifth member and fund it so it can endorse later rounds.
    engine.propose_admission(operator(), account(5), "Eastwind").unwrap();
    engine.propose_admission(founders[0], account(5), "Eastwind").unwrap();
    engine.fund_membership(account(5), min_stake()).unwrap();

    let candidate = account(6);
    assert!(!engine.propose_admission(operator(), candidate, "Foehn").unwrap().admitted);
    assert!(!engine.propose_admission(founders[1], candidate, "Foehn").unwrap().admitted);
    assert_eq!(engine.pending_votes(), 2);

    let third = engine.propose_admission(account(5), candidate, "Foehn").unwrap();
    assert!(third.admitted);
    assert_eq!(third.votes, 3);
    assert_eq!(ledger.carrier_count().unwrap(), 6);
    assert_eq!(engine.pending_votes(), 0);
}

#[test]
fn test_repeat_endorsements_are_rejected_without_counting() {
    let (engine, _ledger) = build_engine();
    let founders = founding_members(&engine);
    let candidate = account(5);

    engine.propose_admission(operator(), candidate, "Eastwind").unwrap();

    let err = engine.propose_admission(operator(), candidate, "Eastwind").unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Admission(AdmissionError::DuplicateVote(a)) if a == operator()
    ));
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(engine.pending_votes(), 1);

    // The rejected endorsement does not block the round from completing.
    assert!(engine.propose_admission(founders[0], candidate, "Eastwind").unwrap().admitted);
}

#[test]
fn test_endorsements_pool_across_competing_candidates() {
    let (engine, ledger) = build_engine();
    let founders = founding_members(&engine);

    // Two camps nominate different candidates into one shared round; the
    // crossing vote admits whichever candidate it names.
    engine.propose_admission(operator(), account(5), "Eastwind").unwrap();
    let outcome = engine.propose_admission(founders[0], account(6), "Foehn").unwrap();
    assert!(outcome.admitted);
    assert_eq!(outcome.votes, 2);
    assert!(ledger.is_carrier_registered(account(6)).unwrap());
    assert!(!ledger.is_carrier_registered(account(5)).unwrap());

    // Admission cleared the round; the next nomination starts from one.
    let fresh = engine.propose_admission(operator(), account(5), "Eastwind").unwrap();
    assert!(!fresh.admitted);
    assert_eq!(fresh.votes, 1);
}
