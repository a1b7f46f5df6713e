//! End-to-end engine tests across halts, ledger outages, and concurrency.
//!
//! These tests exercise failure paths and delivery guarantees that the
//! module tests cannot reach:
//! - Settlement rolls back cleanly when the credit write fails
//! - Admission rounds survive a ledger outage and settle on retry
//! - The event stream reports opens, responses, and finalization in order
//! - Parallel submissions converge on a single settlement

use crate::mock_infrastructure::*;
use flightdeck_core::{errors::ErrorKind, events::OracleEvent, types::FlightStatus};
use std::sync::Arc;

#[test]
fn test_failed_credit_rolls_back_and_allows_resubmission() {
    let ledger = Arc::new(FailingLedger::new());
    let engine = build_engine_over(Arc::<FailingLedger>::clone(&ledger));
    admit_funded_carrier(&engine, account(1), "Aurora Air");
    engine.register_flight(account(1), "FD100", DEPARTURE).unwrap();
    engine.purchase_coverage(account(21), account(1), "FD100", DEPARTURE, 750).unwrap();

    let opened = engine.open_flight_request(account(9), account(1), "FD100", DEPARTURE).unwrap();
    let holders = reporters_holding(&engine, opened.shard, 3);
    submit(&engine, holders[0], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    submit(&engine, holders[1], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();

    // The crossing submission hits a dead credit store and must leave the
    // bucket as it found it.
    ledger.set_fail_credit(true);
    let mut rx = engine.subscribe();
    let err =
        submit(&engine, holders[2], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operational);
    assert!(rx.try_recv().is_err());
    assert_eq!(ledger.inner().credited_balance(account(21)), 0);

    // Once the store recovers the same reporter settles the round.
    ledger.set_fail_credit(false);
    let outcome =
        submit(&engine, holders[2], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    assert_eq!(outcome.responses, 3);
    assert!(outcome.finalized);
    assert_eq!(ledger.inner().credited_balance(account(21)), 750);
    assert!(matches!(rx.try_recv(), Ok(OracleEvent::ResponseRecorded { .. })));
    assert!(matches!(rx.try_recv(), Ok(OracleEvent::RequestFinalized { .. })));
}

#[test]
fn test_admission_round_survives_a_ledger_outage() {
    let ledger = Arc::new(FailingLedger::new());
    let engine = build_engine_over(Arc::<FailingLedger>::clone(&ledger));
    for (n, name) in [(1, "Aurora Air"), (2, "Borealis"), (3, "Cirrus Lines"), (4, "Dovetail")] {
        admit_funded_carrier(&engine, account(n), name);
    }
    // Vote in a fifth member so the next admission needs three endorsements.
    engine.propose_admission(operator(), account(5), "Eastwind").unwrap();
    engine.propose_admission(account(1), account(5), "Eastwind").unwrap();
    engine.fund_membership(account(5), min_stake()).unwrap();

    let candidate = account(6);
    engine.propose_admission(operator(), candidate, "Foehn").unwrap();
    engine.propose_admission(account(1), candidate, "Foehn").unwrap();

    // The crossing endorsement cannot persist the carrier; the recorded
    // votes must survive the failure.
    ledger.set_fail_register(true);
    let err = engine.propose_admission(account(2), candidate, "Foehn").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operational);
    assert_eq!(engine.pending_votes(), 2);

    ledger.set_fail_register(false);
    let outcome = engine.propose_admission(account(2), candidate, "Foehn").unwrap();
    assert!(outcome.admitted);
    assert_eq!(outcome.votes, 3);
    assert_eq!(engine.pending_votes(), 0);
}

#[test]
fn test_event_stream_reports_the_settlement_in_order() {
    let (engine, _ledger) = build_engine();
    admit_funded_carrier(&engine, account(1), "Aurora Air");
    engine.register_flight(account(1), "FD100", DEPARTURE).unwrap();
    engine.purchase_coverage(account(21), account(1), "FD100", DEPARTURE, 900).unwrap();

    let mut rx = engine.subscribe();
    let opened = engine.open_flight_request(account(9), account(1), "FD100", DEPARTURE).unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        OracleEvent::RequestOpened {
            shard: opened.shard,
            carrier: account(1),
            flight: "FD100".to_string(),
            departure: DEPARTURE,
        }
    );

    for reporter in reporters_holding(&engine, opened.shard, 3) {
        submit(&engine, reporter, opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    }

    for _ in 0..3 {
        assert_eq!(
            rx.try_recv().unwrap(),
            OracleEvent::ResponseRecorded {
                carrier: account(1),
                flight: "FD100".to_string(),
                departure: DEPARTURE,
                status: FlightStatus::LateCarrier,
            }
        );
    }
    assert_eq!(
        rx.try_recv().unwrap(),
        OracleEvent::RequestFinalized {
            carrier: account(1),
            flight: "FD100".to_string(),
            departure: DEPARTURE,
            status: FlightStatus::LateCarrier,
        }
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_halt_blocks_the_pipeline_until_resumed() {
    let (engine, ledger) = build_engine();
    admit_funded_carrier(&engine, account(1), "Aurora Air");
    engine.register_flight(account(1), "FD100", DEPARTURE).unwrap();
    engine.purchase_coverage(account(21), account(1), "FD100", DEPARTURE, 600).unwrap();
    let opened = engine.open_flight_request(account(9), account(1), "FD100", DEPARTURE).unwrap();
    let holders = reporters_holding(&engine, opened.shard, 3);
    submit(&engine, holders[0], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();

    engine.set_operating_status(operator(), false).unwrap();
    let err =
        submit(&engine, holders[1], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operational);

    // Resuming picks the round up where it stopped.
    engine.set_operating_status(operator(), true).unwrap();
    submit(&engine, holders[1], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    let third =
        submit(&engine, holders[2], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    assert!(third.finalized);
    assert_eq!(ledger.credited_balance(account(21)), 600);
}

#[test]
fn test_post_quorum_submissions_do_not_resettle() {
    let (engine, ledger) = build_engine();
    admit_funded_carrier(&engine, account(1), "Aurora Air");
    engine.register_flight(account(1), "FD100", DEPARTURE).unwrap();
    engine.purchase_coverage(account(21), account(1), "FD100", DEPARTURE, 800).unwrap();
    let opened = engine.open_flight_request(account(9), account(1), "FD100", DEPARTURE).unwrap();
    let holders = reporters_holding(&engine, opened.shard, 4);
    for reporter in &holders[..3] {
        submit(&engine, *reporter, opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    }
    assert_eq!(ledger.credited_balance(account(21)), 800);

    // The bucket stays open for audit but never settles twice.
    let mut rx = engine.subscribe();
    let late =
        submit(&engine, holders[3], opened.shard, "FD100", FlightStatus::LateCarrier).unwrap();
    assert_eq!(late.responses, 4);
    assert!(!late.finalized);
    assert_eq!(ledger.credited_balance(account(21)), 800);
    assert!(matches!(rx.try_recv(), Ok(OracleEvent::ResponseRecorded { .. })));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_parallel_submissions_settle_exactly_once() {
    let (engine, ledger) = build_engine();
    admit_funded_carrier(&engine, account(1), "Aurora Air");
    engine.register_flight(account(1), "FD100", DEPARTURE).unwrap();
    engine.purchase_coverage(account(21), account(1), "FD100", DEPARTURE, 1_250).unwrap();
    let opened = engine.open_flight_request(account(9), account(1), "FD100", DEPARTURE).unwrap();
    let holders = reporters_holding(&engine, opened.shard, 10);

    let mut rx = engine.subscribe();
    std::thread::scope(|scope| {
        let engine = &engine;
        for &reporter in &holders {
            scope.spawn(move || {
                submit(engine, reporter, opened.shard, "FD100", FlightStatus::LateCarrier)
                    .unwrap();
            });
        }
    });

    let mut recorded = 0;
    let mut finalized = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            OracleEvent::ResponseRecorded { .. } => recorded += 1,
            OracleEvent::RequestFinalized { .. } => finalized += 1,
            OracleEvent::RequestOpened { .. } => {}
        }
    }
    assert_eq!(recorded, 10);
    assert_eq!(finalized, 1);
    assert_eq!(ledger.credited_balance(account(21)), 1_250);
}
