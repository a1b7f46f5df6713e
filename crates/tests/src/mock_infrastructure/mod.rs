//! Mock Infrastructure for Testing the Flightdeck Registry
//!
//! This module provides reusable test doubles and fixtures for exercising
//! the registry engine without a durable ledger backend.
//!
//! ## Components
//!
//! - `FailingLedger`: An in-memory ledger whose write paths can be toggled
//!   to fail, for exercising rollback behavior
//! - Test helpers for building engines and walking accounts through
//!   admission and reporter registration
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{account, build_engine, operator};
//!
//! let (engine, ledger) = build_engine();
//! engine.propose_admission(operator(), account(1), "Aurora Air").unwrap();
//! ```

pub mod failing_ledger;
pub mod helpers;

pub use failing_ledger::FailingLedger;
pub use helpers::*;
