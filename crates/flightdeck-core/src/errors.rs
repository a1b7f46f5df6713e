//! Unified error surface for the registry engine.
//!
//! Subsystem errors ([`AdmissionError`], [`OracleError`], [`LedgerError`])
//! stay exhaustive and close to their modules; [`RegistryError`] wraps them
//! at the engine boundary and adds the checks only the engine performs.
//! Callers that do not care about the exact failure can branch on
//! [`RegistryError::kind`] instead.

use crate::admission::AdmissionError;
use crate::ledger::LedgerError;
use crate::oracle::OracleError;
use crate::types::{AccountId, Amount};
use thiserror::Error;

/// Coarse classification of a [`RegistryError`].
///
/// Exactly one kind applies to every error the engine can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The registry or its ledger cannot serve the operation right now.
    Operational,
    /// The caller is not allowed to perform the operation.
    Authorization,
    /// The operation's inputs fail a precondition.
    Validation,
    /// The operation would duplicate existing state.
    Duplicate,
    /// The operation does not match an assignment or an open request.
    Match,
}

impl ErrorKind {
    /// Stable lowercase name, suitable for log fields and metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::Duplicate => "duplicate",
            Self::Match => "match",
        }
    }

    /// Whether the caller caused the failure (as opposed to the registry).
    #[must_use]
    pub const fn is_caller_fault(&self) -> bool {
        !matches!(self, Self::Operational)
    }
}

/// Any failure an engine operation can return.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry's operating switch is off.
    #[error("Registry is not operational")]
    Halted,

    /// The account may not perform this operation.
    #[error("Account {0} is not authorized for this operation")]
    NotAuthorized(AccountId),

    /// The nominated candidate is already an admitted carrier.
    #[error("Carrier {0} is already a member")]
    CandidateAlreadyMember(AccountId),

    /// The membership stake offered is below the configured minimum.
    #[error("Offered stake {offered} is below the required minimum {required}")]
    StakeBelowMinimum {
        /// Stake attached to the funding call.
        offered: Amount,
        /// Configured minimum.
        required: Amount,
    },

    /// Coverage purchases must carry a positive amount.
    #[error("Coverage amount must be greater than zero")]
    ZeroCoverageAmount,

    /// Failure raised by the admission voter.
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// Failure raised by the oracle pipeline.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Failure raised by the ledger backend.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    /// Classifies the error into its [`ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Halted => ErrorKind::Operational,
            Self::NotAuthorized(_) => ErrorKind::Authorization,
            Self::CandidateAlreadyMember(_) => ErrorKind::Duplicate,
            Self::StakeBelowMinimum { .. } | Self::ZeroCoverageAmount => ErrorKind::Validation,
            Self::Admission(AdmissionError::DuplicateVote(_)) => ErrorKind::Duplicate,
            Self::Admission(AdmissionError::Ledger(inner)) => ledger_kind(inner),
            Self::Oracle(inner) => match inner {
                OracleError::FeeBelowMinimum { .. } => ErrorKind::Validation,
                OracleError::ReporterUnknown(_) => ErrorKind::Authorization,
                OracleError::ShardNotAssigned { .. } | OracleError::UnknownRequest(_) => {
                    ErrorKind::Match
                }
                OracleError::EntropyExhausted { .. } => ErrorKind::Operational,
            },
            Self::Ledger(inner) => ledger_kind(inner),
        }
    }
}

fn ledger_kind(error: &LedgerError) -> ErrorKind {
    match error {
        LedgerError::Storage(_) => ErrorKind::Operational,
        LedgerError::UnknownCarrier(_) => ErrorKind::Authorization,
        LedgerError::CarrierExists(_) => ErrorKind::Duplicate,
        LedgerError::NothingToWithdraw(_) => ErrorKind::Validation,
    }
}
