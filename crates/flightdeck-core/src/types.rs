//! Shared identity and value types used across the registry core.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Length of an [`AccountId`] in bytes.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Monetary amounts in the ledger's smallest currency unit.
///
/// The core never interprets amounts beyond comparing them against
/// configured minimums; currency semantics belong to the ledger backend.
pub type Amount = u64;

/// Opaque 20-byte account identity.
///
/// Used as the map key for carriers, reporters, voters, and policyholders.
/// The core never derives meaning from the bytes; it only compares them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    /// Wraps raw identity bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an identity from a small integer, big-endian in the low bytes.
    ///
    /// Convenient for tests and examples; production identities come from
    /// the caller's signing infrastructure.
    #[must_use]
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; ACCOUNT_ID_LENGTH];
        bytes[ACCOUNT_ID_LENGTH - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Returns the raw identity bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

/// Error returned when parsing an [`AccountId`] from text fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid account id: {0}")]
pub struct ParseAccountIdError(String);

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|_| ParseAccountIdError(format!("bad hex in '{s}'")))?;
        let bytes: [u8; ACCOUNT_ID_LENGTH] = bytes.try_into().map_err(|decoded: Vec<u8>| {
            ParseAccountIdError(format!(
                "expected {ACCOUNT_ID_LENGTH} bytes, got {}",
                decoded.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Flight status as reported by oracles.
///
/// The numeric codes are the wire values reporters submit; they are spaced
/// by ten so intermediate codes can be introduced without renumbering.
/// `LateCarrier` is the one actionable status: finalizing a request on it
/// credits the flight's policyholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    /// Status not yet known.
    Unknown,
    /// Flight departed on time.
    OnTime,
    /// Delay attributable to the carrier.
    LateCarrier,
    /// Delay caused by weather.
    LateWeather,
    /// Delay caused by a technical fault.
    LateTechnical,
    /// Delay with an unclassified cause.
    LateOther,
}

impl FlightStatus {
    /// Returns the numeric wire code for this status.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::OnTime => 10,
            Self::LateCarrier => 20,
            Self::LateWeather => 30,
            Self::LateTechnical => 40,
            Self::LateOther => 50,
        }
    }

    /// Parses a numeric wire code. Returns `None` for unassigned codes.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            10 => Some(Self::OnTime),
            20 => Some(Self::LateCarrier),
            30 => Some(Self::LateWeather),
            40 => Some(Self::LateTechnical),
            50 => Some(Self::LateOther),
            _ => None,
        }
    }

    /// Returns `true` if finalizing on this status triggers a policy credit.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::LateCarrier)
    }

    /// Returns a static string representation for log and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::OnTime => "on_time",
            Self::LateCarrier => "late_carrier",
            Self::LateWeather => "late_weather",
            Self::LateTechnical => "late_technical",
            Self::LateOther => "late_other",
        }
    }
}
