//! Registry configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `FLIGHTDECK_CONFIG` env var
//! 3. **Environment variables**: `FLIGHTDECK_*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`AdmissionConfig`]: Carrier admission thresholds and stake minimum
//! - [`OracleConfig`]: Quorum size, shard space, and entropy sampling
//! - [`EventsConfig`]: Event broadcast channel sizing
//!
//! # Validation
//!
//! Configuration is validated at load time. Invalid configurations (e.g.,
//! a zero quorum or a shard space too small to assign distinct shards)
//! return errors rather than failing silently.
//!
//! # Example
//!
//! ```toml
//! [admission]
//! bootstrap_threshold = 4
//! min_carrier_stake = 10000000000
//!
//! [oracle]
//! quorum_size = 3
//! shard_count = 10
//! ```

use crate::types::Amount;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Carrier admission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Member count below which nominations are admitted without a vote.
    /// Defaults to `4`.
    #[serde(default = "default_bootstrap_threshold")]
    pub bootstrap_threshold: usize,

    /// Minimum stake a carrier must put up to become funded. Defaults to
    /// `10_000_000_000`.
    #[serde(default = "default_min_carrier_stake")]
    pub min_carrier_stake: Amount,
}

fn default_bootstrap_threshold() -> usize {
    4
}

fn default_min_carrier_stake() -> Amount {
    10_000_000_000
}

/// Oracle pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Matching responses required to finalize a request. Defaults to `3`.
    #[serde(default = "default_quorum_size")]
    pub quorum_size: usize,

    /// Size of the shard space requests are routed over. Must be at least
    /// `3` so a reporter can hold distinct shards. Defaults to `10`.
    #[serde(default = "default_shard_count")]
    pub shard_count: u8,

    /// Highest entropy feed position the sampler rotates through before
    /// wrapping to zero. Defaults to `250`.
    #[serde(default = "default_entropy_lookback")]
    pub entropy_lookback: u32,

    /// Minimum fee a reporter must attach when registering. Defaults to
    /// `1_000_000_000`.
    #[serde(default = "default_reporter_fee")]
    pub reporter_fee: Amount,

    /// Redraw budget when shard draws collide. Defaults to `32`.
    #[serde(default = "default_max_draw_attempts")]
    pub max_draw_attempts: u32,
}

fn default_quorum_size() -> usize {
    3
}

fn default_shard_count() -> u8 {
    10
}

fn default_entropy_lookback() -> u32 {
    250
}

fn default_reporter_fee() -> Amount {
    1_000_000_000
}

fn default_max_draw_attempts() -> u32 {
    32
}

/// Event broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Capacity of the broadcast channel behind [`subscribe`]. Slow
    /// subscribers start missing events once it fills. Defaults to `256`.
    ///
    /// [`subscribe`]: crate::engine::RegistryEngine::subscribe
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    256
}

/// Root registry configuration containing all subsystem settings.
///
/// Loaded from TOML files and environment variables. Environment overrides
/// use the `FLIGHTDECK_` prefix with `__` as a separator (e.g.
/// `FLIGHTDECK__ORACLE__QUORUM_SIZE=5`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Carrier admission settings.
    #[serde(default)]
    pub admission: AdmissionConfig,

    /// Oracle pipeline settings.
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Event broadcast settings.
    #[serde(default)]
    pub events: EventsConfig,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self { bootstrap_threshold: 4, min_carrier_stake: 10_000_000_000 }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            quorum_size: 3,
            shard_count: 10,
            entropy_lookback: 250,
            reporter_fee: 1_000_000_000,
            max_draw_attempts: 32,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { channel_capacity: 256 }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            admission: AdmissionConfig::default(),
            oracle: OracleConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// Environment variables with the `FLIGHTDECK__` prefix can override any
    /// configuration value. Use `__` as a separator for nested fields (e.g.,
    /// `FLIGHTDECK__ADMISSION__BOOTSTRAP_THRESHOLD=6`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// deserialized. A missing file is not an error; defaults apply.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("admission.bootstrap_threshold", 4)?
            .set_default("admission.min_carrier_stake", 10_000_000_000_u64)?
            .set_default("oracle.quorum_size", 3)?
            .set_default("oracle.shard_count", 10)?
            .set_default("oracle.entropy_lookback", 250)?
            .set_default("oracle.reporter_fee", 1_000_000_000_u64)?
            .set_default("oracle.max_draw_attempts", 32)?
            .set_default("events.channel_capacity", 256)?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("FLIGHTDECK").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/registry.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `FLIGHTDECK_CONFIG`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("FLIGHTDECK_CONFIG")
            .unwrap_or_else(|_| "config/registry.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates the configuration for correctness and consistency.
    ///
    /// Checks include:
    /// - All thresholds and counts are greater than zero
    /// - The shard space is large enough to assign three distinct shards
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.admission.bootstrap_threshold == 0 {
            return Err("Bootstrap threshold must be greater than 0".to_string());
        }

        if self.oracle.quorum_size == 0 {
            return Err("Quorum size must be greater than 0".to_string());
        }

        if self.oracle.shard_count < 3 {
            return Err("Shard count must be at least 3 to assign distinct shards".to_string());
        }

        if self.oracle.entropy_lookback == 0 {
            return Err("Entropy lookback must be greater than 0".to_string());
        }

        if self.oracle.max_draw_attempts == 0 {
            return Err("Max draw attempts must be greater than 0".to_string());
        }

        if self.events.channel_capacity == 0 {
            return Err("Event channel capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
