//! # Node Configuration
//!
//! Runtime parameters of a node, loaded from `LEDGER_*` environment
//! variables. Unset variables fall back to defaults; set but unparsable
//! ones are an error.

use lc_02_transaction_processor::ValidatorConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Backlog at which a slow bus subscriber is reported.
    pub event_bus_capacity: usize,
    /// Stateless validation limits.
    pub validator: ValidatorConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            validator: ValidatorConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),
}

impl NodeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `LEDGER_EVENT_BUS_CAPACITY` (default: 1000)
    /// - `LEDGER_MAX_COMMANDS` (default: 1024)
    /// - `LEDGER_MAX_SIGNATURES` (default: 64)
    /// - `LEDGER_TX_MAX_AGE_MS` (default: 86400000)
    /// - `LEDGER_TX_FUTURE_TOLERANCE_MS` (default: 300000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let validator = ValidatorConfig {
            max_commands: parse_or(&lookup, "LEDGER_MAX_COMMANDS", defaults.validator.max_commands)?,
            max_signatures: parse_or(
                &lookup,
                "LEDGER_MAX_SIGNATURES",
                defaults.validator.max_signatures,
            )?,
            max_age_ms: parse_or(&lookup, "LEDGER_TX_MAX_AGE_MS", defaults.validator.max_age_ms)?,
            future_tolerance_ms: parse_or(
                &lookup,
                "LEDGER_TX_FUTURE_TOLERANCE_MS",
                defaults.validator.future_tolerance_ms,
            )?,
            ..defaults.validator
        };

        Ok(Self {
            event_bus_capacity: parse_or(
                &lookup,
                "LEDGER_EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity,
            )?,
            validator,
        })
    }

    /// Reject values the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("LEDGER_EVENT_BUS_CAPACITY", self.event_bus_capacity as u64),
            ("LEDGER_MAX_COMMANDS", self.validator.max_commands as u64),
            ("LEDGER_MAX_SIGNATURES", self.validator.max_signatures as u64),
            ("LEDGER_TX_MAX_AGE_MS", self.validator.max_age_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::MustBePositive(key));
            }
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw,
            expected: std::any::type_name::<T>(),
        }),
    }
}
