//! # Ledger Telemetry
//!
//! Observability for a Ledger-Core node.
//!
//! - Logging: `tracing-subscriber` registry with an `EnvFilter` and either a
//!   pretty or a JSON `fmt` layer
//! - Metrics: process-global Prometheus collectors, exported as text
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LEDGER_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `LEDGER_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `LEDGER_SERVICE_NAME` | `ledger-core` | Service name attached to the startup log |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BLOCK_APPLY_DURATION, BLOCK_APPLY_OUTCOMES,
    BLOCK_CHECKS, BUS_EVENTS_PUBLISHED, CHAIN_HEIGHT, ORDERING_FAILURES, STATELESS_OUTCOMES,
    TRANSACTIONS_RECEIVED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics and install the global log subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the filter directive
/// does not parse.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Start timing into a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
