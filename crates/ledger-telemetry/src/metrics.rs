//! Prometheus metrics for Ledger-Core.
//!
//! All metrics follow the naming convention: `ledger_<area>_<metric>_<unit>`.
//! Collectors live in a process-global registry so that instrumentation
//! points can record without threading a handle through every call.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTION PROCESSOR
    // =========================================================================

    /// Transactions handed to the intake pipeline
    pub static ref TRANSACTIONS_RECEIVED: IntCounter = IntCounter::new(
        "ledger_txp_transactions_received_total",
        "Total transactions received for stateless validation"
    ).expect("metric creation failed");

    /// Stateless validation outcomes
    pub static ref STATELESS_OUTCOMES: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_txp_stateless_outcomes_total", "Stateless validation outcomes"),
        &["status"]  // passed / failed
    ).expect("metric creation failed");

    /// Failed hand-offs to ordering
    pub static ref ORDERING_FAILURES: IntCounter = IntCounter::new(
        "ledger_txp_ordering_failures_total",
        "Passed transactions the ordering gateway refused"
    ).expect("metric creation failed");

    // =========================================================================
    // MUTABLE STORAGE
    // =========================================================================

    /// Block apply outcomes
    pub static ref BLOCK_APPLY_OUTCOMES: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_storage_block_apply_total", "Block apply outcomes"),
        &["outcome"]  // committed / discarded
    ).expect("metric creation failed");

    /// Dry-run block checks
    pub static ref BLOCK_CHECKS: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_storage_block_checks_total", "Block check outcomes"),
        &["outcome"]  // accepted / rejected
    ).expect("metric creation failed");

    /// Time spent executing and committing a block
    pub static ref BLOCK_APPLY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ledger_storage_block_apply_duration_seconds",
            "Time spent applying blocks to the world state"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid bucket layout"))
    ).expect("metric creation failed");

    /// Height of the current top block
    pub static ref CHAIN_HEIGHT: Gauge = Gauge::new(
        "ledger_storage_chain_height",
        "Height of the current top block"
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT BUS
    // =========================================================================

    /// Events published on the shared bus, by kind
    pub static ref BUS_EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_bus_events_published_total", "Events published on the shared bus"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it again is a no-op.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Transaction processor
        Box::new(TRANSACTIONS_RECEIVED.clone()),
        Box::new(STATELESS_OUTCOMES.clone()),
        Box::new(ORDERING_FAILURES.clone()),
        // Storage
        Box::new(BLOCK_APPLY_OUTCOMES.clone()),
        Box::new(BLOCK_CHECKS.clone()),
        Box::new(BLOCK_APPLY_DURATION.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        // Event bus
        Box::new(BUS_EVENTS_PUBLISHED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_is_ok() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_encode_contains_registered_metrics() {
        register_metrics().unwrap();
        TRANSACTIONS_RECEIVED.inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("ledger_txp_transactions_received_total"));
    }

    #[test]
    fn test_labelled_counter() {
        let before = STATELESS_OUTCOMES.with_label_values(&["passed"]).get();
        STATELESS_OUTCOMES.with_label_values(&["passed"]).inc();
        assert!(STATELESS_OUTCOMES.with_label_values(&["passed"]).get() > before);
    }

    #[test]
    fn test_histogram_timer() {
        let before = BLOCK_APPLY_DURATION.get_sample_count();
        {
            let _timer = HistogramTimer::new(&BLOCK_APPLY_DURATION);
        }
        assert!(BLOCK_APPLY_DURATION.get_sample_count() > before);
    }
}
