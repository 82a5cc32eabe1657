//! Outbound (Driven) ports for the Transaction Processor subsystem.
//!
//! These traits define the collaborators the intake pipeline calls out to.

use crate::domain::OrderingError;
use async_trait::async_trait;
use shared_types::entities::Transaction;

/// Stateless validation rules.
///
/// Pure: no I/O, no world state access.
pub trait StatelessValidator: Send + Sync {
    /// Returns true if the transaction may be forwarded to ordering.
    fn validate(&self, transaction: &Transaction) -> bool;
}

/// Gateway to the ordering service.
///
/// Fire-and-forget from the processor's point of view: implementations
/// must not wait for the transaction to be ordered or committed.
#[async_trait]
pub trait OrderingGateway: Send + Sync {
    /// Hand a validated transaction over for inclusion in a future block.
    ///
    /// # Errors
    /// * `OrderingError::QueueClosed` - The ordering side is gone
    /// * `OrderingError::Rejected` - The ordering service refused it
    async fn propagate(&self, transaction: Transaction) -> Result<(), OrderingError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> u64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: u64) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> u64 {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Validator returning a fixed verdict.
#[cfg(test)]
pub struct MockValidator(pub bool);

#[cfg(test)]
impl StatelessValidator for MockValidator {
    fn validate(&self, _transaction: &Transaction) -> bool {
        self.0
    }
}

/// Ordering gateway that records every propagated transaction.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingOrdering {
    pub propagated: std::sync::Mutex<Vec<Transaction>>,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingOrdering {
    pub fn failing() -> Self {
        Self {
            propagated: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Transaction> {
        self.propagated.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl OrderingGateway for RecordingOrdering {
    async fn propagate(&self, transaction: Transaction) -> Result<(), OrderingError> {
        self.propagated.lock().unwrap().push(transaction);
        if self.fail {
            return Err(OrderingError::Rejected {
                reason: "test".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source() {
        let now = SystemTimeSource.now();

        // Should be a reasonable timestamp (after year 2020)
        assert!(now > 1577836800000);
    }

    #[test]
    fn test_mock_time_source() {
        let source = MockTimeSource::new(1000);
        assert_eq!(source.now(), 1000);

        source.advance(500);
        assert_eq!(source.now(), 1500);
    }
}
