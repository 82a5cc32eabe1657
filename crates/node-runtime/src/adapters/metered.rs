//! # Metering Decorators
//!
//! Wrap the transaction processor's outbound ports so the subsystem crate
//! itself stays free of any metrics dependency.

use async_trait::async_trait;
use lc_02_transaction_processor::{OrderingError, OrderingGateway, StatelessValidator};
use ledger_telemetry::{ORDERING_FAILURES, STATELESS_OUTCOMES, TRANSACTIONS_RECEIVED};
use shared_types::entities::Transaction;

/// Counts received transactions and their stateless outcome.
pub struct MeteredValidator<V> {
    inner: V,
}

impl<V> MeteredValidator<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }
}

impl<V: StatelessValidator> StatelessValidator for MeteredValidator<V> {
    fn validate(&self, transaction: &Transaction) -> bool {
        TRANSACTIONS_RECEIVED.inc();
        let passed = self.inner.validate(transaction);
        let status = if passed { "passed" } else { "failed" };
        STATELESS_OUTCOMES.with_label_values(&[status]).inc();
        passed
    }
}

/// Counts failed hand-offs to ordering.
pub struct MeteredOrdering<O> {
    inner: O,
}

impl<O> MeteredOrdering<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: OrderingGateway> OrderingGateway for MeteredOrdering<O> {
    async fn propagate(&self, transaction: Transaction) -> Result<(), OrderingError> {
        let result = self.inner.propagate(transaction).await;
        if result.is_err() {
            ORDERING_FAILURES.inc();
        }
        result
    }
}
