//! Inbound (Driving) ports for the Transaction Processor subsystem.
//!
//! Called by the client-facing transport.

use crate::notifier::ResponseSubscription;
use async_trait::async_trait;
use shared_types::entities::{ClientId, Transaction};

/// Transaction intake API.
#[async_trait]
pub trait TransactionProcessorApi: Send + Sync {
    /// Validate `transaction`, forward it to ordering if it passes, and
    /// publish exactly one `TransactionResponse` addressed to `client`.
    ///
    /// Returns once the response is queued for every current subscriber.
    /// Never waits for ordering or consensus.
    async fn handle(&self, client: ClientId, transaction: Transaction);

    /// Observe responses published from now on.
    fn subscribe(&self) -> ResponseSubscription;
}
