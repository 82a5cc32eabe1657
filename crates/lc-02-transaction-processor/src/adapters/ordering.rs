//! # Channel Ordering Gateway
//!
//! Hands passed transactions to the ordering service through an unbounded
//! in-process queue. The receiving half is owned by whoever drives ordering.

use crate::domain::OrderingError;
use crate::ports::outbound::OrderingGateway;
use async_trait::async_trait;
use shared_types::entities::Transaction;
use tokio::sync::mpsc;
use tracing::trace;

/// Sending half. Never blocks the intake path.
#[derive(Clone)]
pub struct ChannelOrderingGateway {
    sender: mpsc::UnboundedSender<Transaction>,
}

/// Receiving half, consumed by the ordering service.
pub struct OrderingQueue {
    receiver: mpsc::UnboundedReceiver<Transaction>,
}

impl ChannelOrderingGateway {
    /// Create a connected gateway/queue pair.
    pub fn channel() -> (Self, OrderingQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, OrderingQueue { receiver })
    }

    /// Returns true once the queue side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[async_trait]
impl OrderingGateway for ChannelOrderingGateway {
    async fn propagate(&self, transaction: Transaction) -> Result<(), OrderingError> {
        self.sender
            .send(transaction)
            .map_err(|_| OrderingError::QueueClosed)?;
        trace!("Transaction queued for ordering");
        Ok(())
    }
}

impl OrderingQueue {
    /// Next queued transaction, or `None` once every gateway is dropped.
    pub async fn recv(&mut self) -> Option<Transaction> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Transaction> {
        self.receiver.try_recv().ok()
    }
}
