//! # Response Notifier
//!
//! Client-facing view of the shared bus: only `TransactionResponse`
//! events, unwrapped.

use shared_bus::{EventFilter, EventTopic, LedgerEvent, Subscription, SubscriptionError};
use shared_types::responses::TransactionResponse;
use tokio_stream::{Stream, StreamExt};

/// Filter selecting the events this subsystem publishes for clients.
pub fn response_filter() -> EventFilter {
    EventFilter::topics(vec![EventTopic::Transactions])
}

fn into_response(event: LedgerEvent) -> Option<TransactionResponse> {
    match event {
        LedgerEvent::TransactionResponse(response) => Some(response),
        _ => None,
    }
}

/// Hot subscription to transaction responses.
///
/// Sees only responses published after it was created, every one of them,
/// however slowly it is read. Dropping it unsubscribes.
pub struct ResponseSubscription {
    inner: Subscription,
}

impl ResponseSubscription {
    pub fn new(inner: Subscription) -> Self {
        Self { inner }
    }

    /// Next response, or `None` once the bus is gone and the queue drained.
    pub async fn recv(&mut self) -> Option<TransactionResponse> {
        loop {
            let event = self.inner.recv().await?;
            if let Some(response) = into_response(event) {
                return Some(response);
            }
        }
    }

    /// Non-blocking receive. `Ok(None)` means nothing is pending.
    pub fn try_recv(&mut self) -> Result<Option<TransactionResponse>, SubscriptionError> {
        while let Some(event) = self.inner.try_recv()? {
            if let Some(response) = into_response(event) {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    /// Responses queued and not yet taken.
    pub fn pending(&self) -> usize {
        self.inner.pending()
    }

    pub fn into_stream(self) -> impl Stream<Item = TransactionResponse> + Unpin + Send {
        self.inner.into_stream().filter_map(into_response)
    }
}
