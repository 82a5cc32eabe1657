//! # Event Subscriber
//!
//! Receiving half of the bus.
//!
//! Subscriptions are hot: they start empty and only see what is published
//! while they are alive. Each one owns an unbounded queue, so a slow reader
//! falls behind but never misses an event.

use crate::events::{EventFilter, LedgerEvent};
use crate::registry::{Backlog, SubscriptionLease};
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_stream::Stream;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher is gone and the queue is drained.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that hands out subscriptions.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Pull-style handle on the bus. Dropping it unsubscribes.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<LedgerEvent>,
    backlog: Backlog,
    filter: EventFilter,
    _lease: SubscriptionLease,
}

impl Subscription {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<LedgerEvent>,
        backlog: Backlog,
        filter: EventFilter,
        lease: SubscriptionLease,
    ) -> Self {
        Self {
            receiver,
            backlog,
            filter,
            _lease: lease,
        }
    }

    /// Wait for the next matching event. `None` once the bus is dropped
    /// and everything queued has been taken.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        let event = self.receiver.recv().await?;
        self.backlog.fetch_sub(1, Ordering::AcqRel);
        Some(event)
    }

    /// Next matching event if one is already queued.
    ///
    /// `Ok(None)` means nothing is pending right now.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => {
                self.backlog.fetch_sub(1, Ordering::AcqRel);
                Ok(Some(event))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Events queued for this subscription and not yet taken.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.backlog.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream { inner: self }
    }
}

/// [`Subscription`] as a `tokio_stream::Stream`.
pub struct EventStream {
    inner: Subscription,
}

impl EventStream {
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        self.inner.filter()
    }
}

impl Stream for EventStream {
    type Item = LedgerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let inner = &mut self.inner;
        let event = ready!(inner.receiver.poll_recv(cx));
        if event.is_some() {
            inner.backlog.fetch_sub(1, Ordering::AcqRel);
        }
        Poll::Ready(event)
    }
}
