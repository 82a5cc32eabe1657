//! # Event Publisher
//!
//! The sending half of the bus and the in-process bus itself.

use crate::events::{EventFilter, EventTopic, LedgerEvent};
use crate::registry::SubscriberRegistry;
use crate::subscriber::{EventStream, EventSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Anything events can be published to.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Queue `event` for every current subscriber it matches.
    ///
    /// Returns how many subscribers it was queued for; zero is not an error.
    async fn publish(&self, event: LedgerEvent) -> usize;

    /// Events published so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Single-node bus with one unbounded queue per subscriber.
///
/// No event is ever dropped for a live subscriber. `capacity` is the backlog
/// at which a slow subscriber is reported; it does not bound the queue.
pub struct InMemoryEventBus {
    registry: Arc<SubscriberRegistry>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus reporting subscribers once `capacity` events are waiting for them.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: Arc::default(),
            published: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Start receiving events that match `filter`.
    ///
    /// Events published before this call are never delivered to it.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "Subscription opened");
        let (receiver, backlog, lease) = self.registry.register(filter.clone());
        Subscription::new(receiver, backlog, filter, lease)
    }

    /// [`subscribe`](Self::subscribe) as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    /// Queue `event` for every matching subscriber without awaiting.
    ///
    /// Once this returns the event sits in each of their queues, in the same
    /// relative order for all of them.
    pub fn deliver(&self, event: LedgerEvent) -> usize {
        let kind = event.kind();
        self.published.fetch_add(1, Ordering::Relaxed);

        let receivers = self.registry.deliver(&event, self.capacity);
        debug!(kind, receivers, "Event published");
        receivers
    }

    /// Live subscriptions, whatever their filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Live subscriptions whose filter selects `topic`.
    #[must_use]
    pub fn topic_subscriptions(&self, topic: EventTopic) -> usize {
        self.registry.interested_in(topic)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InMemoryEventBus {
    fn drop(&mut self) {
        self.registry.close();
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> usize {
        self.deliver(event)
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::entities::Hash;

    fn committed() -> LedgerEvent {
        LedgerEvent::BlockCommitted {
            height: 1,
            hash: Hash::default(),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_counts_but_reaches_nobody() {
        let bus = InMemoryEventBus::new();

        assert_eq!(bus.publish(committed()).await, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_counts_only_matching_subscribers() {
        let bus = InMemoryEventBus::new();
        let _all = bus.subscribe(EventFilter::all());
        let _blocks = bus.subscribe(EventFilter::topics(vec![EventTopic::Blocks]));
        let _txs = bus.subscribe(EventFilter::topics(vec![EventTopic::Transactions]));

        assert_eq!(bus.publish(committed()).await, 2);
        assert_eq!(bus.subscriber_count(), 3);
        assert_eq!(bus.topic_subscriptions(EventTopic::Blocks), 2);
        assert_eq!(bus.topic_subscriptions(EventTopic::All), 1);
    }

    #[test]
    fn test_deliver_outside_runtime() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        assert_eq!(bus.deliver(committed()), 1);
        assert_eq!(sub.try_recv(), Ok(Some(committed())));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(InMemoryEventBus::default().capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(InMemoryEventBus::with_capacity(100).capacity(), 100);
        assert_eq!(InMemoryEventBus::with_capacity(0).capacity(), 1);
    }
}
