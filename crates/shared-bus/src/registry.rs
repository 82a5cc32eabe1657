//! Live subscribers and the queues feeding them.

use crate::events::{EventFilter, EventTopic, LedgerEvent};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Undelivered events queued for one subscriber.
///
/// Incremented before an event is queued and decremented when the
/// subscriber takes it, so it never underflows.
pub(crate) type Backlog = Arc<AtomicUsize>;

struct Slot {
    id: u64,
    filter: EventFilter,
    sender: mpsc::UnboundedSender<LedgerEvent>,
    backlog: Backlog,
}

impl Slot {
    fn is_catch_all(&self) -> bool {
        self.filter.topics.is_empty() || self.filter.topics.contains(&EventTopic::All)
    }
}

/// Every live subscription with its own unbounded queue.
///
/// Delivery happens under one lock, so all subscribers observe events in
/// the same order and nothing is dropped for a slow reader.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    slots: Mutex<Vec<Slot>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl SubscriberRegistry {
    /// Add a subscriber. The returned lease removes it on drop.
    ///
    /// After [`close`](Self::close) the receiver is handed out already closed.
    pub(crate) fn register(
        self: &Arc<Self>,
        filter: EventFilter,
    ) -> (mpsc::UnboundedReceiver<LedgerEvent>, Backlog, SubscriptionLease) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let backlog = Backlog::default();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut slots = self.slots.lock();
        if !self.closed.load(Ordering::Acquire) {
            slots.push(Slot {
                id,
                filter,
                sender,
                backlog: Arc::clone(&backlog),
            });
        }
        drop(slots);

        let lease = SubscriptionLease {
            registry: Arc::clone(self),
            id,
        };
        (receiver, backlog, lease)
    }

    /// Queue `event` for every subscriber whose filter selects it.
    ///
    /// Subscribers whose backlog reaches `warn_at` are logged once per
    /// crossing. Returns how many subscribers the event was queued for.
    pub(crate) fn deliver(&self, event: &LedgerEvent, warn_at: usize) -> usize {
        let mut slots = self.slots.lock();
        slots.retain(|slot| !slot.sender.is_closed());

        let mut delivered = 0;
        for slot in slots.iter().filter(|slot| slot.filter.matches(event)) {
            let backlog = slot.backlog.fetch_add(1, Ordering::AcqRel) + 1;
            if slot.sender.send(event.clone()).is_err() {
                slot.backlog.fetch_sub(1, Ordering::AcqRel);
                continue;
            }
            delivered += 1;
            if backlog == warn_at {
                warn!(subscriber = slot.id, backlog, "Subscriber is falling behind");
            }
        }
        delivered
    }

    /// Drop every queue sender; receivers drain what is left and then end.
    pub(crate) fn close(&self) {
        let mut slots = self.slots.lock();
        self.closed.store(true, Ordering::Release);
        slots.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Live subscriptions that would see events of `topic`.
    ///
    /// For `EventTopic::All` only catch-all subscriptions are counted.
    pub(crate) fn interested_in(&self, topic: EventTopic) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|slot| {
                slot.is_catch_all()
                    || (topic != EventTopic::All && slot.filter.topics.contains(&topic))
            })
            .count()
    }

    fn remove(&self, id: u64) {
        self.slots.lock().retain(|slot| slot.id != id);
    }
}

/// Held by a subscription for as long as it lives.
pub(crate) struct SubscriptionLease {
    registry: Arc<SubscriberRegistry>,
    id: u64,
}

impl Drop for SubscriptionLease {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
