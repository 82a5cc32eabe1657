//! # Shared Bus
//!
//! Fan-out channel carrying transaction outcomes and block commit
//! notifications from the core to any number of observers.
//!
//! ```text
//! Transaction Processor ──┐                       ┌──→ client transport
//!                         ├──publish──→ Event Bus ┼──→ metrics / audit
//! Node (block commits) ───┘                       └──→ ...
//! ```
//!
//! ## Delivery
//!
//! - **Hot stream:** a subscription only sees events published after it was
//!   created.
//! - **Fan-out:** every subscriber receives every matching event through
//!   its own unbounded queue; a slow subscriber is warned about, never
//!   skipped.
//! - **Queued before return:** `publish` returns once the event sits in
//!   every matching subscriber's queue.
//! - **One order:** concurrent publishes are queued in the same relative
//!   order for all subscribers.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
mod registry;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Backlog at which a subscriber is reported as falling behind.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
