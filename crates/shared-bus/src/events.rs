//! # Ledger Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::Hash;
use shared_types::responses::TransactionResponse;

/// Subsystem id of the block application protocol.
pub const MUTABLE_STORAGE_SUBSYSTEM: u8 = 1;

/// Subsystem id of the transaction intake pipeline.
pub const TRANSACTION_PROCESSOR_SUBSYSTEM: u8 = 2;

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // SUBSYSTEM 2: TRANSACTION PROCESSOR
    // =========================================================================
    /// Outcome of stateless validation for one received transaction.
    /// Published exactly once per intake call.
    TransactionResponse(TransactionResponse),

    // =========================================================================
    // SUBSYSTEM 1: MUTABLE STORAGE
    // =========================================================================
    /// A block passed its acceptance predicate and is now the top block.
    BlockCommitted {
        /// Height of the committed block.
        height: u64,
        /// Hash of the committed block (the new top block hash).
        hash: Hash,
    },

    /// A block was discarded; world state is unchanged.
    BlockRejected {
        /// Height the block declared.
        height: u64,
        /// Hash of the discarded block.
        hash: Hash,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TransactionResponse(_) => EventTopic::Transactions,
            Self::BlockCommitted { .. } | Self::BlockRejected { .. } => EventTopic::Blocks,
        }
    }

    /// Get the originating subsystem ID.
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self {
            Self::TransactionResponse(_) => TRANSACTION_PROCESSOR_SUBSYSTEM,
            Self::BlockCommitted { .. } | Self::BlockRejected { .. } => MUTABLE_STORAGE_SUBSYSTEM,
        }
    }

    /// Short name used in logs and metric labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransactionResponse(_) => "transaction_response",
            Self::BlockCommitted { .. } => "block_committed",
            Self::BlockRejected { .. } => "block_rejected",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Transaction intake outcomes.
    Transactions,
    /// Block commit/discard notifications.
    Blocks,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<u8>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<u8>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}
