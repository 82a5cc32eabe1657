//! # Ledger Node
//!
//! Owns one instance of each subsystem plus the shared bus.
//!
//! The node holds the only mutation context of its world state for its
//! whole lifetime, so block commits are serialized here and a second node
//! over the same backend cannot be built. A block's `BlockCommitted` or
//! `BlockRejected` event is queued before the next commit starts, so block
//! events reach subscribers in commit order.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tracing::{info, instrument};

use lc_01_mutable_storage::domain::predicates::{chains_onto_top, variant_chains_onto_top};
use lc_01_mutable_storage::{
    InMemoryWorldState, MutableStorage, WorldStateBackend, WsvMutableStorage, WsvQuery,
};
use lc_02_transaction_processor::{
    ChannelOrderingGateway, OrderingQueue, ResponseSubscription, StatelessRules,
    TransactionProcessorApi, TransactionProcessorService,
};
use ledger_telemetry::{
    register_metrics, time_histogram, BLOCK_APPLY_DURATION, BLOCK_APPLY_OUTCOMES, BLOCK_CHECKS,
    BUS_EVENTS_PUBLISHED, CHAIN_HEIGHT,
};
use shared_bus::{EventFilter, InMemoryEventBus, LedgerEvent, Subscription};
use shared_types::entities::{Block, BlockVariant, ClientId, Hash, Transaction};

use crate::adapters::{MeteredOrdering, MeteredValidator};
use crate::container::config::NodeConfig;

/// Transaction processor as wired by the node.
pub type NodeProcessor = TransactionProcessorService<
    MeteredValidator<StatelessRules>,
    MeteredOrdering<ChannelOrderingGateway>,
>;

/// A single ledger node.
pub struct LedgerNode {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    world_state: Arc<InMemoryWorldState>,
    storage: Mutex<WsvMutableStorage<InMemoryWorldState>>,
    processor: NodeProcessor,
}

impl LedgerNode {
    /// Build a node over an empty world state.
    ///
    /// Returns the node and the queue its ordering gateway feeds.
    pub fn new(config: NodeConfig) -> anyhow::Result<(Self, OrderingQueue)> {
        Self::with_world_state(config, Arc::new(InMemoryWorldState::new()))
    }

    /// Build a node from `LEDGER_*` environment variables.
    pub fn from_env() -> anyhow::Result<(Self, OrderingQueue)> {
        let config = NodeConfig::from_env().context("Failed to load node configuration")?;
        Self::new(config)
    }

    /// Build a node over an existing world state.
    ///
    /// Fails if the configuration is invalid or `world_state` already has
    /// an open mutation context.
    #[instrument(name = "node_init", skip_all)]
    pub fn with_world_state(
        config: NodeConfig,
        world_state: Arc<InMemoryWorldState>,
    ) -> anyhow::Result<(Self, OrderingQueue)> {
        config.validate().context("Invalid node configuration")?;
        register_metrics().context("Failed to register node metrics")?;

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_bus_capacity));

        let storage = WsvMutableStorage::new(Arc::clone(&world_state))
            .context("Failed to open world state for mutation")?;
        CHAIN_HEIGHT.set(world_state.height() as f64);

        let (gateway, queue) = ChannelOrderingGateway::channel();
        let processor = TransactionProcessorService::new(
            MeteredValidator::new(StatelessRules::new(config.validator.clone())),
            MeteredOrdering::new(gateway),
            Arc::clone(&bus),
        );

        info!(
            bus_capacity = config.event_bus_capacity,
            height = world_state.height(),
            "Ledger node initialized"
        );

        let node = Self {
            config,
            bus,
            world_state,
            storage: Mutex::new(storage),
            processor,
        };
        Ok((node, queue))
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Read access to the world state.
    pub fn world_state(&self) -> &Arc<InMemoryWorldState> {
        &self.world_state
    }

    pub fn top_block_hash(&self) -> Hash {
        self.world_state.top_block_hash()
    }

    pub fn height(&self) -> u64 {
        self.world_state.height()
    }

    /// Run a client transaction through the intake pipeline.
    pub async fn handle(&self, client: ClientId, transaction: Transaction) {
        self.processor.handle(client, transaction).await;
        BUS_EVENTS_PUBLISHED
            .with_label_values(&["transaction_response"])
            .inc();
    }

    /// Transaction responses published from now on.
    pub fn subscribe(&self) -> ResponseSubscription {
        self.processor.subscribe()
    }

    /// Any bus events matching `filter`, published from now on.
    pub fn subscribe_events(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Dry run: would `block` chain onto the current top and execute cleanly?
    pub fn check_block(&self, block: &BlockVariant) -> bool {
        let accepted = self
            .storage
            .lock()
            .check(block, &variant_chains_onto_top);

        let outcome = if accepted { "accepted" } else { "rejected" };
        BLOCK_CHECKS.with_label_values(&[outcome]).inc();
        accepted
    }

    /// Apply `block` if it chains onto the current top block.
    ///
    /// Publishes `BlockCommitted` or `BlockRejected` and returns whether the
    /// block was committed.
    pub fn commit_block(&self, block: &Block) -> bool {
        self.commit_block_with(block, |_: &Block, _: &dyn WsvQuery, _: &Hash| true)
    }

    /// Like [`commit_block`](Self::commit_block), with an extra condition
    /// evaluated against the post-block state.
    pub fn commit_block_with<P>(&self, block: &Block, predicate: P) -> bool
    where
        P: Fn(&Block, &dyn WsvQuery, &Hash) -> bool,
    {
        let mut storage = self.storage.lock();
        let committed = {
            let _timer = time_histogram!(BLOCK_APPLY_DURATION);
            storage.apply(block, &|candidate, wsv, top_hash| {
                chains_onto_top(candidate, wsv, top_hash) && predicate(candidate, wsv, top_hash)
            })
        };

        let event = if committed {
            BLOCK_APPLY_OUTCOMES.with_label_values(&["committed"]).inc();
            CHAIN_HEIGHT.set(self.world_state.height() as f64);
            LedgerEvent::BlockCommitted {
                height: block.height(),
                hash: block.hash(),
            }
        } else {
            BLOCK_APPLY_OUTCOMES.with_label_values(&["discarded"]).inc();
            LedgerEvent::BlockRejected {
                height: block.height(),
                hash: block.hash(),
            }
        };

        BUS_EVENTS_PUBLISHED.with_label_values(&[event.kind()]).inc();
        self.bus.deliver(event);
        drop(storage);
        committed
    }
}
