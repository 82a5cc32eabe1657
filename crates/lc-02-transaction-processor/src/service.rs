//! # Transaction Processor Service
//!
//! Application service implementing `TransactionProcessorApi`.
//!
//! `handle` takes no lock and keeps no per-transaction state, so any number
//! of calls may run concurrently. Responses from concurrent calls reach a
//! subscriber in bus order, which is unrelated to call order.

use crate::notifier::{response_filter, ResponseSubscription};
use crate::ports::inbound::TransactionProcessorApi;
use crate::ports::outbound::{OrderingGateway, StatelessValidator};
use async_trait::async_trait;
use shared_bus::{EventPublisher, InMemoryEventBus, LedgerEvent};
use shared_types::entities::{ClientId, Transaction};
use shared_types::responses::TransactionResponse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Transaction intake over a validator, an ordering gateway and the bus.
pub struct TransactionProcessorService<V, O> {
    validator: V,
    ordering: O,
    bus: Arc<InMemoryEventBus>,
}

impl<V, O> TransactionProcessorService<V, O>
where
    V: StatelessValidator,
    O: OrderingGateway,
{
    pub fn new(validator: V, ordering: O, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            validator,
            ordering,
            bus,
        }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    pub fn ordering(&self) -> &O {
        &self.ordering
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Validate and, on success, forward to ordering. Ordering failures are
    /// logged only: the client already has a stateless verdict.
    async fn process(&self, client: ClientId, transaction: Transaction) -> TransactionResponse {
        if !self.validator.validate(&transaction) {
            return TransactionResponse::failed(client, transaction);
        }

        if let Err(error) = self.ordering.propagate(transaction.clone()).await {
            warn!(
                %client,
                tx_hash = %hex::encode(&transaction.hash()[..4]),
                %error,
                "Failed to propagate transaction to ordering"
            );
        }
        TransactionResponse::passed(client, transaction)
    }
}

#[async_trait]
impl<V, O> TransactionProcessorApi for TransactionProcessorService<V, O>
where
    V: StatelessValidator,
    O: OrderingGateway,
{
    async fn handle(&self, client: ClientId, transaction: Transaction) {
        let response = self.process(client, transaction).await;

        debug!(
            client = %response.client,
            tx_hash = %hex::encode(&response.tx_hash()[..4]),
            status = ?response.status,
            "Publishing transaction response"
        );
        self.bus
            .publish(LedgerEvent::TransactionResponse(response))
            .await;
    }

    fn subscribe(&self) -> ResponseSubscription {
        ResponseSubscription::new(self.bus.subscribe(response_filter()))
    }
}
