//! # Subsystem Scenarios
//!
//! Each subsystem driven through its public ports with the shipped
//! adapters: `StatelessRules` + `ChannelOrderingGateway` for intake,
//! `InMemoryWorldState` + `WsvMutableStorage` for block application.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::Rng;
    use tokio::time::timeout;

    use lc_01_mutable_storage::domain::predicates::chains_onto_top;
    use lc_01_mutable_storage::{
        InMemoryWorldState, MutableStorage, WorldStateBackend, WsvMutableStorage, WsvQuery,
    };
    use lc_02_transaction_processor::{
        ChannelOrderingGateway, OrderingQueue, StatelessRules, TransactionProcessorApi,
        TransactionProcessorService,
    };
    use shared_bus::InMemoryEventBus;
    use shared_types::entities::{Block, ClientId, Hash, Transaction, GENESIS_PARENT_HASH};
    use shared_types::responses::StatelessStatus;

    use crate::fixtures::{alice, block_on, bob, coin, seeded_world_state, transfer};

    type Processor = TransactionProcessorService<StatelessRules, ChannelOrderingGateway>;

    fn processor() -> (Processor, OrderingQueue) {
        let (gateway, queue) = ChannelOrderingGateway::channel();
        let service = TransactionProcessorService::new(
            StatelessRules::default(),
            gateway,
            Arc::new(InMemoryEventBus::new()),
        );
        (service, queue)
    }

    // =========================================================================
    // TRANSACTION INTAKE
    // =========================================================================

    #[tokio::test]
    async fn test_valid_transaction_is_forwarded_and_reported_passed() {
        let (service, mut queue) = processor();
        let mut responses = service.subscribe();
        let tx = transfer(10);

        service.handle(ClientId::new("c1"), tx.clone()).await;

        let response = timeout(Duration::from_millis(100), responses.recv())
            .await
            .expect("timeout waiting for response")
            .expect("bus closed");
        assert_eq!(response.client, ClientId::new("c1"));
        assert_eq!(response.status, StatelessStatus::StatelessPassed);
        assert_eq!(response.transaction, tx);

        assert_eq!(queue.try_recv(), Some(tx));
        assert_eq!(queue.try_recv(), None);
    }

    #[tokio::test]
    async fn test_invalid_transaction_is_dropped_and_reported_failed() {
        let (service, mut queue) = processor();
        let mut responses = service.subscribe();
        let unsigned = Transaction::new(alice(), crate::fixtures::now_ms(), vec![]);

        service.handle(ClientId::new("c2"), unsigned.clone()).await;

        let response = timeout(Duration::from_millis(100), responses.recv())
            .await
            .expect("timeout waiting for response")
            .expect("bus closed");
        assert_eq!(response.client, ClientId::new("c2"));
        assert_eq!(response.status, StatelessStatus::StatelessFailed);
        assert_eq!(response.transaction, unsigned);
        assert_eq!(queue.try_recv(), None);
    }

    #[tokio::test]
    async fn test_every_early_subscriber_gets_exactly_one_response() {
        let (service, _queue) = processor();
        let mut first = service.subscribe();
        let mut second = service.subscribe();

        let tx = transfer(1);
        service.handle(ClientId::new("c1"), tx.clone()).await;
        let mut late = service.subscribe();

        let from_first = first.try_recv().unwrap().expect("first subscriber");
        let from_second = second.try_recv().unwrap().expect("second subscriber");
        assert_eq!(from_first, from_second);
        assert_eq!(from_first.client, ClientId::new("c1"));
        assert_eq!(from_first.transaction, tx);
        assert_eq!(from_first.status, StatelessStatus::StatelessPassed);

        assert!(first.try_recv().unwrap().is_none());
        assert!(second.try_recv().unwrap().is_none());
        assert!(late.try_recv().unwrap().is_none());
    }

    // =========================================================================
    // BLOCK APPLICATION
    // =========================================================================

    #[test]
    fn test_rejecting_predicate_leaves_world_state_untouched() {
        let wsv = Arc::new(seeded_world_state(100));
        let before = wsv.snapshot();
        let mut storage = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();

        let block = block_on(GENESIS_PARENT_HASH, 1, vec![transfer(30)]);
        assert!(!storage.apply(&block, &|_, _, _| false));

        assert_eq!(wsv.snapshot(), before);
        assert_eq!(wsv.top_block_hash(), GENESIS_PARENT_HASH);
    }

    #[test]
    fn test_accepting_predicate_makes_block_the_top() {
        let wsv = Arc::new(seeded_world_state(100));
        let mut storage = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();

        let block = block_on(GENESIS_PARENT_HASH, 1, vec![transfer(30)]);
        assert!(storage.apply(&block, &|_, _, _| true));

        assert_eq!(wsv.top_block_hash(), block.hash());
        assert_eq!(wsv.balance(&alice(), &coin()), 70);
        assert_eq!(wsv.balance(&bob(), &coin()), 30);
    }

    #[test]
    fn test_predicate_observes_post_state_and_prior_top() {
        let wsv = Arc::new(seeded_world_state(100));
        let mut storage = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();
        let block = block_on(GENESIS_PARENT_HASH, 1, vec![transfer(40)]);

        let seen = std::cell::Cell::new(None);
        let observed = |_: &Block, view: &dyn WsvQuery, top: &Hash| {
            seen.set(Some((view.balance(&bob(), &coin()), *top)));
            true
        };
        assert!(storage.apply(&block, &observed));

        assert_eq!(seen.get(), Some((40, GENESIS_PARENT_HASH)));
    }

    /// Random chains of transfers, some overdrawing: committed blocks move
    /// exactly their amount; discarded ones change nothing.
    #[test]
    fn test_random_blocks_are_all_or_nothing() {
        let mut rng = rand::thread_rng();
        let wsv = Arc::new(seeded_world_state(1_000));
        let mut storage = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();
        let mut expected_alice: u128 = 1_000;

        for _ in 0..50 {
            let amounts: Vec<u128> = (0..rng.gen_range(1..4))
                .map(|_| rng.gen_range(1..200))
                .collect();
            let txs = amounts.iter().map(|&a| transfer(a)).collect();
            let block = block_on(wsv.top_block_hash(), wsv.height() + 1, txs);
            let before = wsv.snapshot();

            let total: u128 = amounts.iter().sum();
            let committed = storage.apply(&block, &chains_onto_top);

            if total <= expected_alice {
                assert!(committed, "affordable block must commit");
                expected_alice -= total;
                assert_eq!(wsv.top_block_hash(), block.hash());
            } else {
                assert!(!committed, "overdraft must be discarded");
                assert_eq!(wsv.snapshot(), before);
            }
            assert_eq!(wsv.balance(&alice(), &coin()), expected_alice);
            assert_eq!(
                wsv.balance(&alice(), &coin()) + wsv.balance(&bob(), &coin()),
                1_000
            );
        }
    }

    #[test]
    fn test_check_never_changes_state() {
        let wsv = Arc::new(seeded_world_state(100));
        let before = wsv.snapshot();
        let mut storage = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();
        let block = block_on(GENESIS_PARENT_HASH, 1, vec![transfer(60)]);

        assert!(storage.check(&block.clone().into(), &|_, _, _| true));
        assert!(storage.check(&block.clone().into(), &|_, _, _| true));
        assert_eq!(wsv.snapshot(), before);

        assert!(storage.apply(&block, &|_, _, _| true));
        assert_eq!(wsv.balance(&bob(), &coin()), 60);
    }

    #[test]
    fn test_second_mutation_context_refused() {
        let wsv: Arc<InMemoryWorldState> = Arc::new(seeded_world_state(1));
        let _first = WsvMutableStorage::new(Arc::clone(&wsv)).unwrap();
        assert!(WsvMutableStorage::new(wsv).is_err());
    }
}
