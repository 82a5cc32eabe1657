//! # End-to-End Flow
//!
//! ```text
//! client ──handle──→ LedgerNode ──propagate──→ OrderingQueue
//!    ↑                   │                          │
//!    └──── response ─────┘            test block producer drains it
//!                                                   │
//!           BlockCommitted ←──commit_block──────────┘
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use lc_01_mutable_storage::{WorldStateBackend, WsvQuery};
    use lc_02_transaction_processor::OrderingQueue;
    use node_runtime::{LedgerNode, NodeConfig};
    use shared_bus::{EventFilter, EventTopic, LedgerEvent};
    use shared_types::codec;
    use shared_types::entities::{Block, ClientId, Transaction};
    use shared_types::responses::StatelessStatus;

    use crate::fixtures::{alice, block_on, bob, coin, seeded_world_state, transfer};

    fn node(balance: u128) -> anyhow::Result<(LedgerNode, OrderingQueue)> {
        LedgerNode::with_world_state(
            NodeConfig::default(),
            Arc::new(seeded_world_state(balance)),
        )
    }

    fn drain(queue: &mut OrderingQueue) -> Vec<Transaction> {
        std::iter::from_fn(|| queue.try_recv()).collect()
    }

    fn next_block(node: &LedgerNode, transactions: Vec<Transaction>) -> Block {
        block_on(node.top_block_hash(), node.height() + 1, transactions)
    }

    #[tokio::test]
    async fn test_client_transactions_reach_the_world_state() -> anyhow::Result<()> {
        let (node, mut queue) = node(100)?;
        let mut responses = node.subscribe();
        let mut blocks = node.subscribe_events(EventFilter::topics(vec![EventTopic::Blocks]));

        node.handle(ClientId::new("wallet"), transfer(25)).await;
        node.handle(ClientId::new("wallet"), transfer(5)).await;

        for _ in 0..2 {
            let response = timeout(Duration::from_millis(100), responses.recv())
                .await?
                .ok_or_else(|| anyhow::anyhow!("bus closed"))?;
            assert_eq!(response.status, StatelessStatus::StatelessPassed);
        }

        // Blocks reach the node in their wire form.
        let produced = next_block(&node, drain(&mut queue));
        let block: Block = codec::decode(&codec::encode(&produced)?)?;
        assert_eq!(block.transactions.len(), 2);
        assert!(node.commit_block(&block));

        assert_eq!(
            blocks.try_recv()?,
            Some(LedgerEvent::BlockCommitted {
                height: 1,
                hash: block.hash()
            })
        );
        let wsv = node.world_state();
        assert_eq!(wsv.balance(&alice(), &coin()), 70);
        assert_eq!(wsv.balance(&bob(), &coin()), 30);
        assert_eq!(wsv.top_block_hash(), block.hash());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_transactions_never_reach_ordering() -> anyhow::Result<()> {
        let (node, mut queue) = node(100)?;
        let mut responses = node.subscribe();

        let mut stale = transfer(1);
        stale.created_time = 0;
        node.handle(ClientId::new("wallet"), stale).await;

        let response = responses
            .try_recv()?
            .ok_or_else(|| anyhow::anyhow!("no response"))?;
        assert_eq!(response.status, StatelessStatus::StatelessFailed);
        assert!(drain(&mut queue).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_overdraft_block_is_rejected_atomically() -> anyhow::Result<()> {
        let (node, mut queue) = node(50)?;
        let mut blocks = node.subscribe_events(EventFilter::topics(vec![EventTopic::Blocks]));

        node.handle(ClientId::new("wallet"), transfer(30)).await;
        node.handle(ClientId::new("wallet"), transfer(30)).await;

        let before = node.world_state().snapshot();
        let block = next_block(&node, drain(&mut queue));
        assert!(!node.check_block(&block.clone().into()));
        assert!(!node.commit_block(&block));

        assert_eq!(node.world_state().snapshot(), before);
        assert!(matches!(
            blocks.try_recv()?,
            Some(LedgerEvent::BlockRejected { height: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_chain_of_blocks_and_stale_replay() -> anyhow::Result<()> {
        let (node, _queue) = node(100)?;

        let first = next_block(&node, vec![transfer(10)]);
        assert!(node.commit_block(&first));
        let second = next_block(&node, vec![transfer(10)]);
        assert!(node.commit_block(&second));

        // `first` no longer chains onto the top.
        assert!(!node.commit_block(&first));
        assert_eq!(node.height(), 2);
        assert_eq!(node.top_block_hash(), second.hash());
        assert_eq!(node.world_state().balance(&bob(), &coin()), 20);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clients_each_get_one_response() -> anyhow::Result<()> {
        let (node, mut queue) = node(1_000)?;
        let node = Arc::new(node);
        let stream = node.subscribe().into_stream();

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let node = Arc::clone(&node);
                tokio::spawn(async move {
                    node.handle(ClientId::new(format!("client-{i}")), transfer(1))
                        .await;
                })
            })
            .collect();
        for task in tasks {
            task.await?;
        }

        let responses = timeout(
            Duration::from_secs(1),
            stream.take(20).collect::<Vec<_>>(),
        )
        .await?;
        let mut clients: Vec<String> = responses.iter().map(|r| r.client.to_string()).collect();
        clients.sort();
        clients.dedup();
        assert_eq!(clients.len(), 20);

        let block = next_block(&node, drain(&mut queue));
        assert!(node.commit_block(&block));
        assert_eq!(node.world_state().balance(&bob(), &coin()), 20);
        Ok(())
    }
}
