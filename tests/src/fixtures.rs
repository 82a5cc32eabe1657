//! Shared test fixtures.

use lc_01_mutable_storage::domain::Account;
use lc_01_mutable_storage::InMemoryWorldState;
use shared_types::entities::{
    AccountId, AssetId, Block, Command, Hash, Transaction, TransactionSignature,
};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn alice() -> AccountId {
    AccountId::new("alice@ledger")
}

pub fn bob() -> AccountId {
    AccountId::new("bob@ledger")
}

pub fn coin() -> AssetId {
    AssetId::new("coin#ledger")
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// World state with alice holding `balance` coins and an empty bob account.
pub fn seeded_world_state(balance: u128) -> InMemoryWorldState {
    InMemoryWorldState::with_accounts([
        Account::new(alice(), [1u8; 32]).with_balance(coin(), balance),
        Account::new(bob(), [2u8; 32]),
    ])
}

/// Attach a deterministic dummy signature from `key`.
pub fn sign(mut tx: Transaction, key: u8) -> Transaction {
    tx.add_signature(TransactionSignature {
        public_key: [key; 32],
        signature: [key; 64],
    });
    tx
}

/// Signed transfer from alice to bob, timestamped now.
pub fn transfer(amount: u128) -> Transaction {
    sign(
        Transaction::new(
            alice(),
            now_ms(),
            vec![Command::TransferAsset {
                src_account_id: alice(),
                dest_account_id: bob(),
                asset_id: coin(),
                amount,
            }],
        ),
        1,
    )
}

pub fn block_on(prev_hash: Hash, height: u64, transactions: Vec<Transaction>) -> Block {
    Block::new(height, prev_hash, now_ms(), transactions)
}
