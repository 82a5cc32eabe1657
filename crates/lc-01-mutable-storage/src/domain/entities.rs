//! World state entities.

use shared_types::entities::{AccountId, AssetId, Hash, PublicKey, GENESIS_PARENT_HASH};
use std::collections::BTreeMap;

/// An account as stored in the world state view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    /// Keys allowed to sign on behalf of the account.
    pub signatories: Vec<PublicKey>,
    /// Signatures required to authorise a transaction.
    pub quorum: u32,
    /// Asset balances.
    pub assets: BTreeMap<AssetId, u128>,
    /// Free-form key/value details.
    pub details: BTreeMap<String, String>,
}

impl Account {
    /// A fresh account with a single signatory and quorum 1.
    pub fn new(id: AccountId, public_key: PublicKey) -> Self {
        Self {
            id,
            signatories: vec![public_key],
            quorum: 1,
            assets: BTreeMap::new(),
            details: BTreeMap::new(),
        }
    }

    /// Builder-style helper to seed a balance.
    pub fn with_balance(mut self, asset_id: AssetId, amount: u128) -> Self {
        self.assets.insert(asset_id, amount);
        self
    }

    pub fn balance(&self, asset_id: &AssetId) -> u128 {
        self.assets.get(asset_id).copied().unwrap_or(0)
    }
}

/// The complete, consistent state of the ledger at one top block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    pub accounts: BTreeMap<AccountId, Account>,
    /// Hash of the most recently committed block.
    pub top_block_hash: Hash,
    /// Height of the most recently committed block (0 before the first).
    pub height: u64,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            accounts: BTreeMap::new(),
            top_block_hash: GENESIS_PARENT_HASH,
            height: 0,
        }
    }
}

/// Everything a successful block application changes, committed as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Top hash the changes were computed against. The commit is refused if
    /// the backend has moved on since.
    pub parent_hash: Hash,
    /// New top block hash.
    pub top_block_hash: Hash,
    /// New height.
    pub height: u64,
    /// Full post-block copies of every account the block touched.
    pub accounts: BTreeMap<AccountId, Account>,
}
