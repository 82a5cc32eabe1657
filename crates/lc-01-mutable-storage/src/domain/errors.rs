use shared_types::entities::{AccountId, AssetId, Hash};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: AccountId },

    #[error("Account already exists: {account_id}")]
    AccountAlreadyExists { account_id: AccountId },

    #[error("Insufficient balance of {asset_id} on {account_id}: required {required}, available {available}")]
    InsufficientBalance {
        account_id: AccountId,
        asset_id: AssetId,
        required: u128,
        available: u128,
    },

    #[error("Balance overflow of {asset_id} on {account_id}")]
    BalanceOverflow {
        account_id: AccountId,
        asset_id: AssetId,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(u128),

    #[error("Stale parent: changes computed against {expected:?}, top block is {actual:?}")]
    StaleParent { expected: Hash, actual: Hash },

    #[error("Another mutation context is already open on this world state")]
    MutationInProgress,
}
