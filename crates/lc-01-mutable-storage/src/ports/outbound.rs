//! Outbound (Driven) ports for the Mutable Storage subsystem.
//!
//! These traits define the world state view the subsystem reads and
//! mutates. Storage engines, indices and persistence live behind them.

use crate::domain::{Account, ChangeSet, StorageError};
use shared_types::entities::{AccountId, AssetId, Hash};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read access to world state.
///
/// Handed to acceptance predicates scoped to the hypothetical post-block
/// state, and implemented by backends for the committed state.
pub trait WsvQuery {
    /// Look up an account.
    fn account(&self, account_id: &AccountId) -> Option<Account>;

    fn has_account(&self, account_id: &AccountId) -> bool {
        self.account(account_id).is_some()
    }

    /// Balance of `asset_id` on the account; zero if either is unknown.
    fn balance(&self, account_id: &AccountId, asset_id: &AssetId) -> u128 {
        self.account(account_id)
            .map(|account| account.balance(asset_id))
            .unwrap_or(0)
    }

    fn account_detail(&self, account_id: &AccountId, key: &str) -> Option<String> {
        self.account(account_id)
            .and_then(|account| account.details.get(key).cloned())
    }
}

/// A world state backend a mutable storage can be opened over.
pub trait WorldStateBackend: WsvQuery + Send + Sync {
    /// Hash of the most recently committed block.
    fn top_block_hash(&self) -> Hash;

    /// Height of the most recently committed block.
    fn height(&self) -> u64;

    /// Apply `changes` atomically: readers observe either none or all of them.
    ///
    /// # Errors
    /// - `StorageError::StaleParent` if the top block is no longer `changes.parent_hash`
    fn commit(&self, changes: ChangeSet) -> Result<(), StorageError>;

    /// Claim the single-writer token. `None` while another guard is alive.
    fn try_begin_mutation(&self) -> Option<MutationGuard>;
}

/// Exclusive right to mutate one backend. Released on drop.
#[derive(Debug)]
pub struct MutationGuard {
    flag: Arc<AtomicBool>,
}

impl MutationGuard {
    /// Claim `flag`, returning `None` if it is already held.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
