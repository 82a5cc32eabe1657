use crate::domain::{Account, ChangeSet, StorageError, WorldState};
use crate::ports::outbound::{MutationGuard, WorldStateBackend, WsvQuery};
use parking_lot::RwLock;
use shared_types::entities::{AccountId, Hash};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// In-memory world state view.
///
/// All committed state sits behind one `RwLock`, so a commit is a single
/// write section and readers never observe half a block.
pub struct InMemoryWorldState {
    state: RwLock<WorldState>,
    writer: Arc<AtomicBool>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::from_state(WorldState::default())
    }

    pub fn from_state(state: WorldState) -> Self {
        Self {
            state: RwLock::new(state),
            writer: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Empty chain seeded with `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut state = WorldState::default();
        state.accounts = accounts
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect();
        Self::from_state(state)
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> WorldState {
        self.state.read().clone()
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WsvQuery for InMemoryWorldState {
    fn account(&self, account_id: &AccountId) -> Option<Account> {
        self.state.read().accounts.get(account_id).cloned()
    }
}

impl WorldStateBackend for InMemoryWorldState {
    fn top_block_hash(&self) -> Hash {
        self.state.read().top_block_hash
    }

    fn height(&self) -> u64 {
        self.state.read().height
    }

    fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let mut state = self.state.write();
        if state.top_block_hash != changes.parent_hash {
            return Err(StorageError::StaleParent {
                expected: changes.parent_hash,
                actual: state.top_block_hash,
            });
        }
        state.accounts.extend(changes.accounts);
        state.top_block_hash = changes.top_block_hash;
        state.height = changes.height;
        Ok(())
    }

    fn try_begin_mutation(&self) -> Option<MutationGuard> {
        MutationGuard::acquire(&self.writer)
    }
}
