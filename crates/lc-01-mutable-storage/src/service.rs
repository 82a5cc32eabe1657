//! # Mutable Storage Service
//!
//! Application service implementing the `MutableStorage` inbound port over
//! any `WorldStateBackend`.
//!
//! ## Architecture
//!
//! - Opening the service claims the backend's single-writer token; it is
//!   released when the service is dropped.
//! - Each `check`/`apply` pins the current top hash, executes the block into
//!   a fresh `StateOverlay` and hands that overlay to the predicate.
//! - A block whose height is not the top height plus one is structurally
//!   inapplicable, like one whose commands fail; the predicate never runs.
//! - Only `apply` with a satisfied predicate turns the overlay into a
//!   `ChangeSet` and commits it.

use crate::domain::executor;
use crate::domain::{ChangeSet, StateOverlay, StorageError};
use crate::ports::inbound::{AcceptancePredicate, MutableStorage};
use crate::ports::outbound::{MutationGuard, WorldStateBackend};
use shared_types::entities::{Block, BlockVariant, Hash};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutable storage over a shared world state backend.
pub struct WsvMutableStorage<B: WorldStateBackend> {
    backend: Arc<B>,
    _guard: MutationGuard,
    committed: u64,
    discarded: u64,
}

impl<B: WorldStateBackend> WsvMutableStorage<B> {
    /// Open a mutation context over `backend`.
    ///
    /// # Errors
    /// - `StorageError::MutationInProgress` if another context is open on it
    pub fn new(backend: Arc<B>) -> Result<Self, StorageError> {
        let guard = backend
            .try_begin_mutation()
            .ok_or(StorageError::MutationInProgress)?;
        Ok(Self {
            backend,
            _guard: guard,
            committed: 0,
            discarded: 0,
        })
    }

    /// Blocks committed through this context.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Blocks discarded by this context.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Height a block must declare to follow the current top.
    fn next_height(&self) -> u64 {
        self.backend.height() + 1
    }

    fn discard(&mut self, block_hash: &Hash, reason: &str) -> bool {
        self.discarded += 1;
        debug!(block_hash = %short(block_hash), reason, "Block discarded");
        false
    }
}

impl<B: WorldStateBackend> MutableStorage for WsvMutableStorage<B> {
    fn check(
        &mut self,
        block: &BlockVariant,
        predicate: &AcceptancePredicate<'_, BlockVariant>,
    ) -> bool {
        let top_hash = self.backend.top_block_hash();
        let next_height = self.next_height();
        if block.height() != next_height {
            debug!(
                block_hash = %short(&block.hash()),
                height = block.height(),
                expected = next_height,
                "Check failed: height does not follow top"
            );
            return false;
        }

        let mut overlay = StateOverlay::new(self.backend.as_ref());
        if let Err(error) = executor::execute_block(&mut overlay, block.transactions()) {
            debug!(
                block_hash = %short(&block.hash()),
                error = %error,
                "Check failed: block not applicable"
            );
            return false;
        }

        let accepted = predicate(block, &overlay, &top_hash);
        debug!(
            block_hash = %short(&block.hash()),
            height = block.height(),
            accepted,
            "Block checked"
        );
        accepted
    }

    fn apply(&mut self, block: &Block, predicate: &AcceptancePredicate<'_, Block>) -> bool {
        let block_hash = block.hash();
        let top_hash = self.backend.top_block_hash();
        let next_height = self.next_height();
        if block.height() != next_height {
            return self.discard(&block_hash, "height does not follow top");
        }

        let changes = {
            let mut overlay = StateOverlay::new(self.backend.as_ref());

            if let Err(error) = executor::execute_block(&mut overlay, &block.transactions) {
                debug!(block_hash = %short(&block_hash), error = %error, "Block not applicable");
                None
            } else if !predicate(block, &overlay, &top_hash) {
                None
            } else {
                Some(overlay.into_changes())
            }
        };

        let Some(accounts) = changes else {
            return self.discard(&block_hash, "predicate not satisfied");
        };

        let change_set = ChangeSet {
            parent_hash: top_hash,
            top_block_hash: block_hash,
            height: next_height,
            accounts,
        };

        match self.backend.commit(change_set) {
            Ok(()) => {
                self.committed += 1;
                info!(
                    block_hash = %short(&block_hash),
                    height = block.height(),
                    transactions = block.transactions.len(),
                    "Block committed"
                );
                true
            }
            Err(error) => {
                warn!(block_hash = %short(&block_hash), error = %error, "Block commit failed");
                self.discard(&block_hash, "commit failed")
            }
        }
    }
}

fn short(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}
