//! Inbound (Driving) ports for the Mutable Storage subsystem.
//!
//! Called by whatever component owns block-commit sequencing.

use crate::ports::outbound::WsvQuery;
use shared_types::entities::{Block, BlockVariant, Hash};

/// Decides whether a candidate may be committed.
///
/// Receives the candidate, a read view of the state as it would be after
/// the candidate is applied, and the top block hash from *before* the
/// candidate. Must be pure.
pub type AcceptancePredicate<'a, T> = dyn Fn(&T, &dyn WsvQuery, &Hash) -> bool + 'a;

/// A serialized mutation context over the world state view.
///
/// Both methods take `&mut self`: one `check`/`apply` is in flight per
/// instance at a time.
pub trait MutableStorage {
    /// Evaluate `predicate` against the state `block` would produce,
    /// without committing anything.
    ///
    /// Returns `false` if the block cannot be applied structurally.
    fn check(
        &mut self,
        block: &BlockVariant,
        predicate: &AcceptancePredicate<'_, BlockVariant>,
    ) -> bool;

    /// Apply `block` and commit it iff `predicate` holds on the result.
    ///
    /// On `false` the world state is exactly as it was before the call;
    /// structural failures and predicate rejection are not distinguished.
    fn apply(&mut self, block: &Block, predicate: &AcceptancePredicate<'_, Block>) -> bool;
}
