//! Reusable acceptance predicates.
//!
//! Plain functions with the `AcceptancePredicate` signature; pass them by
//! reference (`&chains_onto_top`) or compose them inside a closure.

use crate::ports::outbound::WsvQuery;
use shared_types::entities::{Block, BlockVariant, Hash};

/// The block declares the current top block as its parent.
pub fn chains_onto_top(block: &Block, _wsv: &dyn WsvQuery, top_hash: &Hash) -> bool {
    block.prev_hash() == top_hash
}

/// [`chains_onto_top`] for any block representation.
pub fn variant_chains_onto_top(block: &BlockVariant, _wsv: &dyn WsvQuery, top_hash: &Hash) -> bool {
    block.prev_hash() == top_hash
}

/// Accepts every structurally applicable candidate.
pub fn accept_all<T>(_candidate: &T, _wsv: &dyn WsvQuery, _top_hash: &Hash) -> bool {
    true
}
