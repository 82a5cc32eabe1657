//! Port adapters owned by the runtime.

pub mod metered;

pub use metered::{MeteredOrdering, MeteredValidator};
