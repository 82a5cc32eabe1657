//! Adapters layer for the Mutable Storage subsystem.

pub mod memory_wsv;

pub use memory_wsv::InMemoryWorldState;
