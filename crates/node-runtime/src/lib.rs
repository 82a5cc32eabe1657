//! # Node Runtime Library
//!
//! Assembles a Ledger-Core node from its subsystems.
//!
//! ## Architectural Patterns
//!
//! - **EDA (Event-Driven Architecture)**: outcomes leave the node as events on the shared bus
//! - **Hexagonal Architecture**: subsystems are wired through their ports; this crate
//!   only supplies adapters (metering decorators) and the container
//!
//! ## Modules
//!
//! - `container/` - `NodeConfig` and the `LedgerNode` container
//! - `adapters/` - port decorators recording Prometheus metrics

pub mod adapters;
pub mod container;

pub use container::{ConfigError, LedgerNode, NodeConfig};
