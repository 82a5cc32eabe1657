//! # Node Container
//!
//! Holds the subsystem instances of one node and the infrastructure they
//! share.
//!
//! ## Initialization Order
//!
//! 1. Event bus (backlog warning threshold from config)
//! 2. World state backend and its single mutation context
//! 3. Transaction processor over the metered validator and ordering gateway

pub mod config;
pub mod node;

pub use config::{ConfigError, NodeConfig};
pub use node::{LedgerNode, NodeProcessor};
