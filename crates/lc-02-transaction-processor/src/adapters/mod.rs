//! Adapters layer for the Transaction Processor subsystem.

pub mod ordering;

pub use ordering::{ChannelOrderingGateway, OrderingQueue};
