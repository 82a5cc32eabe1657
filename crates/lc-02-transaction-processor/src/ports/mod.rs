//! Ports layer for the Transaction Processor subsystem.
//!
//! - Inbound (Driving) ports: API exposed to the client transport
//! - Outbound (Driven) ports: validation rules, ordering, time

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
