//! Ports layer for the Mutable Storage subsystem.
//!
//! - Inbound (Driving) ports: the block application API
//! - Outbound (Driven) ports: the world state view it mutates

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
