//! # Shared Types Crate
//!
//! Domain entities shared by the intake pipeline, the block application
//! protocol and the event bus.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Content Addressing**: Transactions and blocks are identified by the
//!   SHA-256 hash of their payload, never by a mutable field.
//! - **Immutability**: Blocks are never mutated after construction; a
//!   transaction only gains or loses signatures before submission.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod responses;

pub use entities::*;
pub use errors::*;
pub use responses::*;
