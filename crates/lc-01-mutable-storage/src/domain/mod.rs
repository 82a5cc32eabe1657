//! Domain layer for the Mutable Storage subsystem.

pub mod entities;
pub mod errors;
pub mod executor;
pub mod overlay;
pub mod predicates;

pub use entities::*;
pub use errors::*;
pub use overlay::StateOverlay;
