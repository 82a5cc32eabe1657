//! Domain layer for the Transaction Processor subsystem.

pub mod errors;
pub mod validator;

pub use errors::*;
pub use validator::{StatelessRules, ValidatorConfig};
