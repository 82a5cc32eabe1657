//! Cross-subsystem integration tests.

pub mod e2e_flow;
pub mod scenarios;
