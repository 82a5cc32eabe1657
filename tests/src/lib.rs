//! # Ledger-Core Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Accounts, signed transactions, block builders
//! └── integration/
//!     ├── scenarios.rs  # Intake and block application, one subsystem at a time
//!     └── e2e_flow.rs   # Client → intake → ordering → block → commit via LedgerNode
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ledger-tests
//! cargo test -p ledger-tests integration::e2e_flow
//! ```

pub mod fixtures;
pub mod integration;
