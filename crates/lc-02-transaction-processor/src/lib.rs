//! # Transaction Processor Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Intakes client transactions, runs stateless validation, forwards the
//! ones that pass to ordering and publishes exactly one outcome per
//! transaction on the shared bus.
//!
//! ## Per-Transaction State Machine
//!
//! ```text
//! [Received] ──validate──→ [StatelessValidated] ──propagate──→ (ordering)
//!      │
//!      └──────────────────→ [StatelessRejected]
//!
//! Either branch ──publish──→ TransactionResponse on the bus
//! ```
//!
//! | Rule | Enforcement Location |
//! |------|---------------------|
//! | One response per `handle` call | `service.rs` - single publish after branching |
//! | Ordering only sees passed transactions | `service.rs` - propagate inside the passed branch |
//! | Ordering failures never reach the client | `service.rs` - logged, not returned |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ordering.rs - ChannelOrderingGateway, OrderingQueue   │
//! │  notifier.rs          - ResponseSubscription                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - TransactionProcessorApi                    │
//! │  ports/outbound.rs - StatelessValidator, OrderingGateway,       │
//! │                      TimeSource                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/validator.rs - StatelessRules, ValidatorConfig          │
//! │  domain/errors.rs    - ValidationError, OrderingError           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod notifier;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use notifier::ResponseSubscription;
pub use ports::*;
pub use service::TransactionProcessorService;
