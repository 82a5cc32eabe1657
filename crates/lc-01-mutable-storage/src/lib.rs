//! # Mutable Storage Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Applies one agreed-upon block at a time to the world state view (WSV).
//! Application is all-or-nothing and gated by a caller-supplied predicate
//! evaluated against the state as it would exist after the block.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No partial application is observable | `adapters/memory_wsv.rs` - `commit()` under one write lock |
//! | Predicate sees post-mutation state | `domain/overlay.rs` - reads fall through writes to the base |
//! | Predicate's top hash matches its snapshot | `service.rs` - hash pinned before execution, re-checked at commit |
//! | One mutation context per backend | `ports/outbound.rs` - `MutationGuard` |
//!
//! ## Apply Protocol
//!
//! ```text
//! [top hash pinned] ──execute──→ [overlay] ──predicate──→ true  ──commit──→ [visible]
//!                        │                        │
//!                        └── structural error ────┴──→ false ──drop──→ [unchanged]
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/memory_wsv.rs - InMemoryWorldState backend            │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - MutableStorage, AcceptancePredicate        │
//! │  ports/outbound.rs - WsvQuery, WorldStateBackend, MutationGuard │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs   - Account, WorldState, ChangeSet          │
//! │  domain/overlay.rs    - StateOverlay (copy-on-write shadow)     │
//! │  domain/executor.rs   - command semantics                       │
//! │  domain/predicates.rs - reusable acceptance predicates          │
//! │  domain/errors.rs     - StorageError                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::WsvMutableStorage;
