//! # Transaction Responses
//!
//! The outcome record the intake pipeline publishes once per received
//! transaction.

use crate::entities::{ClientId, Hash, Transaction};
use serde::{Deserialize, Serialize};

/// Result of stateless validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatelessStatus {
    /// Transaction passed stateless validation and was forwarded to ordering.
    StatelessPassed,
    /// Transaction failed stateless validation and was dropped.
    StatelessFailed,
}

/// Outcome of one intake call, addressed to the originating client.
///
/// Built completely before it is published; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Client the transaction arrived from.
    pub client: ClientId,
    /// The transaction as received.
    pub transaction: Transaction,
    /// Validation outcome.
    pub status: StatelessStatus,
}

impl TransactionResponse {
    pub fn passed(client: ClientId, transaction: Transaction) -> Self {
        Self {
            client,
            transaction,
            status: StatelessStatus::StatelessPassed,
        }
    }

    pub fn failed(client: ClientId, transaction: Transaction) -> Self {
        Self {
            client,
            transaction,
            status: StatelessStatus::StatelessFailed,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == StatelessStatus::StatelessPassed
    }

    /// Hash of the transaction this response refers to.
    pub fn tx_hash(&self) -> Hash {
        self.transaction.hash()
    }
}
