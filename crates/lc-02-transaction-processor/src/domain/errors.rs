//! Transaction Processor error types.

use thiserror::Error;

/// Why a transaction failed stateless validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Transaction has no commands")]
    NoCommands,

    #[error("Too many commands: {count} (max {max})")]
    TooManyCommands { count: usize, max: usize },

    #[error("Transaction is not signed")]
    NoSignatures,

    #[error("Too many signatures: {count} (max {max})")]
    TooManySignatures { count: usize, max: usize },

    #[error("Duplicate signatory {0}")]
    DuplicateSignatory(String),

    #[error("Malformed account id: {0:?}")]
    MalformedAccountId(String),

    #[error("Malformed asset id: {0:?}")]
    MalformedAssetId(String),

    #[error("Zero amount in {command}")]
    ZeroAmount { command: &'static str },

    #[error("Transfer from {0} to itself")]
    SelfTransfer(String),

    #[error("Account detail key is empty")]
    EmptyDetailKey,

    #[error("Account detail too long: {len} bytes (max {max})")]
    DetailTooLong { len: usize, max: usize },

    #[error("Transaction too old: created {created_time}, now {now}, max age {max_age_ms}ms")]
    TooOld {
        created_time: u64,
        now: u64,
        max_age_ms: u64,
    },

    #[error("Transaction from the future: created {created_time}, now {now}, tolerance {tolerance_ms}ms")]
    FromFuture {
        created_time: u64,
        now: u64,
        tolerance_ms: u64,
    },
}

/// Failure to hand a transaction to ordering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderingError {
    /// The ordering side is gone.
    #[error("Ordering queue closed")]
    QueueClosed,

    /// The ordering service refused the transaction.
    #[error("Ordering rejected transaction: {reason}")]
    Rejected { reason: String },
}
