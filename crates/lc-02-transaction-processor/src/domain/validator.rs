//! # Stateless Validation Rules
//!
//! Checks a transaction can be decided without touching world state:
//! shape limits, identifier syntax, amounts and freshness.
//!
//! Signature cryptography is not checked here; only the signatory set is
//! inspected for emptiness and duplicates.

use super::errors::ValidationError;
use crate::ports::outbound::{StatelessValidator, SystemTimeSource, TimeSource};
use shared_types::entities::{AccountId, AssetId, Command, Transaction};
use std::collections::HashSet;
use tracing::debug;

/// Default maximum number of commands per transaction.
pub const DEFAULT_MAX_COMMANDS: usize = 1024;

/// Default maximum number of signatures per transaction.
pub const DEFAULT_MAX_SIGNATURES: usize = 64;

/// Default maximum transaction age (24 hours).
pub const DEFAULT_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;

/// Default tolerance for creation times ahead of the local clock (5 minutes).
pub const DEFAULT_FUTURE_TOLERANCE_MS: u64 = 5 * 60 * 1000;

/// Default maximum length of an account detail key or value, in bytes.
pub const DEFAULT_MAX_DETAIL_LEN: usize = 4096;

/// Limits applied by [`StatelessRules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub max_commands: usize,
    pub max_signatures: usize,
    pub max_age_ms: u64,
    pub future_tolerance_ms: u64,
    pub max_detail_len: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_MAX_COMMANDS,
            max_signatures: DEFAULT_MAX_SIGNATURES,
            max_age_ms: DEFAULT_MAX_AGE_MS,
            future_tolerance_ms: DEFAULT_FUTURE_TOLERANCE_MS,
            max_detail_len: DEFAULT_MAX_DETAIL_LEN,
        }
    }
}

/// Default stateless validator.
pub struct StatelessRules<T: TimeSource = SystemTimeSource> {
    config: ValidatorConfig,
    time_source: T,
}

impl StatelessRules<SystemTimeSource> {
    /// Rules backed by the system clock.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource)
    }
}

impl Default for StatelessRules<SystemTimeSource> {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl<T: TimeSource> StatelessRules<T> {
    pub fn with_time_source(config: ValidatorConfig, time_source: T) -> Self {
        Self {
            config,
            time_source,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every rule and report the first violation.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing the first failed rule.
    pub fn validate_detailed(&self, tx: &Transaction) -> Result<(), ValidationError> {
        self.check_shape(tx)?;
        self.check_signatories(tx)?;
        self.check_freshness(tx.created_time)?;
        check_account(&tx.creator_account_id)?;
        for command in &tx.commands {
            self.check_command(command)?;
        }
        Ok(())
    }

    fn check_shape(&self, tx: &Transaction) -> Result<(), ValidationError> {
        if tx.commands.is_empty() {
            return Err(ValidationError::NoCommands);
        }
        if tx.commands.len() > self.config.max_commands {
            return Err(ValidationError::TooManyCommands {
                count: tx.commands.len(),
                max: self.config.max_commands,
            });
        }
        Ok(())
    }

    fn check_signatories(&self, tx: &Transaction) -> Result<(), ValidationError> {
        if tx.signatures.is_empty() {
            return Err(ValidationError::NoSignatures);
        }
        if tx.signatures.len() > self.config.max_signatures {
            return Err(ValidationError::TooManySignatures {
                count: tx.signatures.len(),
                max: self.config.max_signatures,
            });
        }

        let mut seen = HashSet::with_capacity(tx.signatures.len());
        for sig in &tx.signatures {
            if !seen.insert(sig.public_key) {
                return Err(ValidationError::DuplicateSignatory(hex::encode(
                    sig.public_key,
                )));
            }
        }
        Ok(())
    }

    fn check_freshness(&self, created_time: u64) -> Result<(), ValidationError> {
        let now = self.time_source.now();

        if created_time > now.saturating_add(self.config.future_tolerance_ms) {
            return Err(ValidationError::FromFuture {
                created_time,
                now,
                tolerance_ms: self.config.future_tolerance_ms,
            });
        }
        if now.saturating_sub(created_time) > self.config.max_age_ms {
            return Err(ValidationError::TooOld {
                created_time,
                now,
                max_age_ms: self.config.max_age_ms,
            });
        }
        Ok(())
    }

    fn check_command(&self, command: &Command) -> Result<(), ValidationError> {
        match command {
            Command::CreateAccount { account_id, .. } => check_account(account_id),
            Command::AddAssetQuantity {
                account_id,
                asset_id,
                amount,
            }
            | Command::SubtractAssetQuantity {
                account_id,
                asset_id,
                amount,
            } => {
                check_account(account_id)?;
                check_asset(asset_id)?;
                check_amount(command, *amount)
            }
            Command::TransferAsset {
                src_account_id,
                dest_account_id,
                asset_id,
                amount,
            } => {
                check_account(src_account_id)?;
                check_account(dest_account_id)?;
                check_asset(asset_id)?;
                check_amount(command, *amount)?;
                if src_account_id == dest_account_id {
                    return Err(ValidationError::SelfTransfer(src_account_id.to_string()));
                }
                Ok(())
            }
            Command::SetAccountDetail {
                account_id,
                key,
                value,
            } => {
                check_account(account_id)?;
                if key.is_empty() {
                    return Err(ValidationError::EmptyDetailKey);
                }
                let len = key.len().max(value.len());
                if len > self.config.max_detail_len {
                    return Err(ValidationError::DetailTooLong {
                        len,
                        max: self.config.max_detail_len,
                    });
                }
                Ok(())
            }
        }
    }
}

fn check_account(id: &AccountId) -> Result<(), ValidationError> {
    if id.is_well_formed() {
        Ok(())
    } else {
        Err(ValidationError::MalformedAccountId(id.to_string()))
    }
}

fn check_asset(id: &AssetId) -> Result<(), ValidationError> {
    if id.is_well_formed() {
        Ok(())
    } else {
        Err(ValidationError::MalformedAssetId(id.to_string()))
    }
}

fn check_amount(command: &Command, amount: u128) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::ZeroAmount {
            command: command.name(),
        });
    }
    Ok(())
}

impl<T: TimeSource> StatelessValidator for StatelessRules<T> {
    fn validate(&self, transaction: &Transaction) -> bool {
        match self.validate_detailed(transaction) {
            Ok(()) => true,
            Err(reason) => {
                debug!(
                    tx_hash = %hex::encode(&transaction.hash()[..4]),
                    %reason,
                    "Stateless validation failed"
                );
                false
            }
        }
    }
}
