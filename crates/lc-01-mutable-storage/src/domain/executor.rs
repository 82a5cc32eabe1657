//! Command semantics.
//!
//! Executes transactions against a [`StateOverlay`]. The first failing
//! command aborts the whole block; the caller discards the overlay.

use crate::domain::{Account, StateOverlay, StorageError};
use crate::ports::outbound::WsvQuery;
use shared_types::entities::{AccountId, AssetId, Command, Transaction};
use tracing::trace;

/// Execute every transaction in order.
pub fn execute_block(
    overlay: &mut StateOverlay<'_>,
    transactions: &[Transaction],
) -> Result<(), StorageError> {
    for tx in transactions {
        execute_transaction(overlay, tx)?;
    }
    Ok(())
}

pub fn execute_transaction(
    overlay: &mut StateOverlay<'_>,
    tx: &Transaction,
) -> Result<(), StorageError> {
    for command in &tx.commands {
        trace!(
            creator = %tx.creator_account_id,
            command = command.name(),
            "Executing command"
        );
        execute_command(overlay, command)?;
    }
    Ok(())
}

fn execute_command(overlay: &mut StateOverlay<'_>, command: &Command) -> Result<(), StorageError> {
    match command {
        Command::CreateAccount {
            account_id,
            public_key,
        } => {
            if overlay.has_account(account_id) {
                return Err(StorageError::AccountAlreadyExists {
                    account_id: account_id.clone(),
                });
            }
            overlay.insert_account(Account::new(account_id.clone(), *public_key));
            Ok(())
        }
        Command::AddAssetQuantity {
            account_id,
            asset_id,
            amount,
        } => {
            positive(*amount)?;
            credit(overlay, account_id, asset_id, *amount)
        }
        Command::SubtractAssetQuantity {
            account_id,
            asset_id,
            amount,
        } => {
            positive(*amount)?;
            debit(overlay, account_id, asset_id, *amount)
        }
        Command::TransferAsset {
            src_account_id,
            dest_account_id,
            asset_id,
            amount,
        } => {
            positive(*amount)?;
            if !overlay.has_account(dest_account_id) {
                return Err(not_found(dest_account_id));
            }
            debit(overlay, src_account_id, asset_id, *amount)?;
            credit(overlay, dest_account_id, asset_id, *amount)
        }
        Command::SetAccountDetail {
            account_id,
            key,
            value,
        } => {
            let account = overlay
                .account_mut(account_id)
                .ok_or_else(|| not_found(account_id))?;
            account.details.insert(key.clone(), value.clone());
            Ok(())
        }
    }
}

fn positive(amount: u128) -> Result<(), StorageError> {
    if amount == 0 {
        return Err(StorageError::InvalidAmount(amount));
    }
    Ok(())
}

fn not_found(account_id: &AccountId) -> StorageError {
    StorageError::AccountNotFound {
        account_id: account_id.clone(),
    }
}

fn credit(
    overlay: &mut StateOverlay<'_>,
    account_id: &AccountId,
    asset_id: &AssetId,
    amount: u128,
) -> Result<(), StorageError> {
    let account = overlay
        .account_mut(account_id)
        .ok_or_else(|| not_found(account_id))?;
    let balance = account.assets.entry(asset_id.clone()).or_insert(0);
    *balance = balance
        .checked_add(amount)
        .ok_or_else(|| StorageError::BalanceOverflow {
            account_id: account_id.clone(),
            asset_id: asset_id.clone(),
        })?;
    Ok(())
}

fn debit(
    overlay: &mut StateOverlay<'_>,
    account_id: &AccountId,
    asset_id: &AssetId,
    amount: u128,
) -> Result<(), StorageError> {
    let account = overlay
        .account_mut(account_id)
        .ok_or_else(|| not_found(account_id))?;
    let available = account.balance(asset_id);
    if available < amount {
        return Err(StorageError::InsufficientBalance {
            account_id: account_id.clone(),
            asset_id: asset_id.clone(),
            required: amount,
            available,
        });
    }
    account.assets.insert(asset_id.clone(), available - amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;

    fn alice() -> AccountId {
        AccountId::new("alice@test")
    }

    fn bob() -> AccountId {
        AccountId::new("bob@test")
    }

    fn coin() -> AssetId {
        AssetId::new("coin#test")
    }

    fn seeded() -> InMemoryWorldState {
        InMemoryWorldState::with_accounts([
            Account::new(alice(), [1u8; 32]).with_balance(coin(), 100),
            Account::new(bob(), [2u8; 32]),
        ])
    }

    fn tx(commands: Vec<Command>) -> Transaction {
        Transaction::new(alice(), 1, commands)
    }

    #[test]
    fn test_transfer_moves_balance() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);

        execute_transaction(
            &mut overlay,
            &tx(vec![Command::TransferAsset {
                src_account_id: alice(),
                dest_account_id: bob(),
                asset_id: coin(),
                amount: 30,
            }]),
        )
        .unwrap();

        assert_eq!(overlay.balance(&alice(), &coin()), 70);
        assert_eq!(overlay.balance(&bob(), &coin()), 30);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);

        let result = execute_transaction(
            &mut overlay,
            &tx(vec![Command::TransferAsset {
                src_account_id: alice(),
                dest_account_id: bob(),
                asset_id: coin(),
                amount: 101,
            }]),
        );

        assert!(matches!(
            result,
            Err(StorageError::InsufficientBalance {
                required: 101,
                available: 100,
                ..
            })
        ));
    }

    #[test]
    fn test_transfer_to_unknown_account() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);
        let ghost = AccountId::new("ghost@test");

        let result = execute_transaction(
            &mut overlay,
            &tx(vec![Command::TransferAsset {
                src_account_id: alice(),
                dest_account_id: ghost.clone(),
                asset_id: coin(),
                amount: 1,
            }]),
        );

        assert_eq!(result, Err(StorageError::AccountNotFound { account_id: ghost }));
        // Source was never debited
        assert_eq!(overlay.balance(&alice(), &coin()), 100);
    }

    #[test]
    fn test_create_account_twice_fails() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);
        let carol = AccountId::new("carol@test");
        let create = Command::CreateAccount {
            account_id: carol.clone(),
            public_key: [3u8; 32],
        };

        execute_transaction(&mut overlay, &tx(vec![create.clone()])).unwrap();
        assert!(overlay.has_account(&carol));

        let result = execute_transaction(&mut overlay, &tx(vec![create]));
        assert_eq!(
            result,
            Err(StorageError::AccountAlreadyExists { account_id: carol })
        );
    }

    #[test]
    fn test_add_overflow() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);

        let result = execute_transaction(
            &mut overlay,
            &tx(vec![Command::AddAssetQuantity {
                account_id: alice(),
                asset_id: coin(),
                amount: u128::MAX,
            }]),
        );

        assert!(matches!(result, Err(StorageError::BalanceOverflow { .. })));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);

        let result = execute_transaction(
            &mut overlay,
            &tx(vec![Command::SubtractAssetQuantity {
                account_id: alice(),
                asset_id: coin(),
                amount: 0,
            }]),
        );

        assert_eq!(result, Err(StorageError::InvalidAmount(0)));
    }

    #[test]
    fn test_set_account_detail() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);

        execute_transaction(
            &mut overlay,
            &tx(vec![Command::SetAccountDetail {
                account_id: bob(),
                key: "email".to_string(),
                value: "bob@example.com".to_string(),
            }]),
        )
        .unwrap();

        assert_eq!(
            overlay.account_detail(&bob(), "email").as_deref(),
            Some("bob@example.com")
        );
        assert_eq!(wsv.account_detail(&bob(), "email"), None);
    }

    #[test]
    fn test_later_transactions_see_earlier_writes() {
        let wsv = seeded();
        let mut overlay = StateOverlay::new(&wsv);
        let carol = AccountId::new("carol@test");

        execute_block(
            &mut overlay,
            &[
                tx(vec![Command::CreateAccount {
                    account_id: carol.clone(),
                    public_key: [3u8; 32],
                }]),
                tx(vec![Command::TransferAsset {
                    src_account_id: alice(),
                    dest_account_id: carol.clone(),
                    asset_id: coin(),
                    amount: 5,
                }]),
            ],
        )
        .unwrap();

        assert_eq!(overlay.balance(&carol, &coin()), 5);
    }
}
