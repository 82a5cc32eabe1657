//! Copy-on-write shadow over a world state view.
//!
//! Writes land in the overlay; reads check the overlay first and fall
//! through to the base. Dropping the overlay discards every write.

use crate::domain::Account;
use crate::ports::outbound::WsvQuery;
use shared_types::entities::AccountId;
use std::collections::BTreeMap;

pub struct StateOverlay<'a> {
    base: &'a dyn WsvQuery,
    writes: BTreeMap<AccountId, Account>,
}

impl<'a> StateOverlay<'a> {
    pub fn new(base: &'a dyn WsvQuery) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Mutable access to an account, copying it from the base on first write.
    pub fn account_mut(&mut self, account_id: &AccountId) -> Option<&mut Account> {
        if !self.writes.contains_key(account_id) {
            let account = self.base.account(account_id)?;
            self.writes.insert(account_id.clone(), account);
        }
        self.writes.get_mut(account_id)
    }

    pub fn insert_account(&mut self, account: Account) {
        self.writes.insert(account.id.clone(), account);
    }

    /// Number of accounts written so far.
    pub fn touched(&self) -> usize {
        self.writes.len()
    }

    pub fn into_changes(self) -> BTreeMap<AccountId, Account> {
        self.writes
    }
}

impl WsvQuery for StateOverlay<'_> {
    fn account(&self, account_id: &AccountId) -> Option<Account> {
        match self.writes.get(account_id) {
            Some(account) => Some(account.clone()),
            None => self.base.account(account_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;
    use shared_types::entities::AssetId;

    fn coin() -> AssetId {
        AssetId::new("coin#test")
    }

    #[test]
    fn test_writes_shadow_base() {
        let alice = AccountId::new("alice@test");
        let wsv = InMemoryWorldState::with_accounts([
            Account::new(alice.clone(), [1u8; 32]).with_balance(coin(), 10)
        ]);

        let mut overlay = StateOverlay::new(&wsv);
        overlay
            .account_mut(&alice)
            .expect("alice")
            .assets
            .insert(coin(), 99);

        assert_eq!(overlay.balance(&alice, &coin()), 99);
        assert_eq!(wsv.balance(&alice, &coin()), 10);
        assert_eq!(overlay.touched(), 1);
    }

    #[test]
    fn test_missing_account_is_not_materialised() {
        let wsv = InMemoryWorldState::new();
        let mut overlay = StateOverlay::new(&wsv);

        assert!(overlay.account_mut(&AccountId::new("ghost@test")).is_none());
        assert_eq!(overlay.touched(), 0);
    }

    #[test]
    fn test_inserted_account_visible_only_in_overlay() {
        let wsv = InMemoryWorldState::new();
        let bob = AccountId::new("bob@test");
        let mut overlay = StateOverlay::new(&wsv);
        overlay.insert_account(Account::new(bob.clone(), [2u8; 32]));

        assert!(overlay.has_account(&bob));
        assert!(!wsv.has_account(&bob));
        assert_eq!(overlay.into_changes().len(), 1);
    }
}
