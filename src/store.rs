//! In-memory account store.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::Amount;
use crate::model::{Account, AccountId, Pin};

/// Errors raised while seeding the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate account {0}")]
    DuplicateAccount(AccountId),
    #[error("account {0} has negative balance {1}")]
    NegativeBalance(AccountId, Amount),
}

/// Accounts keyed by identifier.
///
/// The store does not validate transfers; `credit`/`debit` trust the engine
/// to keep balances non-negative.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: BTreeMap<AccountId, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed accounts the bank starts with when no seed file is given.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        for (name, pin, balance) in [
            ("alice", "1234", 10_000),
            ("bob", "5678", 5_000),
            ("charlie", "9012", 15_000),
        ] {
            store.accounts.insert(
                name.to_string(),
                Account::new(name, Pin::new(pin), Amount::from_units(balance)),
            );
        }
        store
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for account in accounts {
            store.insert(account)?;
        }
        Ok(store)
    }

    pub fn insert(&mut self, account: Account) -> Result<(), StoreError> {
        if account.balance().is_negative() {
            return Err(StoreError::NegativeBalance(
                account.id().to_string(),
                account.balance(),
            ));
        }
        if self.accounts.contains_key(account.id()) {
            return Err(StoreError::DuplicateAccount(account.id().to_string()));
        }
        self.accounts.insert(account.id().to_string(), account);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All accounts, ordered by identifier.
    pub fn list_all(&self) -> impl Iterator<Item = &Account> + '_ {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of every balance, or `None` if it does not fit an [`Amount`].
    pub fn total(&self) -> Option<Amount> {
        self.accounts
            .values()
            .try_fold(Amount::ZERO, |acc, account| acc.checked_add(account.balance()))
    }

    /// Returns the new balance, or `None` if the account does not exist.
    pub(crate) fn credit(&mut self, id: &str, amount: Amount) -> Option<Amount> {
        let account = self.accounts.get_mut(id)?;
        account.credit(amount);
        Some(account.balance())
    }

    /// Returns the new balance, or `None` if the account does not exist.
    pub(crate) fn debit(&mut self, id: &str, amount: Amount) -> Option<Amount> {
        let account = self.accounts.get_mut(id)?;
        account.debit(amount);
        Some(account.balance())
    }
}
