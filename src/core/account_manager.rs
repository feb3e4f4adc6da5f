//! Account management module
//!
//! This module provides the `AccountManager` struct which owns every account
//! the bank knows about and hands out synchronized access to them.
//!
//! # Design
//!
//! Accounts are kept in a `DashMap` of `Arc<Mutex<Account>>`. The map only
//! guards membership; each account has its own mutex, and every mutation of
//! an account happens while that mutex is held. Handles are cloned out of
//! the map before locking, so no shard lock is held while an account lock
//! is taken.
//!
//! Operations that need two accounts at once (transfers) lock them in
//! ascending [`AccountId`] order.

use crate::types::{Account, AccountId, AccountSummary, BankError};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, individually locked account
pub type AccountHandle = Arc<Mutex<Account>>;

/// Registry of all accounts, keyed by id
#[derive(Debug)]
pub struct AccountManager {
    accounts: DashMap<AccountId, AccountHandle>,
    /// Next id to hand out; held while an account is being built so a
    /// refused creation does not consume an id
    next_id: Mutex<u32>,
}

impl AccountManager {
    pub fn new() -> Self {
        AccountManager {
            accounts: DashMap::new(),
            next_id: Mutex::new(1),
        }
    }

    /// Build and register a new account under the next free id
    ///
    /// `build` receives the id the account will get. If it fails, nothing
    /// is registered and the id is handed out again next time.
    pub fn create<F>(&self, build: F) -> Result<AccountId, BankError>
    where
        F: FnOnce(AccountId) -> Result<Account, BankError>,
    {
        let mut next_id = self.next_id.lock();
        let id = AccountId(*next_id);
        let account = build(id)?;
        *next_id += 1;
        self.accounts.insert(id, Arc::new(Mutex::new(account)));
        Ok(id)
    }

    /// Register an account restored from storage
    ///
    /// Returns `false` without replacing anything if the id is already
    /// known. Later ids are allocated above the restored one.
    pub fn insert(&self, account: Account) -> bool {
        let id = account.id();
        let mut next_id = self.next_id.lock();
        if self.accounts.contains_key(&id) {
            return false;
        }
        if id.0 >= *next_id {
            *next_id = id.0 + 1;
        }
        self.accounts.insert(id, Arc::new(Mutex::new(account)));
        true
    }

    /// Shared handle to an account
    pub fn handle(&self, id: AccountId) -> Result<AccountHandle, BankError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(BankError::AccountNotFound { account: id })
    }

    /// Run `f` on an account while holding its lock
    ///
    /// The account is left exactly as `f` leaves it; callers validate
    /// before mutating so an error leaves the account untouched.
    pub fn update<T, F>(&self, id: AccountId, f: F) -> Result<T, BankError>
    where
        F: FnOnce(&mut Account) -> Result<T, BankError>,
    {
        let handle = self.handle(id)?;
        let mut account = handle.lock();
        f(&mut *account)
    }

    /// Read from an account while holding its lock
    pub fn read<T, F>(&self, id: AccountId, f: F) -> Result<T, BankError>
    where
        F: FnOnce(&Account) -> T,
    {
        let handle = self.handle(id)?;
        let account = handle.lock();
        Ok(f(&*account))
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All handles, sorted by id
    pub fn handles(&self) -> Vec<(AccountId, AccountHandle)> {
        let mut handles: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        handles.sort_by_key(|(id, _)| *id);
        handles
    }

    /// Point-in-time copies of every account, sorted by id
    pub fn all(&self) -> Vec<Account> {
        self.handles()
            .into_iter()
            .map(|(_, handle)| handle.lock().clone())
            .collect()
    }

    /// Summaries of the accounts matching `filter`, sorted by id
    pub fn summaries_where<F>(&self, filter: F) -> Vec<AccountSummary>
    where
        F: Fn(&Account) -> bool,
    {
        self.handles()
            .into_iter()
            .filter_map(|(_, handle)| {
                let account = handle.lock();
                filter(&*account).then(|| account.summary())
            })
            .collect()
    }

    /// Id of the account carrying `number`, if it is loaded
    pub fn find_by_number(&self, number: &str) -> Option<AccountId> {
        self.handles().into_iter().find_map(|(id, handle)| {
            let account = handle.lock();
            (account.account_number() == Some(number)).then_some(id)
        })
    }
}

impl Default for AccountManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountStatus, AccountVariant, CustomerId};
    use rust_decimal::Decimal;
    use std::thread;

    fn build(id: AccountId) -> Result<Account, BankError> {
        Ok(Account::open(
            id,
            CustomerId(1),
            "001",
            AccountVariant::Cheque {
                overdraft_allowed: true,
                employment: None,
            },
            Decimal::ZERO,
        ))
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let manager = AccountManager::new();
        assert_eq!(manager.create(build).unwrap(), AccountId(1));
        assert_eq!(manager.create(build).unwrap(), AccountId(2));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_refused_creation_does_not_consume_id() {
        let manager = AccountManager::new();
        let refused = manager.create(|_| Err(BankError::creation_refused(CustomerId(1), "no")));
        assert!(refused.is_err());
        assert!(manager.is_empty());
        assert_eq!(manager.create(build).unwrap(), AccountId(1));
    }

    #[test]
    fn test_update_unknown_account() {
        let manager = AccountManager::new();
        let result = manager.update(AccountId(9), |account| account.deposit(Decimal::ONE));
        assert_eq!(result.unwrap_err(), BankError::AccountNotFound { account: AccountId(9) });
    }

    #[test]
    fn test_insert_moves_id_allocation_past_restored_account() {
        let manager = AccountManager::new();
        assert!(manager.insert(build(AccountId(5)).unwrap()));
        assert!(!manager.insert(build(AccountId(5)).unwrap()));
        assert_eq!(manager.create(build).unwrap(), AccountId(6));
    }

    #[test]
    fn test_find_by_number() {
        let manager = AccountManager::new();
        let id = manager.create(build).unwrap();
        manager.create(build).unwrap();
        manager
            .update(id, |account| account.approve("staff", "001-CHQ-10001".to_string()))
            .unwrap();

        assert_eq!(manager.find_by_number("001-CHQ-10001"), Some(id));
        assert_eq!(manager.find_by_number("001-CHQ-10002"), None);
        let approved = manager.summaries_where(|a| a.status() == AccountStatus::Approved);
        assert_eq!(approved.len(), 1);
    }

    #[test]
    fn test_concurrent_deposits_are_serialized() {
        let manager = Arc::new(AccountManager::new());
        let id = manager.create(build).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..100 {
                        manager
                            .update(id, |account| account.deposit(Decimal::ONE))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (balance, entries) = manager
            .read(id, |account| (account.balance(), account.ledger().len()))
            .unwrap();
        assert_eq!(balance, Decimal::new(800, 0));
        assert_eq!(entries, 800);
    }
}
