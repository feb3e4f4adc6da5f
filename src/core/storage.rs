//! In-memory storage backend
//!
//! A [`BankStorage`] implementation backed by `DashMap`s. It is the
//! storage the CLI runs with and the one the tests use; its write switch
//! lets callers simulate an unavailable backend.

use crate::core::traits::BankStorage;
use crate::types::{AccountId, AccountRecord, Customer, CustomerId, StorageError, Transaction};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    accounts: DashMap<AccountId, AccountRecord>,
    numbers: DashMap<String, AccountId>,
    transactions: DashMap<AccountId, Vec<Transaction>>,
    customers: DashMap<CustomerId, Customer>,
    fail_writes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `Unavailable` (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn find_account(&self, account: AccountId) -> Option<AccountRecord> {
        self.accounts.get(&account).map(|record| record.clone())
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                message: "writes are disabled".to_string(),
            });
        }
        Ok(())
    }

    fn index_number(&self, record: &AccountRecord) {
        if let Some(number) = &record.account_number {
            self.numbers.insert(number.clone(), record.id);
        }
    }
}

impl BankStorage for InMemoryStorage {
    fn save_account(&self, record: &AccountRecord) -> Result<(), StorageError> {
        self.check_writable()?;
        if self.accounts.contains_key(&record.id) {
            return Err(StorageError::Conflict {
                key: format!("account/{}", record.id),
            });
        }
        self.index_number(record);
        self.accounts.insert(record.id, record.clone());
        Ok(())
    }

    fn update_account(&self, record: &AccountRecord) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut stored = self
            .accounts
            .get_mut(&record.id)
            .ok_or_else(|| StorageError::Missing {
                key: format!("account/{}", record.id),
            })?;
        *stored = record.clone();
        drop(stored);
        self.index_number(record);
        Ok(())
    }

    fn find_account_by_number(&self, number: &str) -> Result<Option<AccountRecord>, StorageError> {
        let id = match self.numbers.get(number) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.find_account(id))
    }

    fn find_accounts_by_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<AccountRecord>, StorageError> {
        let mut records: Vec<AccountRecord> = self
            .accounts
            .iter()
            .filter(|entry| entry.value().owner == customer)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    fn find_transactions(&self, account: AccountId) -> Result<Vec<Transaction>, StorageError> {
        Ok(self
            .transactions
            .get(&account)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    fn record_transaction(
        &self,
        account: AccountId,
        transaction: &Transaction,
    ) -> Result<(), StorageError> {
        self.check_writable()?;
        self.transactions
            .entry(account)
            .or_default()
            .push(transaction.clone());
        Ok(())
    }

    fn save_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        self.check_writable()?;
        self.customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    fn find_customer_by_id(&self, customer: CustomerId) -> Result<Option<Customer>, StorageError> {
        Ok(self.customers.get(&customer).map(|c| c.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, AccountVariant, Direction, TransactionKind};
    use rust_decimal::Decimal;

    fn record(id: u32, owner: u32) -> AccountRecord {
        Account::open(
            AccountId(id),
            CustomerId(owner),
            "001",
            AccountVariant::Savings {
                monthly_rate: Decimal::ZERO,
            },
            Decimal::ZERO,
        )
        .record()
    }

    #[test]
    fn test_save_then_update() {
        let storage = InMemoryStorage::new();
        let mut header = record(1, 1);
        storage.save_account(&header).unwrap();
        assert!(matches!(
            storage.save_account(&header),
            Err(StorageError::Conflict { .. })
        ));

        header.account_number = Some("001-SAV-10001".to_string());
        header.status = crate::types::AccountStatus::Approved;
        storage.update_account(&header).unwrap();

        let found = storage.find_account_by_number("001-SAV-10001").unwrap();
        assert_eq!(found, Some(header));
        assert_eq!(storage.find_account_by_number("001-SAV-99999").unwrap(), None);
    }

    #[test]
    fn test_update_unknown_account_is_missing() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.update_account(&record(9, 1)),
            Err(StorageError::Missing { .. })
        ));
    }

    #[test]
    fn test_find_accounts_by_customer_is_sorted() {
        let storage = InMemoryStorage::new();
        for (id, owner) in [(3, 1), (1, 1), (2, 2)] {
            storage.save_account(&record(id, owner)).unwrap();
        }
        let ids: Vec<_> = storage
            .find_accounts_by_customer(CustomerId(1))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![AccountId(1), AccountId(3)]);
    }

    #[test]
    fn test_transactions_keep_order() {
        let storage = InMemoryStorage::new();
        for amount in [10, 20] {
            let tx = Transaction::new(
                TransactionKind::Deposit,
                Direction::Credit,
                Decimal::new(amount, 0),
                Decimal::new(amount, 0),
                None,
            );
            storage.record_transaction(AccountId(1), &tx).unwrap();
        }
        let amounts: Vec<_> = storage
            .find_transactions(AccountId(1))
            .unwrap()
            .iter()
            .map(|tx| tx.amount)
            .collect();
        assert_eq!(amounts, vec![Decimal::new(10, 0), Decimal::new(20, 0)]);
        assert!(storage.find_transactions(AccountId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_fail_writes_switch() {
        let storage = InMemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(matches!(
            storage.save_account(&record(1, 1)),
            Err(StorageError::Unavailable { .. })
        ));
        storage.set_fail_writes(false);
        assert!(storage.save_account(&record(1, 1)).is_ok());
    }
}
