//! Core traits for the collaborators the engine depends on
//!
//! The engine never talks to a database or an id service directly; it is
//! handed implementations of these traits at construction time.

use crate::types::{
    AccountId, AccountKind, AccountRecord, Customer, CustomerId, StorageError, Transaction,
};

/// Persistence collaborator
///
/// Mirrors the in-memory object graph on demand. The engine calls it after
/// an in-memory mutation has been applied and the account lock released;
/// a failure here is reported to the caller but never undoes the mutation.
///
/// Implementations must be safe to call from several threads at once.
pub trait BankStorage: Send + Sync {
    /// Store a newly created account; `Conflict` if the id is taken
    fn save_account(&self, record: &AccountRecord) -> Result<(), StorageError>;

    /// Overwrite an existing account header; `Missing` if it was never saved
    fn update_account(&self, record: &AccountRecord) -> Result<(), StorageError>;

    fn find_account_by_number(&self, number: &str) -> Result<Option<AccountRecord>, StorageError>;

    fn find_accounts_by_customer(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<AccountRecord>, StorageError>;

    /// Ledger entries for an account, oldest first
    fn find_transactions(&self, account: AccountId) -> Result<Vec<Transaction>, StorageError>;

    /// Append one ledger entry for an account
    fn record_transaction(
        &self,
        account: AccountId,
        transaction: &Transaction,
    ) -> Result<(), StorageError>;

    fn save_customer(&self, customer: &Customer) -> Result<(), StorageError>;

    fn find_customer_by_id(&self, customer: CustomerId) -> Result<Option<Customer>, StorageError>;
}

/// Source of public account numbers
///
/// Every call must return a number never returned before, including when
/// called from several threads at once.
pub trait AccountNumberGenerator: Send + Sync {
    fn next_number(&self, kind: AccountKind) -> String;

    /// Note a number issued before this generator existed, such as one on
    /// an account restored from storage, so it is never returned
    fn observe(&self, number: &str);
}
