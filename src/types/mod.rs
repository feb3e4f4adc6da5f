//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Accounts, their kinds and status machine
//! - `customer`: Customers and employment details
//! - `ledger`: Append-only per-account transaction history
//! - `transaction`: Ledger entries
//! - `operation`: Requests the engine processes
//! - `error`: Error types for the bank engine

pub mod account;
pub mod customer;
pub mod error;
pub mod ledger;
pub mod operation;
pub mod transaction;

pub use account::{
    Account, AccountId, AccountKind, AccountRecord, AccountStatus, AccountSummary,
    AccountVariant, OpenAccountRequest, StaffDecision, WithdrawalPolicy, CURRENCY_SCALE,
};
pub use customer::{Customer, CustomerId, CustomerKind, EmploymentInfo};
pub use error::{BankError, DenialReason, StorageError};
pub use ledger::{Ledger, LedgerError};
pub use operation::{Operation, Outcome};
pub use transaction::{Direction, Transaction, TransactionKind};
