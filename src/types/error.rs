//! Error types for the bank engine
//!
//! This module defines every failure the account engine can report.
//! Domain-rule failures live in [`BankError`]; failures of the storage
//! collaborator live in [`StorageError`]. A write failure after a mutation
//! has been applied is never folded into the domain type, so a caller can
//! always tell "the bank said no" apart from "the bank said yes but the
//! write to storage failed".
//!
//! # Error Categories
//!
//! - **Amount errors**: non-positive deposits, withdrawals and transfers
//! - **State errors**: approve/reject/close outside the legal status
//! - **Policy errors**: withdrawal denied, approval ineligible, creation refused
//! - **Lookup errors**: unknown account, account number or customer
//! - **Arithmetic errors**: overflow in balance calculations
//! - **Storage errors**: storage failures on read paths
//! - **File I/O and CSV errors**: used by the command-file driver

use super::account::{AccountId, AccountStatus};
use super::customer::CustomerId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Why a withdrawal (or the debit leg of a transfer) was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The account type does not support withdrawals at all (savings)
    NotPermitted,
    /// The account supports withdrawals but the balance does not cover the amount
    InsufficientFunds,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NotPermitted => write!(f, "withdrawals are not permitted"),
            DenialReason::InsufficientFunds => write!(f, "insufficient funds"),
        }
    }
}

/// Main error type for the bank engine
///
/// Each variant carries enough context to produce a user-facing message,
/// and [`BankError::code`] maps it to a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Non-positive amount passed to deposit, withdraw or transfer
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Operation that received it
        operation: String,
    },

    /// Lifecycle operation attempted outside its legal source status
    #[error("Cannot {operation} account {account} while it is {status}")]
    InvalidState {
        /// Account the operation targeted
        account: AccountId,
        /// Status the account was in
        status: AccountStatus,
        /// Operation that was refused
        operation: String,
    },

    /// Withdrawal or transfer debit refused by the account's policy
    #[error("Withdrawal of {requested} from account {account} denied: {reason}")]
    WithdrawalDenied {
        /// Account the funds were requested from
        account: AccountId,
        /// Requested amount
        requested: Decimal,
        /// Policy outcome
        reason: DenialReason,
    },

    /// Eligibility gate failed at approval time; the account stays pending
    #[error("Account {account} is not eligible for approval: {reason}")]
    IneligibleForApproval {
        /// Account under review
        account: AccountId,
        /// Which gate failed
        reason: String,
    },

    /// The factory refused to create the account at all
    #[error("Account creation refused for customer {customer}: {reason}")]
    AccountCreationRefused {
        /// Customer that requested the account
        customer: CustomerId,
        /// Why the request was refused
        reason: String,
    },

    /// No account with this internal id is known
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The unknown id
        account: AccountId,
    },

    /// No account carries this public account number
    #[error("Account number '{number}' not found")]
    AccountNumberNotFound {
        /// The unknown account number
        number: String,
    },

    /// No customer with this id is registered
    #[error("Customer {customer} not found")]
    CustomerNotFound {
        /// The unknown id
        customer: CustomerId,
    },

    /// A customer with this id is already registered
    #[error("Customer {customer} is already registered")]
    DuplicateCustomer {
        /// The duplicated id
        customer: CustomerId,
    },

    /// Source and destination of a transfer are the same account
    #[error("Account {account} cannot transfer to itself")]
    TransferToSelf {
        /// The account on both sides
        account: AccountId,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to maintain account integrity.
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account involved
        account: AccountId,
    },

    /// A stored account record could not be turned back into an account
    #[error("Corrupt record for account {account}: {reason}")]
    CorruptRecord {
        /// Account the record belongs to
        account: AccountId,
        /// Which invariant the record breaks
        reason: String,
    },

    /// Work for one account stopped before it could report a result
    ///
    /// The account may or may not have been changed in memory.
    #[error("Task for account {account} failed: {message}")]
    TaskFailed {
        /// Account the task was working on
        account: AccountId,
        /// What the runtime reported
        message: String,
    },

    /// Storage failed while loading state the operation depends on
    ///
    /// Only read paths report this; write failures after an applied
    /// mutation travel separately in `Applied::persistence`.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl BankError {
    /// Stable code identifying the failure class
    ///
    /// Codes never change between releases; calling layers match on these
    /// rather than on message text.
    pub fn code(&self) -> &'static str {
        match self {
            BankError::InvalidAmount { .. } => "invalid_amount",
            BankError::InvalidState { .. } => "invalid_state",
            BankError::WithdrawalDenied {
                reason: DenialReason::NotPermitted,
                ..
            } => "withdrawal_not_permitted",
            BankError::WithdrawalDenied {
                reason: DenialReason::InsufficientFunds,
                ..
            } => "insufficient_funds",
            BankError::IneligibleForApproval { .. } => "ineligible_for_approval",
            BankError::AccountCreationRefused { .. } => "account_creation_refused",
            BankError::AccountNotFound { .. } => "account_not_found",
            BankError::AccountNumberNotFound { .. } => "account_number_not_found",
            BankError::CustomerNotFound { .. } => "customer_not_found",
            BankError::DuplicateCustomer { .. } => "duplicate_customer",
            BankError::TransferToSelf { .. } => "transfer_to_self",
            BankError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            BankError::CorruptRecord { .. } => "corrupt_record",
            BankError::TaskFailed { .. } => "task_failed",
            BankError::Storage(_) => "storage_error",
            BankError::IoError { .. } => "io_error",
            BankError::ParseError { .. } => "parse_error",
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        BankError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidState error
    pub fn invalid_state(account: AccountId, status: AccountStatus, operation: &str) -> Self {
        BankError::InvalidState {
            account,
            status,
            operation: operation.to_string(),
        }
    }

    /// Create a WithdrawalDenied error
    pub fn withdrawal_denied(account: AccountId, requested: Decimal, reason: DenialReason) -> Self {
        BankError::WithdrawalDenied {
            account,
            requested,
            reason,
        }
    }

    /// Create an IneligibleForApproval error
    pub fn ineligible(account: AccountId, reason: impl Into<String>) -> Self {
        BankError::IneligibleForApproval {
            account,
            reason: reason.into(),
        }
    }

    /// Create an AccountCreationRefused error
    pub fn creation_refused(customer: CustomerId, reason: impl Into<String>) -> Self {
        BankError::AccountCreationRefused {
            customer,
            reason: reason.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a CorruptRecord error
    pub fn corrupt_record(account: AccountId, reason: impl Into<String>) -> Self {
        BankError::CorruptRecord {
            account,
            reason: reason.into(),
        }
    }
}

/// Failure reported by the storage collaborator
///
/// Returned alongside a successfully applied in-memory mutation; the
/// mutation is never rolled back because of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing store could not be reached or refused the write
    #[error("Storage unavailable: {message}")]
    Unavailable {
        /// Backend-specific description
        message: String,
    },

    /// A record with this key already exists
    #[error("Record {key} already exists")]
    Conflict {
        /// Key of the existing record
        key: String,
    },

    /// A record expected to exist does not
    #[error("Record {key} is missing")]
    Missing {
        /// Key of the missing record
        key: String,
    },
}
