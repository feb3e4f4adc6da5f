//! Rust Bank Engine Library
//! # Overview
//!
//! This library manages the lifecycle of customer bank accounts: opening,
//! staff approval, deposits, withdrawals, transfers, monthly interest and
//! closing. Operations can be called directly on a [`BankEngine`] or read
//! from CSV by a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Customer, Ledger, errors)
//! - [`config`] - Bank configuration (rates, fees, branch code)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Operation orchestration and persistence
//!   - [`core::account_manager`] - Account registry with per-account locks
//!   - [`core::approval`] - Approval workflow and account numbers
//!   - [`core::transfer`] - Two-account transfers in a fixed lock order
//!   - [`core::interest`] - Monthly interest sweep
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Account Kinds
//!
//! - **Savings**: opening fee, monthly interest while in credit, no withdrawals
//! - **Investment**: minimum balance for approval, monthly interest, withdrawals within balance
//! - **Cheque**: needs verified employment for individuals, optional overdraft, no interest
//!
//! # Account States
//!
//! `PENDING` accounts become `APPROVED` (and receive an account number) or
//! `REJECTED`; approved accounts can be `CLOSED`.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::BankConfig;
pub use core::{AccountManager, Applied, BankEngine, InMemoryStorage, SweepReport};
pub use io::{write_accounts_csv, write_ledger_csv};
pub use types::{
    Account, AccountId, AccountKind, AccountStatus, BankError, Customer, CustomerId,
    OpenAccountRequest, Operation, Outcome, Transaction, TransactionKind,
};
