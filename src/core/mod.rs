//! Core business logic module
//!
//! This module contains the account lifecycle components:
//! - `traits` - Storage and account number collaborators
//! - `engine` - Orchestration of every bank operation
//! - `account_manager` - Account registry with per-account locking
//! - `customer_directory` - Registered customers
//! - `account_factory` - Per-kind opening rules
//! - `approval` - Approval workflow and its queries
//! - `transfer` - Two-account transfer protocol
//! - `interest` - Monthly interest sweep
//! - `number_generator` - Sequential account numbers
//! - `storage` - In-memory storage backend
//! - `async` - Tokio-driven batch processing and concurrent sweep

pub mod account_factory;
pub mod account_manager;
pub mod approval;
pub mod r#async;
pub mod customer_directory;
pub mod engine;
pub mod interest;
pub mod number_generator;
pub mod storage;
pub mod traits;
pub mod transfer;

pub use account_factory::AccountFactory;
pub use account_manager::{AccountHandle, AccountManager};
pub use approval::ApprovalWorkflow;
pub use customer_directory::CustomerDirectory;
pub use engine::{Applied, BankEngine};
pub use interest::{InterestPosting, SweepFailure, SweepReport};
pub use number_generator::SequentialNumberGenerator;
pub use r#async::{BatchProcessor, ProcessingResult};
pub use storage::InMemoryStorage;
pub use traits::{AccountNumberGenerator, BankStorage};
pub use transfer::TransferReceipt;
