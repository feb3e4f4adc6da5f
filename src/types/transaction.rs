//! Transaction-related types for the bank engine
//!
//! A [`Transaction`] is one immutable ledger entry: a balance-affecting
//! event on a single account together with the balance it left behind.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of balance-affecting event recorded on a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Funds paid into the account
    Deposit,
    /// Funds taken out of the account
    Withdraw,
    /// Monthly interest credited by the accrual sweep
    Interest,
    /// One side of an account-to-account transfer
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::Interest => "INTEREST",
            TransactionKind::Transfer => "TRANSFER",
        };
        f.write_str(label)
    }
}

/// Which way the money moved, from the owning account's point of view
///
/// Deposits and interest are always credits and withdrawals always debits;
/// transfers can be either, depending on which ledger the entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Credit,
    Debit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Credit => f.write_str("credit"),
            Direction::Debit => f.write_str("debit"),
        }
    }
}

/// Immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// What kind of event this is
    pub kind: TransactionKind,

    /// Credit or debit on the owning account
    pub direction: Direction,

    /// Always positive; the sign comes from `direction`
    pub amount: Decimal,

    /// Balance of the owning account immediately after this event
    pub balance_after: Decimal,

    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// Free text such as the counterparty account number or "overdraft"
    pub description: Option<String>,
}

impl Transaction {
    /// Create a transaction stamped with the current time
    pub fn new(
        kind: TransactionKind,
        direction: Direction,
        amount: Decimal,
        balance_after: Decimal,
        description: Option<String>,
    ) -> Self {
        Transaction {
            kind,
            direction,
            amount,
            balance_after,
            timestamp: Utc::now(),
            description,
        }
    }

    /// Effect of this entry on the owning account's balance
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} -> bal: {:.2}",
            self.timestamp.date_naive(),
            self.kind,
            self.amount,
            self.balance_after
        )?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        Ok(())
    }
}
