//! Append-only per-account ledger
//!
//! The ledger remembers the balance an account starts from (zero, or the
//! charged opening fee) and every balance-affecting event after that,
//! including the opening deposit, oldest first. Entries are never
//! reordered, edited or removed, so the ledger alone is enough to audit the
//! account's current balance.

use super::transaction::{Direction, Transaction, TransactionKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a sequence of entries is not a valid ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An entry's recorded balance does not follow from its predecessor
    #[error("ledger entry {index} records balance {recorded}, replay gives {expected}")]
    Mismatch {
        /// Zero-based position of the offending entry
        index: usize,
        /// Balance implied by the opening balance and earlier entries
        expected: Decimal,
        /// Balance stored on the entry
        recorded: Decimal,
    },

    /// Replaying up to this entry overflows the balance
    #[error("ledger entry {index} overflows the running balance")]
    Overflow { index: usize },

    /// An entry that no operation could have produced
    #[error("ledger entry {index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// Ordered, append-only sequence of transactions for one account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    opening_balance: Decimal,
    entries: Vec<Transaction>,
}

impl Ledger {
    /// Create an empty ledger for an account opened at `opening_balance`
    pub fn new(opening_balance: Decimal) -> Self {
        Ledger {
            opening_balance,
            entries: Vec::new(),
        }
    }

    /// Rebuild a ledger from stored entries, checking the balance chain
    ///
    /// Every amount must be positive, and the direction must fit the kind:
    /// deposits and interest credit, withdrawals debit, transfers either.
    pub fn from_entries(
        opening_balance: Decimal,
        entries: Vec<Transaction>,
    ) -> Result<Self, LedgerError> {
        for (index, entry) in entries.iter().enumerate() {
            check_entry(entry).map_err(|reason| LedgerError::InvalidEntry {
                index,
                reason: reason.to_string(),
            })?;
        }
        let ledger = Ledger {
            opening_balance,
            entries,
        };
        ledger.replay()?;
        Ok(ledger)
    }

    /// Append an entry and return a reference to it
    pub fn record(
        &mut self,
        kind: TransactionKind,
        direction: Direction,
        amount: Decimal,
        balance_after: Decimal,
        description: Option<String>,
    ) -> &Transaction {
        tracing::debug!(%kind, %direction, %amount, %balance_after, "ledger append");
        self.entries.push(Transaction::new(
            kind,
            direction,
            amount,
            balance_after,
            description,
        ));
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first
    pub fn all(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    /// Balance the account held before the first entry
    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    /// Replay every entry from the opening balance
    ///
    /// Returns the resulting balance, or the first entry whose recorded
    /// `balance_after` disagrees with the replayed running balance.
    pub fn replay(&self) -> Result<Decimal, LedgerError> {
        let mut running = self.opening_balance;
        for (index, entry) in self.entries.iter().enumerate() {
            running = running
                .checked_add(entry.signed_amount())
                .ok_or(LedgerError::Overflow { index })?;
            if running != entry.balance_after {
                return Err(LedgerError::Mismatch {
                    index,
                    expected: running,
                    recorded: entry.balance_after,
                });
            }
        }
        Ok(running)
    }
}

fn check_entry(entry: &Transaction) -> Result<(), &'static str> {
    if entry.amount <= Decimal::ZERO {
        return Err("amount is not positive");
    }
    match (entry.kind, entry.direction) {
        (TransactionKind::Deposit | TransactionKind::Interest, Direction::Debit) => {
            Err("deposits and interest must be credits")
        }
        (TransactionKind::Withdraw, Direction::Credit) => Err("withdrawals must be debits"),
        _ => Ok(()),
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(direction: Direction, amount: i64, balance_after: i64) -> Transaction {
        let kind = match direction {
            Direction::Credit => TransactionKind::Deposit,
            Direction::Debit => TransactionKind::Withdraw,
        };
        Transaction::new(
            kind,
            direction,
            Decimal::new(amount, 0),
            Decimal::new(balance_after, 0),
            None,
        )
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new(Decimal::new(-50, 0));
        assert!(ledger.is_empty());
        assert_eq!(ledger.opening_balance(), Decimal::new(-50, 0));
        assert_eq!(ledger.replay(), Ok(Decimal::new(-50, 0)));
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut ledger = Ledger::new(Decimal::ZERO);
        ledger.record(
            TransactionKind::Deposit,
            Direction::Credit,
            Decimal::new(100, 0),
            Decimal::new(100, 0),
            None,
        );
        ledger.record(
            TransactionKind::Withdraw,
            Direction::Debit,
            Decimal::new(30, 0),
            Decimal::new(70, 0),
            None,
        );

        let kinds: Vec<_> = ledger.iter().map(|tx| tx.kind).collect();
        assert_eq!(kinds, vec![TransactionKind::Deposit, TransactionKind::Withdraw]);
        assert_eq!(ledger.last().map(|tx| tx.balance_after), Some(Decimal::new(70, 0)));
        assert_eq!(ledger.replay(), Ok(Decimal::new(70, 0)));
    }

    #[test]
    fn test_all_is_restartable() {
        let mut ledger = Ledger::new(Decimal::ZERO);
        ledger.record(
            TransactionKind::Deposit,
            Direction::Credit,
            Decimal::ONE,
            Decimal::ONE,
            None,
        );
        assert_eq!(ledger.all().len(), 1);
        assert_eq!(ledger.all().len(), 1);
        assert_eq!((&ledger).into_iter().count(), 1);
    }

    #[test]
    fn test_from_entries_accepts_consistent_chain() {
        let entries = vec![
            entry(Direction::Credit, 100, 50),
            entry(Direction::Debit, 20, 30),
        ];
        let ledger = Ledger::from_entries(Decimal::new(-50, 0), entries).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_from_entries_rejects_broken_chain() {
        let entries = vec![
            entry(Direction::Credit, 100, 100),
            entry(Direction::Debit, 20, 90),
        ];
        let error = Ledger::from_entries(Decimal::ZERO, entries).unwrap_err();
        assert_eq!(
            error,
            LedgerError::Mismatch {
                index: 1,
                expected: Decimal::new(80, 0),
                recorded: Decimal::new(90, 0),
            }
        );
    }

    #[test]
    fn test_from_entries_reports_overflow() {
        let entries = vec![entry(Direction::Credit, 1, 1)];
        let error = Ledger::from_entries(Decimal::MAX, entries).unwrap_err();
        assert_eq!(error, LedgerError::Overflow { index: 0 });
    }

    fn stored(kind: TransactionKind, direction: Direction, amount: i64) -> Transaction {
        let signed = match direction {
            Direction::Credit => amount,
            Direction::Debit => -amount,
        };
        Transaction::new(kind, direction, Decimal::new(amount, 0), Decimal::new(signed, 0), None)
    }

    #[rstest]
    #[case::zero_amount(stored(TransactionKind::Deposit, Direction::Credit, 0))]
    #[case::negative_amount(stored(TransactionKind::Transfer, Direction::Credit, -5))]
    #[case::debit_deposit(stored(TransactionKind::Deposit, Direction::Debit, 5))]
    #[case::debit_interest(stored(TransactionKind::Interest, Direction::Debit, 5))]
    #[case::credit_withdrawal(stored(TransactionKind::Withdraw, Direction::Credit, 5))]
    fn test_from_entries_rejects_impossible_entries(#[case] bad: Transaction) {
        let error = Ledger::from_entries(Decimal::ZERO, vec![bad]).unwrap_err();
        assert!(matches!(error, LedgerError::InvalidEntry { index: 0, .. }), "{:?}", error);
    }

    #[rstest]
    #[case::transfer_in(stored(TransactionKind::Transfer, Direction::Credit, 5))]
    #[case::transfer_out(stored(TransactionKind::Transfer, Direction::Debit, 5))]
    #[case::interest(stored(TransactionKind::Interest, Direction::Credit, 5))]
    fn test_from_entries_accepts_valid_directions(#[case] good: Transaction) {
        assert!(Ledger::from_entries(Decimal::ZERO, vec![good]).is_ok());
    }
}
