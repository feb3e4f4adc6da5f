//! Interest accrual
//!
//! A sweep visits every registered account exactly once, applies its
//! monthly interest under the account's lock, and reports what happened.
//! A failure on one account is recorded and the sweep moves on.

use crate::core::account_manager::{AccountHandle, AccountManager};
use crate::types::{Account, AccountId, AccountRecord, BankError, Outcome, Transaction};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Interest credited to one account
#[derive(Debug, Clone, PartialEq)]
pub struct InterestPosting {
    pub account: AccountId,
    pub amount: Decimal,
}

/// An account the sweep could not credit
#[derive(Debug, Clone, PartialEq)]
pub struct SweepFailure {
    pub account: AccountId,
    pub error: BankError,
}

/// Outcome of one interest sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Accounts visited, whether or not they earned anything
    pub visited: usize,
    /// Accounts that were credited, sorted by id
    pub postings: Vec<InterestPosting>,
    pub total: Decimal,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// Fold one account's accrual result into the report
    pub fn record(&mut self, account: AccountId, result: &Result<Option<Accrual>, BankError>) {
        self.visited += 1;
        match result {
            Ok(Some(accrual)) => {
                self.total = self.total.saturating_add(accrual.amount);
                self.postings.push(InterestPosting {
                    account,
                    amount: accrual.amount,
                });
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%account, %error, "interest not applied");
                self.failures.push(SweepFailure {
                    account,
                    error: error.clone(),
                });
            }
        }
    }

    /// Operation outcome for this sweep
    pub fn outcome(&self) -> Outcome {
        Outcome::InterestApplied {
            accounts: self.postings.len(),
            total: self.total,
        }
    }

    /// Put postings and failures in account order
    pub fn sort(&mut self) {
        self.postings.sort_by_key(|posting| posting.account);
        self.failures.sort_by_key(|failure| failure.account);
    }
}

/// Interest applied to one account, with what storage needs to mirror it
#[derive(Debug, Clone)]
pub struct Accrual {
    pub amount: Decimal,
    pub record: AccountRecord,
    pub entry: Transaction,
}

/// Apply one month's interest to the account behind `handle`
///
/// Returns `None` when the account earns nothing this month.
pub fn accrue(handle: &Mutex<Account>) -> Result<Option<Accrual>, BankError> {
    let mut account = handle.lock();
    let amount = account.apply_monthly_interest()?;
    if amount <= Decimal::ZERO {
        return Ok(None);
    }
    let entry = account
        .ledger()
        .last()
        .cloned()
        .ok_or_else(|| BankError::corrupt_record(account.id(), "interest left no ledger entry"))?;
    Ok(Some(Accrual {
        amount,
        record: account.record(),
        entry,
    }))
}

/// Sweep every account in id order on the calling thread
pub fn apply_interest_to_all(accounts: &AccountManager) -> (SweepReport, Vec<Accrual>) {
    sweep(accounts.handles())
}

pub(crate) fn sweep(handles: Vec<(AccountId, AccountHandle)>) -> (SweepReport, Vec<Accrual>) {
    let mut report = SweepReport::default();
    let mut accruals = Vec::new();
    for (id, handle) in handles {
        let result = accrue(&handle);
        report.record(id, &result);
        if let Ok(Some(accrual)) = result {
            accruals.push(accrual);
        }
    }
    (report, accruals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountVariant, CustomerId, TransactionKind};
    use std::str::FromStr;

    fn add(accounts: &AccountManager, variant: AccountVariant, balance: &str, approve: bool) -> AccountId {
        let id = accounts
            .create(|id| {
                Ok(Account::open(
                    id,
                    CustomerId(1),
                    "001",
                    variant,
                    Decimal::from_str(balance).unwrap(),
                ))
            })
            .unwrap();
        if approve {
            accounts
                .update(id, |account| account.approve("staff", format!("001-X-{}", id)))
                .unwrap();
        }
        id
    }

    fn savings() -> AccountVariant {
        AccountVariant::Savings {
            monthly_rate: Decimal::from_str("0.0005").unwrap(),
        }
    }

    #[test]
    fn test_sweep_visits_every_account_once() {
        let accounts = AccountManager::new();
        let earning = add(&accounts, savings(), "1000", true);
        let pending = add(&accounts, savings(), "1000", false);
        let overdrawn = add(&accounts, savings(), "-50", true);
        let cheque = add(
            &accounts,
            AccountVariant::Cheque {
                overdraft_allowed: false,
                employment: None,
            },
            "1000",
            true,
        );

        let (report, accruals) = apply_interest_to_all(&accounts);
        assert_eq!(report.visited, 4);
        assert_eq!(
            report.postings,
            vec![InterestPosting {
                account: earning,
                amount: Decimal::from_str("0.50").unwrap()
            }]
        );
        assert_eq!(report.total, Decimal::from_str("0.5").unwrap());
        assert!(report.failures.is_empty());
        assert_eq!(accruals.len(), 1);
        assert_eq!(accruals[0].entry.kind, TransactionKind::Interest);

        for id in [pending, overdrawn, cheque] {
            assert!(accounts.read(id, |a| a.ledger().is_empty()).unwrap());
        }
    }

    #[test]
    fn test_second_sweep_compounds() {
        let accounts = AccountManager::new();
        let id = add(
            &accounts,
            AccountVariant::Investment {
                monthly_rate: Decimal::from_str("0.1").unwrap(),
                minimum_balance: Decimal::ZERO,
            },
            "100",
            true,
        );
        apply_interest_to_all(&accounts);
        let (report, _) = apply_interest_to_all(&accounts);
        assert_eq!(report.total, Decimal::from_str("11").unwrap());
        assert_eq!(accounts.read(id, |a| a.balance()).unwrap(), Decimal::from_str("121").unwrap());
    }

    #[test]
    fn test_closed_accounts_are_visited_but_not_credited() {
        let accounts = AccountManager::new();
        let id = add(&accounts, savings(), "1000", true);
        accounts.update(id, |account| account.close("staff")).unwrap();

        let (report, accruals) = apply_interest_to_all(&accounts);
        assert_eq!(report.visited, 1);
        assert!(report.postings.is_empty());
        assert!(report.failures.is_empty());
        assert!(accruals.is_empty());
    }
}
