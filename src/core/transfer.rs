//! Transfer protocol
//!
//! A transfer moves money between two accounts as one step: both sides are
//! validated before either is touched, then the destination is credited and
//! the source debited, each with exactly one `TRANSFER` ledger entry naming
//! the other side.

use crate::core::account_manager::AccountManager;
use crate::types::{
    Account, AccountId, AccountRecord, BankError, Direction, Transaction, TransactionKind,
};
use rust_decimal::Decimal;

/// State of both accounts right after a transfer, for persistence
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub source: AccountRecord,
    pub destination: AccountRecord,
    pub debit: Transaction,
    pub credit: Transaction,
}

/// Move `amount` from `source` to `destination`
///
/// On any error both accounts are left exactly as they were.
///
/// # Errors
///
/// - `InvalidAmount` if `amount <= 0`
/// - `TransferToSelf` if both sides are the same account
/// - `WithdrawalDenied` if the source's withdrawal policy refuses the debit
/// - `InvalidState` if either side is closed
pub fn transfer(
    source: &mut Account,
    destination: &mut Account,
    amount: Decimal,
) -> Result<(), BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::invalid_amount(amount, "transfer"));
    }
    if source.id() == destination.id() {
        return Err(BankError::TransferToSelf {
            account: source.id(),
        });
    }

    let source_balance = source.check_debit(amount, "transfer")?;
    let destination_balance = destination.check_credit(amount, "transfer")?;

    destination.post(
        TransactionKind::Transfer,
        Direction::Credit,
        amount,
        destination_balance,
        Some(format!("Transfer from {}", source.reference())),
    );
    source.post(
        TransactionKind::Transfer,
        Direction::Debit,
        amount,
        source_balance,
        Some(format!("Transfer to {}", destination.reference())),
    );
    Ok(())
}

/// Transfer between two registered accounts
///
/// Locks both accounts in ascending id order for the whole protocol, so
/// concurrent transfers in opposite directions cannot deadlock.
pub fn transfer_between(
    accounts: &AccountManager,
    from: AccountId,
    to: AccountId,
    amount: Decimal,
) -> Result<TransferReceipt, BankError> {
    if amount <= Decimal::ZERO {
        return Err(BankError::invalid_amount(amount, "transfer"));
    }
    if from == to {
        return Err(BankError::TransferToSelf { account: from });
    }

    let source_handle = accounts.handle(from)?;
    let destination_handle = accounts.handle(to)?;

    let (first, second) = if from < to {
        (&source_handle, &destination_handle)
    } else {
        (&destination_handle, &source_handle)
    };
    let mut first = first.lock();
    let mut second = second.lock();
    let (source, destination) = if from < to {
        (&mut *first, &mut *second)
    } else {
        (&mut *second, &mut *first)
    };

    transfer(source, destination, amount)?;

    let debit = source.ledger().last().cloned();
    let credit = destination.ledger().last().cloned();
    match (debit, credit) {
        (Some(debit), Some(credit)) => Ok(TransferReceipt {
            source: source.record(),
            destination: destination.record(),
            debit,
            credit,
        }),
        _ => Err(BankError::corrupt_record(from, "transfer left no ledger entry")),
    }
}
