//! CSV format handling for operation records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - OperationRecord structure for deserialization
//! - Conversion from CSV records to [`Operation`]s
//! - Accounts and ledger report serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input format
//!
//! ```text
//! op,customer,account,to,amount,kind,name,reference,actor,employer,employer_address,overdraft
//! individual,1,,,,,Neo Kgosi,NID-1,,Orapa Mine,Box 10,
//! open,1,,,1000,savings,,,,,,
//! approve,,1,,,,,,staff-7,,,
//! transfer,,1,2,25.50,,,,,,,
//! ```
//!
//! Only the columns an operation needs are read; the rest may be empty.

use crate::types::{
    AccountId, AccountKind, AccountSummary, BankError, CustomerId, EmploymentInfo,
    OpenAccountRequest, Operation, Transaction,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct OperationRecord {
    pub op: String,
    pub customer: Option<u32>,
    pub account: Option<u32>,
    pub to: Option<u32>,
    pub amount: Option<String>,
    pub kind: Option<String>,
    pub name: Option<String>,
    /// National id for individuals, registration number for companies
    pub reference: Option<String>,
    pub actor: Option<String>,
    pub employer: Option<String>,
    pub employer_address: Option<String>,
    pub overdraft: Option<String>,
}

fn parse_error(message: String) -> BankError {
    BankError::ParseError {
        line: None,
        message,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_text(value: Option<String>, field: &str, op: &str) -> Result<String, BankError> {
    present(value).ok_or_else(|| parse_error(format!("'{}' requires '{}'", op, field)))
}

fn require_id(value: Option<u32>, field: &str, op: &str) -> Result<u32, BankError> {
    value.ok_or_else(|| parse_error(format!("'{}' requires '{}'", op, field)))
}

fn parse_amount(value: Option<String>, op: &str) -> Result<Option<Decimal>, BankError> {
    match present(value) {
        Some(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| parse_error(format!("Invalid amount '{}' for '{}'", raw, op))),
        None => Ok(None),
    }
}

fn require_amount(value: Option<String>, op: &str) -> Result<Decimal, BankError> {
    parse_amount(value, op)?.ok_or_else(|| parse_error(format!("'{}' requires an amount", op)))
}

fn parse_flag(value: Option<String>) -> Result<Option<bool>, BankError> {
    match present(value) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(parse_error(format!("Invalid overdraft flag '{}'", raw))),
        },
    }
}

/// Convert an OperationRecord to an Operation
///
/// The op name is case insensitive. Amounts are validated only for syntax
/// here; sign and state checks belong to the engine.
///
/// # Errors
///
/// `BankError::ParseError` (without a line number) when the op is unknown,
/// a column the op needs is missing, or a value does not parse.
pub fn convert_operation_record(record: OperationRecord) -> Result<Operation, BankError> {
    let op = record.op.trim().to_ascii_lowercase();
    let op = op.as_str();

    let operation = match op {
        "individual" => {
            let employment = match (present(record.employer), present(record.employer_address)) {
                (None, None) => None,
                (name, address) => Some(EmploymentInfo::new(
                    name.unwrap_or_default(),
                    address.unwrap_or_default(),
                    "",
                )),
            };
            Operation::RegisterIndividual {
                customer: CustomerId(require_id(record.customer, "customer", op)?),
                name: require_text(record.name, "name", op)?,
                national_id: require_text(record.reference, "reference", op)?,
                employment,
            }
        }
        "company" => Operation::RegisterCompany {
            customer: CustomerId(require_id(record.customer, "customer", op)?),
            name: require_text(record.name, "name", op)?,
            registration_number: require_text(record.reference, "reference", op)?,
        },
        "open" => {
            let kind = AccountKind::from_str(&require_text(record.kind, "kind", op)?)?;
            let deposit = parse_amount(record.amount, op)?.unwrap_or(Decimal::ZERO);
            let mut request = OpenAccountRequest::new(kind, deposit);
            if let Some(overdraft) = parse_flag(record.overdraft)? {
                request = request.with_overdraft(overdraft);
            }
            Operation::Open {
                customer: CustomerId(require_id(record.customer, "customer", op)?),
                request,
            }
        }
        "approve" | "reject" | "close" => {
            let account = AccountId(require_id(record.account, "account", op)?);
            let staff = require_text(record.actor, "actor", op)?;
            match op {
                "approve" => Operation::Approve { account, staff },
                "reject" => Operation::Reject { account, staff },
                _ => Operation::Close { account, staff },
            }
        }
        "deposit" => Operation::Deposit {
            account: AccountId(require_id(record.account, "account", op)?),
            amount: require_amount(record.amount, op)?,
        },
        "withdraw" | "withdrawal" => Operation::Withdraw {
            account: AccountId(require_id(record.account, "account", op)?),
            amount: require_amount(record.amount, op)?,
        },
        "transfer" => Operation::Transfer {
            from: AccountId(require_id(record.account, "account", op)?),
            to: AccountId(require_id(record.to, "to", op)?),
            amount: require_amount(record.amount, op)?,
        },
        "interest" => Operation::Interest,
        _ => return Err(parse_error(format!("Invalid operation: '{}'", record.op))),
    };

    Ok(operation)
}

/// Write account summaries to CSV format
///
/// Columns: account, number, type, status, owner, balance, entries.
/// Rows are sorted by account id; balances use two decimal places and
/// unnumbered accounts leave `number` empty.
pub fn write_accounts_csv(accounts: &[AccountSummary], output: &mut dyn Write) -> Result<(), BankError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["account", "number", "type", "status", "owner", "balance", "entries"])?;

    let mut sorted = accounts.to_vec();
    sorted.sort_by_key(|summary| summary.id);

    for summary in sorted {
        writer.write_record(&[
            summary.id.to_string(),
            summary.number.unwrap_or_default(),
            summary.kind.to_string(),
            summary.status.to_string(),
            summary.owner.to_string(),
            format!("{:.2}", summary.balance),
            summary.entries.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write ledgers to CSV format
///
/// Columns: account, seq, kind, direction, amount, balance_after,
/// description. Ledgers are sorted by account id; `seq` counts entries
/// from 1 within each account.
pub fn write_ledger_csv(
    ledgers: &[(AccountId, Vec<Transaction>)],
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([
        "account",
        "seq",
        "kind",
        "direction",
        "amount",
        "balance_after",
        "description",
    ])?;

    let mut sorted: Vec<_> = ledgers.iter().collect();
    sorted.sort_by_key(|(id, _)| *id);

    for (id, entries) in sorted {
        for (index, entry) in entries.iter().enumerate() {
            writer.write_record(&[
                id.to_string(),
                (index + 1).to_string(),
                entry.kind.to_string(),
                entry.direction.to_string(),
                format!("{:.2}", entry.amount),
                format!("{:.2}", entry.balance_after),
                entry.description.clone().unwrap_or_default(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
