//! Bank operations and their outcomes
//!
//! [`Operation`] is the unit of work the engine processes, whether it comes
//! from a command file or from calling code directly.

use super::account::{AccountId, OpenAccountRequest};
use super::customer::{CustomerId, EmploymentInfo};
use rust_decimal::Decimal;

/// A single request to the bank
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    RegisterIndividual {
        customer: CustomerId,
        name: String,
        national_id: String,
        employment: Option<EmploymentInfo>,
    },
    RegisterCompany {
        customer: CustomerId,
        name: String,
        registration_number: String,
    },
    Open {
        customer: CustomerId,
        request: OpenAccountRequest,
    },
    Approve {
        account: AccountId,
        staff: String,
    },
    Reject {
        account: AccountId,
        staff: String,
    },
    Close {
        account: AccountId,
        staff: String,
    },
    Deposit {
        account: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account: AccountId,
        amount: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
    /// Monthly interest sweep over every account
    Interest,
}

impl Operation {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RegisterIndividual { .. } => "individual",
            Operation::RegisterCompany { .. } => "company",
            Operation::Open { .. } => "open",
            Operation::Approve { .. } => "approve",
            Operation::Reject { .. } => "reject",
            Operation::Close { .. } => "close",
            Operation::Deposit { .. } => "deposit",
            Operation::Withdraw { .. } => "withdraw",
            Operation::Transfer { .. } => "transfer",
            Operation::Interest => "interest",
        }
    }
}

/// What a successfully processed operation produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Registered(CustomerId),
    Opened(AccountId),
    /// The account number assigned at approval
    Approved(String),
    Rejected,
    Closed,
    /// Balance after a deposit or withdrawal
    Balance(Decimal),
    Transferred,
    InterestApplied {
        accounts: usize,
        total: Decimal,
    },
}
