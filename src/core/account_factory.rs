//! Account construction
//!
//! Turns an [`OpenAccountRequest`] into a pending [`Account`] of the right
//! kind, applying the per-kind opening rules:
//!
//! | Kind       | Opening deposit entry                    | Gate at creation                     |
//! |------------|------------------------------------------|--------------------------------------|
//! | Savings    | deposit less the opening fee (see below) | deposit covers the fee (deduct mode) |
//! | Investment | deposit                                  | none (minimum checked at approval)   |
//! | Cheque     | deposit                                  | individuals need verified employment |
//!
//! Accounts start at zero, or at minus the fee when the savings fee is
//! charged at opening, and a non-zero opening deposit is the first ledger
//! entry.

use crate::config::{BankConfig, SavingsFeePolicy};
use crate::types::{
    Account, AccountId, AccountKind, AccountVariant, BankError, Customer, CustomerKind,
    OpenAccountRequest,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct AccountFactory {
    config: BankConfig,
}

impl AccountFactory {
    pub fn new(config: BankConfig) -> Self {
        AccountFactory { config }
    }

    /// Build a pending account with id `id` for `customer`
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the initial deposit is negative
    /// - `AccountCreationRefused` if the savings deposit does not cover the
    ///   opening fee, or an individual opening a cheque account has no
    ///   verified employer on file
    pub fn build(
        &self,
        id: AccountId,
        customer: &Customer,
        request: &OpenAccountRequest,
    ) -> Result<Account, BankError> {
        let deposit = request.initial_deposit;
        if deposit < Decimal::ZERO {
            return Err(BankError::invalid_amount(deposit, "open"));
        }
        let branch = request
            .branch
            .clone()
            .unwrap_or_else(|| self.config.branch_code.clone());

        match request.kind {
            AccountKind::Savings => self.build_savings(id, customer, branch, deposit),
            AccountKind::Investment => {
                let variant = AccountVariant::Investment {
                    monthly_rate: self.config.investment.monthly_rate,
                    minimum_balance: self.config.investment.minimum_balance,
                };
                opened(id, customer, branch, variant, Decimal::ZERO, deposit)
            }
            AccountKind::Cheque => {
                let employment = customer.employment().cloned();
                if let CustomerKind::Individual { .. } = customer.kind() {
                    if !employment.as_ref().is_some_and(|info| info.is_verified()) {
                        return Err(BankError::creation_refused(
                            customer.id(),
                            "cheque accounts require verified employment details",
                        ));
                    }
                }
                let variant = AccountVariant::Cheque {
                    overdraft_allowed: request
                        .overdraft
                        .unwrap_or(self.config.cheque.overdraft_by_default),
                    employment,
                };
                opened(id, customer, branch, variant, Decimal::ZERO, deposit)
            }
        }
    }

    fn build_savings(
        &self,
        id: AccountId,
        customer: &Customer,
        branch: String,
        deposit: Decimal,
    ) -> Result<Account, BankError> {
        let savings = &self.config.savings;
        let variant = AccountVariant::Savings {
            monthly_rate: savings.monthly_rate,
        };
        match savings.fee_policy {
            SavingsFeePolicy::DeductFromFirstDeposit => {
                if deposit < savings.opening_fee {
                    return Err(BankError::creation_refused(
                        customer.id(),
                        format!(
                            "initial deposit {:.2} does not cover the opening fee of {:.2}",
                            deposit, savings.opening_fee
                        ),
                    ));
                }
                let net = deposit - savings.opening_fee;
                opened(id, customer, branch, variant, Decimal::ZERO, net)
            }
            SavingsFeePolicy::ChargeAtOpening => {
                opened(id, customer, branch, variant, -savings.opening_fee, deposit)
            }
        }
    }
}

fn opened(
    id: AccountId,
    customer: &Customer,
    branch: String,
    variant: AccountVariant,
    start: Decimal,
    deposit: Decimal,
) -> Result<Account, BankError> {
    let mut account = Account::open(id, customer.id(), branch, variant, start);
    if deposit > Decimal::ZERO {
        account.record_opening_deposit(deposit)?;
    }
    Ok(account)
}
