//! Approval workflow
//!
//! ```text
//! PENDING --approve--> APPROVED --close--> CLOSED
//!    |
//!    +----reject-----> REJECTED
//! ```
//!
//! Approval checks the account's eligibility gate before a number is
//! generated, so an ineligible account stays pending and burns no number.

use crate::core::account_manager::AccountManager;
use crate::core::traits::AccountNumberGenerator;
use crate::types::{Account, AccountId, AccountStatus, AccountSummary, BankError, CustomerId};
use std::sync::Arc;

#[derive(Clone)]
pub struct ApprovalWorkflow {
    generator: Arc<dyn AccountNumberGenerator>,
}

impl std::fmt::Debug for ApprovalWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalWorkflow").finish_non_exhaustive()
    }
}

impl ApprovalWorkflow {
    pub fn new(generator: Arc<dyn AccountNumberGenerator>) -> Self {
        ApprovalWorkflow { generator }
    }

    /// Approve a pending account and return its new account number
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the account is pending
    /// - `IneligibleForApproval` if the account fails its kind's gate
    pub fn approve(&self, account: &mut Account, staff: &str) -> Result<String, BankError> {
        if account.status() != AccountStatus::Pending {
            return Err(BankError::invalid_state(account.id(), account.status(), "approve"));
        }
        account.eligibility()?;

        let number = self.generator.next_number(account.kind());
        account.approve(staff, number.clone())?;
        tracing::info!(account = %account.id(), %number, staff, "account approved");
        Ok(number)
    }

    /// Keep the generator clear of a number already held by a restored account
    pub fn reserve_number(&self, number: &str) {
        self.generator.observe(number);
    }

    pub fn reject(&self, account: &mut Account, staff: &str) -> Result<(), BankError> {
        account.reject(staff)?;
        tracing::info!(account = %account.id(), staff, "account rejected");
        Ok(())
    }

    pub fn close(&self, account: &mut Account, staff: &str) -> Result<(), BankError> {
        account.close(staff)?;
        tracing::info!(account = %account.id(), staff, "account closed");
        Ok(())
    }

    /// Accounts awaiting a decision, sorted by id
    pub fn pending(&self, accounts: &AccountManager) -> Vec<AccountSummary> {
        accounts.summaries_where(|account| account.status() == AccountStatus::Pending)
    }

    pub fn pending_for_customer(
        &self,
        accounts: &AccountManager,
        customer: CustomerId,
    ) -> Vec<AccountSummary> {
        accounts.summaries_where(|account| {
            account.status() == AccountStatus::Pending && account.owner() == customer
        })
    }

    pub fn approved(&self, accounts: &AccountManager) -> Vec<AccountSummary> {
        accounts.summaries_where(|account| account.status() == AccountStatus::Approved)
    }

    /// The account number, but only while the account is approved
    pub fn account_number_if_approved(
        &self,
        accounts: &AccountManager,
        id: AccountId,
    ) -> Result<Option<String>, BankError> {
        accounts.read(id, |account| match account.status() {
            AccountStatus::Approved => account.account_number().map(str::to_string),
            _ => None,
        })
    }
}
