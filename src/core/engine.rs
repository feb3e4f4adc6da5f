//! Bank engine
//!
//! This module provides the `BankEngine` that orchestrates the account
//! lifecycle by coordinating the account manager, customer directory,
//! account factory, approval workflow and storage collaborator.
//!
//! The engine enforces the ordering every mutation follows:
//! 1. Validate and apply the change in memory, under the account lock(s)
//! 2. Release the lock(s)
//! 3. Mirror the change to storage
//!
//! A storage failure in step 3 is returned next to the applied value in
//! [`Applied::persistence`]; the in-memory change stands.

use crate::config::BankConfig;
use crate::core::account_factory::AccountFactory;
use crate::core::account_manager::AccountManager;
use crate::core::approval::ApprovalWorkflow;
use crate::core::customer_directory::CustomerDirectory;
use crate::core::interest::{self, Accrual, SweepReport};
use crate::core::number_generator::SequentialNumberGenerator;
use crate::core::storage::InMemoryStorage;
use crate::core::traits::{AccountNumberGenerator, BankStorage};
use crate::core::transfer;
use crate::types::{
    Account, AccountId, AccountRecord, AccountSummary, BankError, Customer, CustomerId,
    OpenAccountRequest, Operation, Outcome, StorageError, Transaction,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// A mutation that was applied in memory, and how mirroring it went
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub persistence: Result<(), StorageError>,
}

impl<T> Applied<T> {
    pub fn is_persisted(&self) -> bool {
        self.persistence.is_ok()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Applied<U> {
        Applied {
            value: f(self.value),
            persistence: self.persistence,
        }
    }
}

/// Account lifecycle engine
///
/// All methods take `&self`; the engine can be shared across threads
/// behind an `Arc`.
pub struct BankEngine {
    config: BankConfig,
    accounts: Arc<AccountManager>,
    customers: CustomerDirectory,
    factory: AccountFactory,
    approval: ApprovalWorkflow,
    storage: Arc<dyn BankStorage>,
}

impl BankEngine {
    /// Engine with in-memory storage and sequential account numbers
    pub fn new(config: BankConfig) -> Self {
        let generator = Arc::new(SequentialNumberGenerator::new(config.branch_code.clone()));
        Self::with_collaborators(config, Arc::new(InMemoryStorage::new()), generator)
    }

    pub fn with_collaborators(
        config: BankConfig,
        storage: Arc<dyn BankStorage>,
        generator: Arc<dyn AccountNumberGenerator>,
    ) -> Self {
        BankEngine {
            factory: AccountFactory::new(config.clone()),
            approval: ApprovalWorkflow::new(generator),
            config,
            accounts: Arc::new(AccountManager::new()),
            customers: CustomerDirectory::new(),
            storage,
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn accounts(&self) -> &Arc<AccountManager> {
        &self.accounts
    }

    /// Run a storage write, logging a failure
    fn persist<F>(&self, operation: &str, write: F) -> Result<(), StorageError>
    where
        F: FnOnce(&dyn BankStorage) -> Result<(), StorageError>,
    {
        let result = write(self.storage.as_ref());
        if let Err(error) = &result {
            tracing::warn!(operation, %error, "storage write failed, in-memory state kept");
        }
        result
    }

    fn persist_change(
        &self,
        operation: &str,
        record: &AccountRecord,
        entry: Option<&Transaction>,
    ) -> Result<(), StorageError> {
        self.persist(operation, |storage| {
            storage.update_account(record)?;
            if let Some(entry) = entry {
                storage.record_transaction(record.id, entry)?;
            }
            Ok(())
        })
    }

    pub(crate) fn persist_accruals(&self, accruals: &[Accrual]) -> Result<(), StorageError> {
        let mut outcome = Ok(());
        for accrual in accruals {
            let result = self.persist_change("interest", &accrual.record, Some(&accrual.entry));
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    }

    // Customers

    pub fn register_customer(&self, customer: Customer) -> Result<Applied<CustomerId>, BankError> {
        let id = customer.id();
        self.customers.register(customer.clone())?;
        tracing::info!(customer = %id, name = customer.name(), "customer registered");
        let persistence = self.persist("register", |storage| storage.save_customer(&customer));
        Ok(Applied {
            value: id,
            persistence,
        })
    }

    pub fn customer(&self, id: CustomerId) -> Result<Customer, BankError> {
        self.customers.get(id)
    }

    /// Summaries of every loaded account owned by `customer`
    pub fn customer_accounts(&self, customer: CustomerId) -> Result<Vec<AccountSummary>, BankError> {
        let customer = self.customers.get(customer)?;
        customer
            .accounts()
            .iter()
            .map(|id| self.accounts.read(*id, Account::summary))
            .collect()
    }

    // Accounts

    /// Open a pending account for a registered customer
    pub fn open_account(
        &self,
        customer: CustomerId,
        request: OpenAccountRequest,
    ) -> Result<Applied<AccountId>, BankError> {
        let owner = self.customers.get(customer)?;
        let id = self
            .accounts
            .create(|id| self.factory.build(id, &owner, &request))
            .inspect_err(|error| {
                tracing::warn!(customer = %customer, kind = %request.kind, %error, "account not opened")
            })?;
        let owner = self.customers.add_account(customer, id)?;
        let (record, entries) = self
            .accounts
            .read(id, |account| (account.record(), account.ledger().all().to_vec()))?;
        tracing::info!(account = %id, customer = %customer, kind = %request.kind, "account opened");

        let persistence = self.persist("open", |storage| {
            storage.save_account(&record)?;
            for entry in &entries {
                storage.record_transaction(id, entry)?;
            }
            storage.save_customer(&owner)
        });
        Ok(Applied {
            value: id,
            persistence,
        })
    }

    /// Copy of an account as it is right now
    pub fn account(&self, id: AccountId) -> Result<Account, BankError> {
        self.accounts.read(id, Account::clone)
    }

    pub fn summary(&self, id: AccountId) -> Result<AccountSummary, BankError> {
        self.accounts.read(id, Account::summary)
    }

    /// Summaries of every account, sorted by id
    pub fn summaries(&self) -> Vec<AccountSummary> {
        self.accounts.summaries_where(|_| true)
    }

    /// Ledger entries of an account, oldest first
    pub fn transactions(&self, id: AccountId) -> Result<Vec<Transaction>, BankError> {
        self.accounts.read(id, |account| account.ledger().all().to_vec())
    }

    /// Make an account stored under `number` available to the engine
    ///
    /// Returns the id of an already loaded account without touching
    /// storage.
    pub fn load_account_by_number(&self, number: &str) -> Result<AccountId, BankError> {
        if let Some(id) = self.accounts.find_by_number(number) {
            return Ok(id);
        }
        let record = self
            .storage
            .find_account_by_number(number)?
            .ok_or_else(|| BankError::AccountNumberNotFound {
                number: number.to_string(),
            })?;
        let id = record.id;
        let owner = record.owner;
        let entries = self.storage.find_transactions(id)?;
        let account = Account::restore(record, entries)?;
        if let Some(number) = account.account_number() {
            self.approval.reserve_number(number);
        }

        if !self.customers.contains(owner) {
            if let Some(customer) = self.storage.find_customer_by_id(owner)? {
                // A concurrent load may have registered it first
                let _ = self.customers.register(customer);
            }
        }
        if self.accounts.insert(account) {
            tracing::info!(account = %id, number, "account loaded from storage");
        }
        if self.customers.contains(owner) {
            self.customers.add_account(owner, id)?;
        }
        Ok(id)
    }

    // Lifecycle

    pub fn approve(&self, id: AccountId, staff: &str) -> Result<Applied<String>, BankError> {
        let (number, record) = self.accounts.update(id, |account| {
            let number = self.approval.approve(account, staff)?;
            Ok((number, account.record()))
        })?;
        let persistence = self.persist_change("approve", &record, None);
        Ok(Applied {
            value: number,
            persistence,
        })
    }

    pub fn reject(&self, id: AccountId, staff: &str) -> Result<Applied<()>, BankError> {
        let record = self.accounts.update(id, |account| {
            self.approval.reject(account, staff)?;
            Ok(account.record())
        })?;
        let persistence = self.persist_change("reject", &record, None);
        Ok(Applied {
            value: (),
            persistence,
        })
    }

    pub fn close(&self, id: AccountId, staff: &str) -> Result<Applied<()>, BankError> {
        let record = self.accounts.update(id, |account| {
            self.approval.close(account, staff)?;
            Ok(account.record())
        })?;
        let persistence = self.persist_change("close", &record, None);
        Ok(Applied {
            value: (),
            persistence,
        })
    }

    pub fn pending_accounts(&self) -> Vec<AccountSummary> {
        self.approval.pending(&self.accounts)
    }

    pub fn pending_for_customer(&self, customer: CustomerId) -> Vec<AccountSummary> {
        self.approval.pending_for_customer(&self.accounts, customer)
    }

    pub fn approved_accounts(&self) -> Vec<AccountSummary> {
        self.approval.approved(&self.accounts)
    }

    pub fn account_number_if_approved(&self, id: AccountId) -> Result<Option<String>, BankError> {
        self.approval.account_number_if_approved(&self.accounts, id)
    }

    pub fn has_approval_notice(&self, id: AccountId) -> Result<bool, BankError> {
        self.accounts.read(id, Account::has_approval_notice)
    }

    /// Consume the approval notice; `true` exactly once per approval
    pub fn take_approval_notice(&self, id: AccountId) -> Result<bool, BankError> {
        self.accounts
            .update(id, |account| Ok(account.take_approval_notice()))
    }

    // Money movement

    /// Deposit and return the new balance
    pub fn deposit(&self, id: AccountId, amount: Decimal) -> Result<Applied<Decimal>, BankError> {
        self.move_money(id, "deposit", |account| account.deposit(amount))
    }

    /// Withdraw and return the new balance
    pub fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Applied<Decimal>, BankError> {
        self.move_money(id, "withdraw", |account| account.withdraw(amount))
    }

    fn move_money<F>(&self, id: AccountId, operation: &str, f: F) -> Result<Applied<Decimal>, BankError>
    where
        F: FnOnce(&mut Account) -> Result<Decimal, BankError>,
    {
        let (balance, record, entry) = self
            .accounts
            .update(id, |account| {
                let balance = f(account)?;
                Ok((balance, account.record(), account.ledger().last().cloned()))
            })
            .inspect_err(|error| tracing::warn!(account = %id, operation, %error, "refused"))?;
        let persistence = self.persist_change(operation, &record, entry.as_ref());
        Ok(Applied {
            value: balance,
            persistence,
        })
    }

    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<Applied<()>, BankError> {
        let receipt = transfer::transfer_between(&self.accounts, from, to, amount)
            .inspect_err(|error| tracing::warn!(%from, %to, %amount, %error, "transfer refused"))?;
        tracing::info!(%from, %to, %amount, "transfer completed");
        let persistence = self.persist("transfer", |storage| {
            storage.update_account(&receipt.destination)?;
            storage.record_transaction(to, &receipt.credit)?;
            storage.update_account(&receipt.source)?;
            storage.record_transaction(from, &receipt.debit)
        });
        Ok(Applied {
            value: (),
            persistence,
        })
    }

    // Interest

    /// Interest an account would earn this month
    pub fn calculate_interest(&self, id: AccountId) -> Result<Decimal, BankError> {
        self.accounts.read(id, Account::calculate_interest)
    }

    /// Apply monthly interest to every account, one at a time
    pub fn apply_interest_to_all(&self) -> Applied<SweepReport> {
        let (report, accruals) = interest::apply_interest_to_all(&self.accounts);
        tracing::info!(visited = report.visited, total = %report.total, "interest sweep finished");
        let persistence = self.persist_accruals(&accruals);
        Applied {
            value: report,
            persistence,
        }
    }

    /// Dispatch a single operation
    pub fn process(&self, operation: Operation) -> Result<Applied<Outcome>, BankError> {
        match operation {
            Operation::RegisterIndividual {
                customer,
                name,
                national_id,
                employment,
            } => {
                let mut individual = Customer::individual(customer, name, national_id);
                if let Some(info) = employment {
                    individual = individual.with_employment(info);
                }
                Ok(self.register_customer(individual)?.map(Outcome::Registered))
            }
            Operation::RegisterCompany {
                customer,
                name,
                registration_number,
            } => Ok(self
                .register_customer(Customer::company(customer, name, registration_number))?
                .map(Outcome::Registered)),
            Operation::Open { customer, request } => {
                Ok(self.open_account(customer, request)?.map(Outcome::Opened))
            }
            Operation::Approve { account, staff } => {
                Ok(self.approve(account, &staff)?.map(Outcome::Approved))
            }
            Operation::Reject { account, staff } => {
                Ok(self.reject(account, &staff)?.map(|_| Outcome::Rejected))
            }
            Operation::Close { account, staff } => {
                Ok(self.close(account, &staff)?.map(|_| Outcome::Closed))
            }
            Operation::Deposit { account, amount } => {
                Ok(self.deposit(account, amount)?.map(Outcome::Balance))
            }
            Operation::Withdraw { account, amount } => {
                Ok(self.withdraw(account, amount)?.map(Outcome::Balance))
            }
            Operation::Transfer { from, to, amount } => {
                Ok(self.transfer(from, to, amount)?.map(|_| Outcome::Transferred))
            }
            Operation::Interest => Ok(self.apply_interest_to_all().map(|report| report.outcome())),
        }
    }
}

impl Default for BankEngine {
    fn default() -> Self {
        Self::new(BankConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SavingsFeePolicy;
    use crate::types::{AccountKind, AccountStatus, EmploymentInfo, TransactionKind};
    use rstest::{fixture, rstest};
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    struct Harness {
        engine: BankEngine,
        storage: Arc<InMemoryStorage>,
    }

    #[fixture]
    fn harness() -> Harness {
        let mut config = BankConfig::default();
        config.savings.monthly_rate = dec("0.0005");
        config.investment.monthly_rate = dec("0.05");
        config.investment.minimum_balance = dec("500");
        let storage = Arc::new(InMemoryStorage::new());
        let engine = BankEngine::with_collaborators(
            config,
            storage.clone(),
            Arc::new(SequentialNumberGenerator::new("001")),
        );
        engine
            .register_customer(
                Customer::individual(CustomerId(1), "Neo Kgosi", "NID-1").with_employment(
                    EmploymentInfo::new("Orapa Mine", "Box 10, Orapa", "permanent"),
                ),
            )
            .unwrap();
        engine
            .register_customer(Customer::individual(CustomerId(2), "Mpho Sithole", "NID-2"))
            .unwrap();
        Harness { engine, storage }
    }

    fn open(engine: &BankEngine, customer: u32, kind: AccountKind, deposit: &str) -> AccountId {
        engine
            .open_account(CustomerId(customer), OpenAccountRequest::new(kind, dec(deposit)))
            .unwrap()
            .into_value()
    }

    #[rstest]
    fn test_open_and_approve_savings(harness: Harness) {
        let engine = &harness.engine;
        let id = open(engine, 1, AccountKind::Savings, "1000");
        assert_eq!(engine.summary(id).unwrap().balance, dec("950"));
        assert_eq!(engine.account_number_if_approved(id).unwrap(), None);
        assert_eq!(engine.pending_for_customer(CustomerId(1)).len(), 1);

        let approved = engine.approve(id, "staff-7").unwrap();
        assert!(approved.is_persisted());
        assert_eq!(approved.value, "001-SAV-10001");
        assert_eq!(engine.account_number_if_approved(id).unwrap(), Some(approved.value));
        assert!(engine.pending_accounts().is_empty());

        assert!(engine.has_approval_notice(id).unwrap());
        assert!(engine.take_approval_notice(id).unwrap());
        assert!(!engine.take_approval_notice(id).unwrap());

        let stored = harness.storage.find_account_by_number("001-SAV-10001").unwrap();
        assert_eq!(stored.map(|r| r.status), Some(AccountStatus::Approved));
    }

    #[rstest]
    fn test_savings_interest_scenario(harness: Harness) {
        let engine = &harness.engine;
        let id = open(engine, 1, AccountKind::Savings, "1000");
        engine.approve(id, "staff").unwrap();
        assert_eq!(engine.calculate_interest(id).unwrap(), dec("0.48"));

        let sweep = engine.apply_interest_to_all();
        assert_eq!(sweep.value.total, dec("0.48"));
        assert_eq!(engine.summary(id).unwrap().balance, dec("950.48"));
        let stored = harness.storage.find_transactions(id).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].description.as_deref(), Some("opening deposit"));
        assert_eq!(stored[1].kind, TransactionKind::Interest);
    }

    #[rstest]
    fn test_savings_interest_without_fee() {
        let mut config = BankConfig::default();
        config.savings.monthly_rate = dec("0.0005");
        config.savings.opening_fee = Decimal::ZERO;
        config.savings.fee_policy = SavingsFeePolicy::DeductFromFirstDeposit;
        let engine = BankEngine::new(config);
        engine
            .register_customer(Customer::individual(CustomerId(1), "Neo", "NID-1"))
            .unwrap();
        let id = open(&engine, 1, AccountKind::Savings, "1000");
        engine.approve(id, "staff").unwrap();
        assert_eq!(engine.calculate_interest(id).unwrap(), dec("0.5"));
    }

    #[rstest]
    fn test_investment_below_minimum_stays_pending(harness: Harness) {
        let engine = &harness.engine;
        let id = open(engine, 1, AccountKind::Investment, "499.99");
        let error = engine.approve(id, "staff").unwrap_err();
        assert_eq!(error.code(), "ineligible_for_approval");
        assert_eq!(engine.summary(id).unwrap().status, AccountStatus::Pending);

        engine.deposit(id, dec("0.01")).unwrap();
        assert_eq!(engine.approve(id, "staff").unwrap().value, "001-INV-10001");
    }

    #[rstest]
    fn test_cheque_requires_employment(harness: Harness) {
        let engine = &harness.engine;
        let error = engine
            .open_account(CustomerId(2), OpenAccountRequest::new(AccountKind::Cheque, dec("10")))
            .unwrap_err();
        assert_eq!(error.code(), "account_creation_refused");
        assert!(engine.customer(CustomerId(2)).unwrap().accounts().is_empty());
        assert_eq!(open(engine, 1, AccountKind::Cheque, "10"), AccountId(1));
    }

    #[rstest]
    fn test_unknown_customer_and_account(harness: Harness) {
        let engine = &harness.engine;
        let error = engine
            .open_account(CustomerId(99), OpenAccountRequest::new(AccountKind::Savings, dec("100")))
            .unwrap_err();
        assert_eq!(error.code(), "customer_not_found");
        assert_eq!(
            engine.deposit(AccountId(42), dec("1")).unwrap_err().code(),
            "account_not_found"
        );
    }

    #[rstest]
    fn test_transfer_and_ledgers(harness: Harness) {
        let engine = &harness.engine;
        let cheque = engine
            .open_account(
                CustomerId(1),
                OpenAccountRequest::new(AccountKind::Cheque, dec("100")).with_overdraft(true),
            )
            .unwrap()
            .into_value();
        let investment = open(engine, 1, AccountKind::Investment, "1000");
        engine.approve(cheque, "staff").unwrap();
        engine.approve(investment, "staff").unwrap();

        engine.transfer(cheque, investment, dec("150")).unwrap();
        assert_eq!(engine.summary(cheque).unwrap().balance, dec("-50"));
        assert_eq!(engine.summary(investment).unwrap().balance, dec("1150"));

        let debit = engine.transactions(cheque).unwrap();
        let credit = engine.transactions(investment).unwrap();
        assert_eq!(debit.len(), 2);
        assert_eq!(credit.len(), 2);
        assert_eq!(debit[1].kind, TransactionKind::Transfer);
        assert_eq!(debit[1].description.as_deref(), Some("Transfer to 001-INV-10002"));
        assert_eq!(credit[1].description.as_deref(), Some("Transfer from 001-CHQ-10001"));
    }

    #[rstest]
    fn test_persistence_failure_keeps_memory(harness: Harness) {
        let engine = &harness.engine;
        let id = open(engine, 1, AccountKind::Investment, "1000");
        harness.storage.set_fail_writes(true);

        let applied = engine.deposit(id, dec("5")).unwrap();
        assert_eq!(applied.value, dec("1005"));
        assert!(matches!(applied.persistence, Err(StorageError::Unavailable { .. })));
        assert_eq!(engine.summary(id).unwrap().balance, dec("1005"));
    }

    #[rstest]
    fn test_load_account_by_number(harness: Harness) {
        let id = open(&harness.engine, 1, AccountKind::Investment, "1000");
        harness.engine.approve(id, "staff").unwrap();
        harness.engine.deposit(id, dec("25")).unwrap();
        harness.engine.withdraw(id, dec("5")).unwrap();

        let fresh = BankEngine::with_collaborators(
            harness.engine.config().clone(),
            harness.storage.clone(),
            Arc::new(SequentialNumberGenerator::new("001")),
        );
        let loaded = fresh.load_account_by_number("001-INV-10001").unwrap();
        assert_eq!(loaded, id);
        assert_eq!(fresh.summary(loaded).unwrap().balance, dec("1020"));
        assert_eq!(fresh.transactions(loaded).unwrap().len(), 3);
        assert_eq!(fresh.customer(CustomerId(1)).unwrap().accounts(), &[id]);
        assert_eq!(fresh.load_account_by_number("001-INV-10001").unwrap(), id);

        let error = fresh.load_account_by_number("001-INV-99999").unwrap_err();
        assert_eq!(error.code(), "account_number_not_found");
    }

    #[rstest]
    fn test_opening_deposit_is_first_ledger_entry(harness: Harness) {
        let engine = &harness.engine;
        let id = open(engine, 1, AccountKind::Investment, "1000");
        engine.deposit(id, dec("5")).unwrap();

        let entries = engine.transactions(id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, TransactionKind::Deposit);
        assert_eq!(entries[0].balance_after, dec("1000"));
        let sum: Decimal = entries.iter().map(Transaction::signed_amount).sum();
        assert_eq!(sum, engine.summary(id).unwrap().balance);
        assert_eq!(harness.storage.find_transactions(id).unwrap(), entries);
    }

    #[rstest]
    fn test_approval_after_reload_issues_fresh_number(harness: Harness) {
        let first = open(&harness.engine, 1, AccountKind::Investment, "1000");
        let first_number = harness.engine.approve(first, "staff").unwrap().into_value();

        let fresh = BankEngine::with_collaborators(
            harness.engine.config().clone(),
            harness.storage.clone(),
            Arc::new(SequentialNumberGenerator::new("001")),
        );
        fresh.load_account_by_number(&first_number).unwrap();
        let second = open(&fresh, 1, AccountKind::Investment, "1000");
        let second_number = fresh.approve(second, "staff").unwrap().into_value();

        assert_ne!(second, first);
        assert_eq!(second_number, "001-INV-10002");
        let stored = harness.storage.find_account_by_number(&first_number).unwrap();
        assert_eq!(stored.map(|record| record.id), Some(first));
    }

    #[rstest]
    fn test_process_dispatches_operations(harness: Harness) {
        let engine = &harness.engine;
        let opened = engine
            .process(Operation::Open {
                customer: CustomerId(2),
                request: OpenAccountRequest::new(AccountKind::Investment, dec("2000")),
            })
            .unwrap();
        assert_eq!(opened.value, Outcome::Opened(AccountId(1)));

        let outcome = engine
            .process(Operation::Approve {
                account: AccountId(1),
                staff: "staff".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.value, Outcome::Approved("001-INV-10001".to_string()));

        let interest = engine.process(Operation::Interest).unwrap();
        assert_eq!(
            interest.value,
            Outcome::InterestApplied {
                accounts: 1,
                total: dec("100")
            }
        );

        let closed = engine
            .process(Operation::Close {
                account: AccountId(1),
                staff: "staff".to_string(),
            })
            .unwrap();
        assert_eq!(closed.value, Outcome::Closed);
        let error = engine
            .process(Operation::Deposit {
                account: AccountId(1),
                amount: dec("1"),
            })
            .unwrap_err();
        assert_eq!(error.code(), "invalid_state");
    }
}
