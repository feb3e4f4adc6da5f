//! Account-related types for the bank engine
//!
//! An [`Account`] is one customer-owned account of one of three kinds. The
//! behaviour that differs per kind (interest, withdrawal rules, approval
//! eligibility) is driven by the [`AccountVariant`] it carries; everything
//! else (status machine, balance, ledger, approval notice) is shared.
//!
//! Every balance change goes through [`Account::post`], which appends the
//! matching ledger entry in the same step, so the ledger replays to the
//! current balance at all times.

use super::customer::{CustomerId, EmploymentInfo};
use super::error::{BankError, DenialReason};
use super::ledger::Ledger;
use super::transaction::{Direction, Transaction, TransactionKind};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places money is kept to
pub const CURRENCY_SCALE: u32 = 2;

/// Internal account identifier, assigned by the bank at creation
///
/// Ids are handed out in increasing order and double as the global lock
/// order for operations that touch two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an account
///
/// `Pending` is initial. `Rejected` and `Closed` are terminal; `Closed` can
/// only be reached from `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl AccountStatus {
    /// Statuses in which the account carries a public account number
    pub fn is_numbered(self) -> bool {
        matches!(self, AccountStatus::Approved | AccountStatus::Closed)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Approved => "APPROVED",
            AccountStatus::Rejected => "REJECTED",
            AccountStatus::Closed => "CLOSED",
        };
        f.write_str(label)
    }
}

/// The three account products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Investment,
    Cheque,
}

impl AccountKind {
    /// Prefix used inside generated account numbers
    pub fn prefix(self) -> &'static str {
        match self {
            AccountKind::Savings => "SAV",
            AccountKind::Investment => "INV",
            AccountKind::Cheque => "CHQ",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountKind::Savings => "savings",
            AccountKind::Investment => "investment",
            AccountKind::Cheque => "cheque",
        };
        f.write_str(label)
    }
}

impl FromStr for AccountKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savings" | "sav" => Ok(AccountKind::Savings),
            "investment" | "inv" => Ok(AccountKind::Investment),
            "cheque" | "chq" => Ok(AccountKind::Cheque),
            other => Err(BankError::ParseError {
                line: None,
                message: format!("unknown account type '{}'", other),
            }),
        }
    }
}

/// How an account answers a request to take money out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalPolicy {
    /// No withdrawals of any amount
    NotPermitted,
    /// Withdrawals up to the current balance
    WithinBalance,
    /// Any positive amount; the balance may go negative
    Overdraft,
}

/// Per-kind data and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountVariant {
    Savings {
        monthly_rate: Decimal,
    },
    Investment {
        monthly_rate: Decimal,
        minimum_balance: Decimal,
    },
    Cheque {
        overdraft_allowed: bool,
        employment: Option<EmploymentInfo>,
    },
}

impl AccountVariant {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountVariant::Savings { .. } => AccountKind::Savings,
            AccountVariant::Investment { .. } => AccountKind::Investment,
            AccountVariant::Cheque { .. } => AccountKind::Cheque,
        }
    }

    pub fn withdrawal_policy(&self) -> WithdrawalPolicy {
        match self {
            AccountVariant::Savings { .. } => WithdrawalPolicy::NotPermitted,
            AccountVariant::Investment { .. } => WithdrawalPolicy::WithinBalance,
            AccountVariant::Cheque {
                overdraft_allowed: true,
                ..
            } => WithdrawalPolicy::Overdraft,
            AccountVariant::Cheque { .. } => WithdrawalPolicy::WithinBalance,
        }
    }
}

/// Who made a staff decision on an account, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffDecision {
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl StaffDecision {
    pub fn now(actor: &str) -> Self {
        StaffDecision {
            actor: actor.to_string(),
            at: Utc::now(),
        }
    }
}

/// A customer's request to open an account
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAccountRequest {
    pub kind: AccountKind,
    pub initial_deposit: Decimal,
    /// Branch the account is opened at; the configured branch when absent
    pub branch: Option<String>,
    /// Cheque accounts only; the configured default when absent
    pub overdraft: Option<bool>,
}

impl OpenAccountRequest {
    pub fn new(kind: AccountKind, initial_deposit: Decimal) -> Self {
        OpenAccountRequest {
            kind,
            initial_deposit,
            branch: None,
            overdraft: None,
        }
    }

    pub fn with_overdraft(mut self, overdraft: bool) -> Self {
        self.overdraft = Some(overdraft);
        self
    }

    pub fn at_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Read-only view of an account, used for listings and reports
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub number: Option<String>,
    pub kind: AccountKind,
    pub status: AccountStatus,
    pub owner: CustomerId,
    pub balance: Decimal,
    pub entries: usize,
}

/// Everything storage needs to rebuild an account, minus its ledger entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub account_number: Option<String>,
    pub status: AccountStatus,
    pub balance: Decimal,
    pub opening_balance: Decimal,
    pub owner: CustomerId,
    pub branch: String,
    pub date_opened: NaiveDate,
    pub decision: Option<StaffDecision>,
    pub closed: Option<StaffDecision>,
    pub variant: AccountVariant,
}

/// A customer-owned bank account
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    account_number: Option<String>,
    status: AccountStatus,
    balance: Decimal,
    owner: CustomerId,
    branch: String,
    date_opened: NaiveDate,
    decision: Option<StaffDecision>,
    closed: Option<StaffDecision>,
    variant: AccountVariant,
    ledger: Ledger,
    approval_notice: bool,
}

impl Account {
    /// Create a pending account starting at `opening_balance`
    ///
    /// The opening balance is the ledger's starting point, normally zero.
    /// Money paid in at opening goes through
    /// [`record_opening_deposit`](Self::record_opening_deposit) so it shows
    /// up as an entry.
    pub fn open(
        id: AccountId,
        owner: CustomerId,
        branch: impl Into<String>,
        variant: AccountVariant,
        opening_balance: Decimal,
    ) -> Self {
        Account {
            id,
            account_number: None,
            status: AccountStatus::Pending,
            balance: opening_balance,
            owner,
            branch: branch.into(),
            date_opened: Utc::now().date_naive(),
            decision: None,
            closed: None,
            variant,
            ledger: Ledger::new(opening_balance),
            approval_notice: false,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Public account number; `None` until the account is approved
    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn owner(&self) -> CustomerId {
        self.owner
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn date_opened(&self) -> NaiveDate {
        self.date_opened
    }

    /// Approval or rejection stamp
    pub fn decision(&self) -> Option<&StaffDecision> {
        self.decision.as_ref()
    }

    pub fn closed(&self) -> Option<&StaffDecision> {
        self.closed.as_ref()
    }

    pub fn variant(&self) -> &AccountVariant {
        &self.variant
    }

    pub fn kind(&self) -> AccountKind {
        self.variant.kind()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Account number if assigned, otherwise `PENDING-<id>`
    pub fn reference(&self) -> String {
        match &self.account_number {
            Some(number) => number.clone(),
            None => format!("PENDING-{}", self.id),
        }
    }

    /// Pay money into the account
    ///
    /// Permitted in every status except `Closed`; pending and rejected
    /// accounts accept deposits.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InvalidState` if the account is closed
    /// - `ArithmeticOverflow` if the balance would overflow
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        let new_balance = self.check_credit(amount, "deposit")?;
        self.post(
            TransactionKind::Deposit,
            Direction::Credit,
            amount,
            new_balance,
            None,
        );
        Ok(new_balance)
    }

    /// Post the money the account was opened with as a DEPOSIT entry
    pub(crate) fn record_opening_deposit(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        let new_balance = self.check_credit(amount, "open")?;
        self.post(
            TransactionKind::Deposit,
            Direction::Credit,
            amount,
            new_balance,
            Some("opening deposit".to_string()),
        );
        Ok(new_balance)
    }

    /// Take money out of the account, subject to its withdrawal policy
    ///
    /// A cheque account with overdraft marks withdrawals that leave the
    /// balance negative with the description `overdraft`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InvalidState` if the account is closed
    /// - `WithdrawalDenied` if the policy refuses the amount
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        let new_balance = self.check_debit(amount, "withdraw")?;
        let description = (new_balance < Decimal::ZERO).then(|| "overdraft".to_string());
        self.post(
            TransactionKind::Withdraw,
            Direction::Debit,
            amount,
            new_balance,
            description,
        );
        Ok(new_balance)
    }

    /// Validate a credit of `amount` and return the balance it would produce
    pub(crate) fn check_credit(&self, amount: Decimal, operation: &str) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, operation));
        }
        if self.status == AccountStatus::Closed {
            return Err(BankError::invalid_state(self.id, self.status, operation));
        }
        self.balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow(operation, self.id))
    }

    /// Validate a debit of `amount` and return the balance it would produce
    pub(crate) fn check_debit(&self, amount: Decimal, operation: &str) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, operation));
        }
        if self.status == AccountStatus::Closed {
            return Err(BankError::invalid_state(self.id, self.status, operation));
        }
        match self.variant.withdrawal_policy() {
            WithdrawalPolicy::NotPermitted => Err(BankError::withdrawal_denied(
                self.id,
                amount,
                DenialReason::NotPermitted,
            )),
            WithdrawalPolicy::WithinBalance if amount > self.balance => Err(
                BankError::withdrawal_denied(self.id, amount, DenialReason::InsufficientFunds),
            ),
            WithdrawalPolicy::WithinBalance | WithdrawalPolicy::Overdraft => self
                .balance
                .checked_sub(amount)
                .ok_or_else(|| BankError::arithmetic_overflow(operation, self.id)),
        }
    }

    /// Set the balance and append the matching ledger entry
    ///
    /// Callers validate with [`check_credit`](Self::check_credit) or
    /// [`check_debit`](Self::check_debit) first.
    pub(crate) fn post(
        &mut self,
        kind: TransactionKind,
        direction: Direction,
        amount: Decimal,
        new_balance: Decimal,
        description: Option<String>,
    ) {
        self.balance = new_balance;
        self.ledger
            .record(kind, direction, amount, new_balance, description);
    }

    /// Interest this account would earn this month, without applying it
    ///
    /// Savings earn only while approved and in credit, investments while
    /// approved, cheque accounts never. Rounded to [`CURRENCY_SCALE`].
    pub fn calculate_interest(&self) -> Decimal {
        let rate = match &self.variant {
            AccountVariant::Savings { monthly_rate } if self.balance > Decimal::ZERO => {
                *monthly_rate
            }
            AccountVariant::Investment { monthly_rate, .. } => *monthly_rate,
            _ => return Decimal::ZERO,
        };
        if self.status != AccountStatus::Approved {
            return Decimal::ZERO;
        }
        // An overflowing product accrues nothing
        self.balance
            .checked_mul(rate)
            .map(|interest| {
                interest.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
            })
            .unwrap_or(Decimal::ZERO)
    }

    /// Credit this month's interest, if any, and return the amount applied
    pub fn apply_monthly_interest(&mut self) -> Result<Decimal, BankError> {
        let interest = self.calculate_interest();
        if interest <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let new_balance = self.check_credit(interest, "interest")?;
        self.post(
            TransactionKind::Interest,
            Direction::Credit,
            interest,
            new_balance,
            Some("monthly interest".to_string()),
        );
        Ok(interest)
    }

    /// Approval gate for this account's kind
    ///
    /// Investments must hold at least their minimum balance; savings and
    /// cheque accounts are always eligible once created.
    pub fn eligibility(&self) -> Result<(), BankError> {
        match &self.variant {
            AccountVariant::Investment {
                minimum_balance, ..
            } if self.balance < *minimum_balance => Err(BankError::ineligible(
                self.id,
                format!(
                    "balance {:.2} is below the minimum of {:.2}",
                    self.balance, minimum_balance
                ),
            )),
            _ => Ok(()),
        }
    }

    fn require(&self, expected: AccountStatus, operation: &str) -> Result<(), BankError> {
        if self.status != expected {
            return Err(BankError::invalid_state(self.id, self.status, operation));
        }
        Ok(())
    }

    /// Move a pending account to approved under `number`
    ///
    /// Raises the approval notice for the owner.
    pub fn approve(&mut self, staff: &str, number: String) -> Result<(), BankError> {
        self.require(AccountStatus::Pending, "approve")?;
        self.account_number = Some(number);
        self.status = AccountStatus::Approved;
        self.decision = Some(StaffDecision::now(staff));
        self.approval_notice = true;
        Ok(())
    }

    pub fn reject(&mut self, staff: &str) -> Result<(), BankError> {
        self.require(AccountStatus::Pending, "reject")?;
        self.status = AccountStatus::Rejected;
        self.decision = Some(StaffDecision::now(staff));
        Ok(())
    }

    /// Close an approved account; it keeps its number and ledger
    pub fn close(&mut self, staff: &str) -> Result<(), BankError> {
        self.require(AccountStatus::Approved, "close")?;
        self.status = AccountStatus::Closed;
        self.closed = Some(StaffDecision::now(staff));
        Ok(())
    }

    pub fn has_approval_notice(&self) -> bool {
        self.approval_notice
    }

    /// Consume the approval notice; returns whether one was pending
    pub fn take_approval_notice(&mut self) -> bool {
        std::mem::take(&mut self.approval_notice)
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            number: self.account_number.clone(),
            kind: self.kind(),
            status: self.status,
            owner: self.owner,
            balance: self.balance,
            entries: self.ledger.len(),
        }
    }

    /// Header fields for storage; ledger entries are stored separately
    pub fn record(&self) -> AccountRecord {
        AccountRecord {
            id: self.id,
            account_number: self.account_number.clone(),
            status: self.status,
            balance: self.balance,
            opening_balance: self.ledger.opening_balance(),
            owner: self.owner,
            branch: self.branch.clone(),
            date_opened: self.date_opened,
            decision: self.decision.clone(),
            closed: self.closed.clone(),
            variant: self.variant.clone(),
        }
    }

    /// Rebuild an account from its stored record and ledger entries
    ///
    /// # Errors
    ///
    /// `CorruptRecord` if the record breaks an account invariant: a number
    /// without a numbered status (or the reverse), a close stamp on an
    /// account that is not closed, or a ledger that does not replay to the
    /// stored balance.
    pub fn restore(record: AccountRecord, transactions: Vec<Transaction>) -> Result<Self, BankError> {
        let id = record.id;
        if record.account_number.is_some() != record.status.is_numbered() {
            return Err(BankError::corrupt_record(
                id,
                format!(
                    "status {} does not match account number {:?}",
                    record.status, record.account_number
                ),
            ));
        }
        if record.closed.is_some() != (record.status == AccountStatus::Closed) {
            return Err(BankError::corrupt_record(
                id,
                format!("close stamp does not match status {}", record.status),
            ));
        }
        let ledger = Ledger::from_entries(record.opening_balance, transactions)
            .map_err(|error| BankError::corrupt_record(id, error.to_string()))?;
        let replayed = ledger
            .replay()
            .map_err(|error| BankError::corrupt_record(id, error.to_string()))?;
        if replayed != record.balance {
            return Err(BankError::corrupt_record(
                id,
                format!("ledger replays to {} but balance is {}", replayed, record.balance),
            ));
        }

        Ok(Account {
            id,
            account_number: record.account_number,
            status: record.status,
            balance: record.balance,
            owner: record.owner,
            branch: record.branch,
            date_opened: record.date_opened,
            decision: record.decision,
            closed: record.closed,
            variant: record.variant,
            ledger,
            approval_notice: false,
        })
    }
}
