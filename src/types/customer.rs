//! Customer types
//!
//! Customers own a list of account ids; each account points back at its
//! owner by [`CustomerId`] only.

use super::account::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employer details an individual must have on file to open a cheque account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentInfo {
    pub employer_name: String,
    pub employer_address: String,
    pub employment_type: String,
}

impl EmploymentInfo {
    pub fn new(
        employer_name: impl Into<String>,
        employer_address: impl Into<String>,
        employment_type: impl Into<String>,
    ) -> Self {
        EmploymentInfo {
            employer_name: employer_name.into(),
            employer_address: employer_address.into(),
            employment_type: employment_type.into(),
        }
    }

    /// Employer name and address must both be present
    pub fn is_verified(&self) -> bool {
        !self.employer_name.trim().is_empty() && !self.employer_address.trim().is_empty()
    }
}

/// Individual or company specifics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CustomerKind {
    Individual {
        national_id: String,
        employment: Option<EmploymentInfo>,
    },
    Company {
        registration_number: String,
    },
}

/// A bank customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    kind: CustomerKind,
    accounts: Vec<AccountId>,
}

impl Customer {
    /// Create an individual customer with no employer on file
    pub fn individual(id: CustomerId, name: impl Into<String>, national_id: impl Into<String>) -> Self {
        Customer {
            id,
            name: name.into(),
            kind: CustomerKind::Individual {
                national_id: national_id.into(),
                employment: None,
            },
            accounts: Vec::new(),
        }
    }

    /// Create a company customer
    pub fn company(
        id: CustomerId,
        name: impl Into<String>,
        registration_number: impl Into<String>,
    ) -> Self {
        Customer {
            id,
            name: name.into(),
            kind: CustomerKind::Company {
                registration_number: registration_number.into(),
            },
            accounts: Vec::new(),
        }
    }

    /// Attach employer details; ignored for companies
    pub fn with_employment(mut self, info: EmploymentInfo) -> Self {
        if let CustomerKind::Individual { employment, .. } = &mut self.kind {
            *employment = Some(info);
        }
        self
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &CustomerKind {
        &self.kind
    }

    /// Accounts opened by this customer, in opening order
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    pub fn employment(&self) -> Option<&EmploymentInfo> {
        match &self.kind {
            CustomerKind::Individual { employment, .. } => employment.as_ref(),
            CustomerKind::Company { .. } => None,
        }
    }

    /// An individual needs a national id, a company a registration number
    pub fn verify_identity(&self) -> bool {
        match &self.kind {
            CustomerKind::Individual { national_id, .. } => !national_id.trim().is_empty(),
            CustomerKind::Company {
                registration_number,
            } => !registration_number.trim().is_empty(),
        }
    }

    pub(crate) fn add_account(&mut self, account: AccountId) {
        if !self.accounts.contains(&account) {
            self.accounts.push(account);
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
