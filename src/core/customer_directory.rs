//! Registered customers
//!
//! Customers are synchronized independently of accounts; no account lock is
//! ever held while a customer entry is locked, or the other way round.

use crate::types::{AccountId, BankError, Customer, CustomerId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct CustomerDirectory {
    customers: DashMap<CustomerId, Customer>,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a customer; `DuplicateCustomer` if the id is already registered
    pub fn register(&self, customer: Customer) -> Result<(), BankError> {
        match self.customers.entry(customer.id()) {
            Entry::Occupied(_) => Err(BankError::DuplicateCustomer {
                customer: customer.id(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(customer);
                Ok(())
            }
        }
    }

    /// Copy of a registered customer
    pub fn get(&self, id: CustomerId) -> Result<Customer, BankError> {
        self.customers
            .get(&id)
            .map(|customer| customer.clone())
            .ok_or(BankError::CustomerNotFound { customer: id })
    }

    /// Record that `account` belongs to `id`; returns the updated customer
    pub fn add_account(&self, id: CustomerId, account: AccountId) -> Result<Customer, BankError> {
        let mut customer = self
            .customers
            .get_mut(&id)
            .ok_or(BankError::CustomerNotFound { customer: id })?;
        customer.add_account(account);
        Ok(customer.clone())
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.customers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
