// In-memory customer store. Backs the test suites and serves as the
// reference for the store contract; any engine implementing `CustomerStore`
// is substitutable.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::customers::models::Customer;
use crate::modules::customers::repositories::CustomerStore;

#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: Mutex<HashMap<String, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn insert(&self, customer: Customer) -> Result<Customer> {
        let mut customers = self.customers.lock().expect("customer store poisoned");
        customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let customers = self.customers.lock().expect("customer store poisoned");
        Ok(customers.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.lock().expect("customer store poisoned");
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn update(&self, customer: &Customer) -> Result<()> {
        let mut customers = self.customers.lock().expect("customer store poisoned");
        match customers.get_mut(&customer.id) {
            Some(stored) => {
                stored.name = customer.name.clone();
                stored.surname = customer.surname.clone();
                stored.credit_limit = customer.credit_limit;
                stored.updated_at = chrono::Utc::now().naive_utc();
                Ok(())
            }
            None => Err(AppError::not_found("Customer not found")),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut customers = self.customers.lock().expect("customer store poisoned");
        customers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Customer not found"))
    }

    async fn adjust_used_credit(&self, id: &str, delta: Decimal) -> Result<Customer> {
        // Check and write under one lock; this is the in-memory equivalent of
        // the guarded UPDATE in the MySQL store.
        let mut customers = self.customers.lock().expect("customer store poisoned");

        let customer = customers
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("Customer not found"))?;

        let adjusted = customer.used_credit_limit + delta;
        if adjusted < Decimal::ZERO || adjusted > customer.credit_limit {
            return Err(AppError::invalid_state(format!(
                "Adjusting used credit by {} would leave it outside [0, {}]",
                delta, customer.credit_limit
            )));
        }

        customer.used_credit_limit = adjusted;
        customer.updated_at = chrono::Utc::now().naive_utc();
        Ok(customer.clone())
    }
}
