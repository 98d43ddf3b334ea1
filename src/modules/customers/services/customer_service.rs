// Customer ledger: owns the credit-limit bookkeeping and the customer CRUD
// surface. The used-limit mutation is delegated to the store's atomic
// adjust primitive; this service never does a load-then-store on it.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::customers::models::Customer;
use crate::modules::customers::repositories::{CustomerStore, MySqlCustomerRepository};

/// Service owning customer records and their credit-limit state
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor wiring the MySQL store
    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(Arc::new(MySqlCustomerRepository::new(pool)))
    }

    /// Create a customer with an empty ledger position.
    pub async fn create(
        &self,
        name: String,
        surname: String,
        credit_limit: Decimal,
    ) -> Result<Customer> {
        let customer = Customer::new(name, surname, credit_limit)?;
        let customer = self.store.insert(customer).await?;

        info!(
            customer_id = customer.id.as_str(),
            credit_limit = %customer.credit_limit,
            "Customer created"
        );

        Ok(customer)
    }

    pub async fn get(&self, customer_id: &str) -> Result<Customer> {
        self.store
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))
    }

    pub async fn list(&self) -> Result<Vec<Customer>> {
        self.store.list().await
    }

    /// Update mutable customer fields: name, surname and the total credit
    /// limit. The used limit is not writable through this path.
    pub async fn update(
        &self,
        customer_id: &str,
        name: String,
        surname: String,
        credit_limit: Decimal,
    ) -> Result<Customer> {
        let mut customer = self.get(customer_id).await?;

        customer.name = name;
        customer.surname = surname;
        customer.credit_limit = credit_limit;

        self.store.update(&customer).await?;
        self.get(customer_id).await
    }

    pub async fn delete(&self, customer_id: &str) -> Result<()> {
        self.store.delete(customer_id).await?;
        info!(customer_id = customer_id, "Customer deleted");
        Ok(())
    }

    /// Returns true iff the customer has `requested` credit available.
    ///
    /// Read-only; the authoritative check is repeated inside
    /// `adjust_used` when credit is actually reserved.
    pub async fn validate_capacity(&self, customer_id: &str, requested: Decimal) -> Result<bool> {
        let customer = self.get(customer_id).await?;
        Ok(customer.available_credit() >= requested)
    }

    /// Adds `delta` to the customer's used credit limit in one atomic step.
    ///
    /// Positive deltas reserve credit at loan origination, negative deltas
    /// release it as installments are paid.
    pub async fn adjust_used(&self, customer_id: &str, delta: Decimal) -> Result<Customer> {
        let result = self.store.adjust_used_credit(customer_id, delta).await;

        match &result {
            Ok(customer) => {
                info!(
                    customer_id = customer_id,
                    delta = %delta,
                    used_credit_limit = %customer.used_credit_limit,
                    "Used credit limit adjusted"
                );
            }
            Err(AppError::InvalidState(reason)) => {
                warn!(
                    customer_id = customer_id,
                    delta = %delta,
                    reason = reason.as_str(),
                    "Credit adjustment rejected"
                );
            }
            Err(_) => {}
        }

        result
    }
}
