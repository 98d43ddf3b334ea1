// Customer store: capability trait plus the MySQL implementation.
//
// `adjust_used_credit` is the serialization point for a customer's ledger
// state. The MySQL implementation performs the invariant check and the
// increment in a single guarded UPDATE so concurrent originations or
// repayments against the same customer cannot lose updates.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::customers::models::Customer;

/// Capability set the ledger and the CRUD surface require from customer storage.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn insert(&self, customer: Customer) -> Result<Customer>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>>;

    async fn list(&self) -> Result<Vec<Customer>>;

    async fn update(&self, customer: &Customer) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Atomically add `delta` to the customer's used credit limit.
    ///
    /// Fails with `InvalidState` when the result would be negative or exceed
    /// the credit limit; the record is left unchanged in that case. Returns
    /// the customer as stored after the adjustment.
    async fn adjust_used_credit(&self, id: &str, delta: Decimal) -> Result<Customer>;
}

/// MySQL-backed customer store
pub struct MySqlCustomerRepository {
    pool: MySqlPool,
}

impl MySqlCustomerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for MySqlCustomerRepository {
    async fn insert(&self, customer: Customer) -> Result<Customer> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, surname, credit_limit, used_credit_limit,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(customer.credit_limit)
        .bind(customer.used_credit_limit)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, credit_limit, used_credit_limit,
                   created_at, updated_at
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn list(&self) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, surname, credit_limit, used_credit_limit,
                   created_at, updated_at
            FROM customers
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn update(&self, customer: &Customer) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, surname = ?, credit_limit = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(customer.credit_limit)
        .bind(chrono::Utc::now().naive_utc())
        .bind(&customer.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Customer not found"));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Customer not found"));
        }

        Ok(())
    }

    async fn adjust_used_credit(&self, id: &str, delta: Decimal) -> Result<Customer> {
        // Single guarded statement: the WHERE clause re-checks the invariant
        // against current row state, so the read-modify-write cannot race.
        let rows_affected = sqlx::query(
            r#"
            UPDATE customers
            SET used_credit_limit = used_credit_limit + ?, updated_at = ?
            WHERE id = ?
              AND used_credit_limit + ? >= 0
              AND used_credit_limit + ? <= credit_limit
            "#,
        )
        .bind(delta)
        .bind(chrono::Utc::now().naive_utc())
        .bind(id)
        .bind(delta)
        .bind(delta)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return match self.find_by_id(id).await? {
                None => Err(AppError::not_found("Customer not found")),
                Some(customer) => Err(AppError::invalid_state(format!(
                    "Adjusting used credit by {} would leave it outside [0, {}]",
                    delta, customer.credit_limit
                ))),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Customer disappeared after adjustment"))
    }
}
