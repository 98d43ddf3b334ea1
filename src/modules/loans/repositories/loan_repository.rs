use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::loans::models::Loan;

/// Capability set the orchestrator requires from loan storage.
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn insert(&self, loan: &Loan) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>>;

    async fn update(&self, loan: &Loan) -> Result<()>;

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Loan>>;
}

/// MySQL-backed loan store
pub struct MySqlLoanRepository {
    pool: MySqlPool,
}

impl MySqlLoanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStore for MySqlLoanRepository {
    async fn insert(&self, loan: &Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, customer_id, loan_amount, number_of_installments,
                is_paid, create_date
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&loan.id)
        .bind(&loan.customer_id)
        .bind(loan.loan_amount)
        .bind(loan.number_of_installments)
        .bind(loan.is_paid)
        .bind(loan.create_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, customer_id, loan_amount, number_of_installments,
                   is_paid, create_date
            FROM loans
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn update(&self, loan: &Loan) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE loans
            SET is_paid = ?
            WHERE id = ?
            "#,
        )
        .bind(loan.is_paid)
        .bind(&loan.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Loan not found"));
        }

        Ok(())
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, customer_id, loan_amount, number_of_installments,
                   is_paid, create_date
            FROM loans
            WHERE customer_id = ?
            ORDER BY create_date ASC, id ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
