// Installment store. Origination writes the whole schedule in one
// transaction; payment updates installments one row at a time so a failure
// mid-allocation leaves a well-defined paid prefix.

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::loans::models::LoanInstallment;

/// Capability set the scheduler and allocator require from installment storage.
#[async_trait]
pub trait InstallmentStore: Send + Sync {
    /// Persist a freshly scheduled batch of installments.
    async fn insert_batch(&self, installments: &[LoanInstallment]) -> Result<()>;

    /// Persist the state of a single installment.
    async fn update(&self, installment: &LoanInstallment) -> Result<()>;

    async fn find_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>>;

    async fn find_unpaid_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>>;
}

/// MySQL-backed installment store
pub struct MySqlInstallmentRepository {
    pool: MySqlPool,
}

impl MySqlInstallmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        installment: &LoanInstallment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loan_installments (
                id, loan_id, amount, paid_amount, due_date, payment_date, is_paid
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&installment.id)
        .bind(&installment.loan_id)
        .bind(installment.amount)
        .bind(installment.paid_amount)
        .bind(installment.due_date)
        .bind(installment.payment_date)
        .bind(installment.is_paid)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl InstallmentStore for MySqlInstallmentRepository {
    async fn insert_batch(&self, installments: &[LoanInstallment]) -> Result<()> {
        if installments.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for installment in installments {
            self.insert_with_tx(&mut tx, installment).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn update(&self, installment: &LoanInstallment) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE loan_installments
            SET paid_amount = ?, payment_date = ?, is_paid = ?
            WHERE id = ?
            "#,
        )
        .bind(installment.paid_amount)
        .bind(installment.payment_date)
        .bind(installment.is_paid)
        .bind(&installment.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Installment not found"));
        }

        Ok(())
    }

    async fn find_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        let installments = sqlx::query_as::<_, LoanInstallment>(
            r#"
            SELECT id, loan_id, amount, paid_amount, due_date, payment_date, is_paid
            FROM loan_installments
            WHERE loan_id = ?
            ORDER BY due_date ASC
            "#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(installments)
    }

    async fn find_unpaid_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        let installments = sqlx::query_as::<_, LoanInstallment>(
            r#"
            SELECT id, loan_id, amount, paid_amount, due_date, payment_date, is_paid
            FROM loan_installments
            WHERE loan_id = ? AND is_paid = FALSE
            ORDER BY due_date ASC
            "#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(installments)
    }
}
