use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A single scheduled repayment obligation of a loan.
///
/// Installments are paid whole or not at all: `paid_amount` is zero until
/// the installment is paid, then equals `amount`. The paid flag is
/// monotonic, never reversed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanInstallment {
    pub id: String,
    pub loan_id: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub is_paid: bool,
}

impl LoanInstallment {
    pub fn new(loan_id: String, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            loan_id,
            amount,
            paid_amount: Decimal::ZERO,
            due_date,
            payment_date: None,
            is_paid: false,
        }
    }

    /// Mark this installment fully paid as of `payment_date`.
    pub fn mark_paid(&mut self, payment_date: NaiveDate) -> Result<()> {
        if self.is_paid {
            return Err(AppError::invalid_state(format!(
                "Installment {} is already paid",
                self.id
            )));
        }

        self.paid_amount = self.amount;
        self.payment_date = Some(payment_date);
        self.is_paid = true;

        Ok(())
    }

    /// True when the installment falls due strictly before `cutoff`.
    pub fn is_due_before(&self, cutoff: NaiveDate) -> bool {
        self.due_date < cutoff
    }
}
