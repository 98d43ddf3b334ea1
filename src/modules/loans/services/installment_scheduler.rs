use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use crate::core::{money, AppError, Result};
use crate::modules::loans::models::LoanInstallment;

/// Builder of installment schedules for a loan.
///
/// Splits the total repayable amount into equal shares, each rounded
/// half-up to two decimals independently. Because every share is rounded
/// on its own, the schedule sum can drift from the stored loan amount by a
/// few cents; callers accept that drift rather than reconciling it into
/// the last installment.
pub struct InstallmentScheduler;

impl InstallmentScheduler {
    /// Produce the full schedule for a loan.
    ///
    /// Due dates fall on the first day of the month, `1..=count` months
    /// after `today`: the first installment is due next month, never in
    /// the month of origination. Either the complete schedule is returned
    /// or nothing is.
    pub fn schedule(
        loan_id: &str,
        total_amount: Decimal,
        count: i32,
        today: NaiveDate,
    ) -> Result<Vec<LoanInstallment>> {
        if count <= 0 {
            return Err(AppError::validation(format!(
                "Installment count must be positive, got {}",
                count
            )));
        }

        if total_amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Total amount must be positive, got {}",
                total_amount
            )));
        }

        let share = money::round(total_amount / Decimal::from(count));

        let mut installments = Vec::with_capacity(count as usize);
        for offset in 1..=count {
            let due_date = today
                .checked_add_months(Months::new(offset as u32))
                .and_then(|date| date.with_day(1))
                .ok_or_else(|| AppError::internal("Installment due date out of range"))?;

            installments.push(LoanInstallment::new(loan_id.to_string(), share, due_date));
        }

        info!(
            loan_id = loan_id,
            count = count,
            share = %share,
            first_due = %installments[0].due_date,
            "Installment schedule produced"
        );

        Ok(installments)
    }
}
