// Loan orchestration: origination and repayment.
//
// Composes the customer ledger, the installment scheduler and the payment
// allocator. Origination is not atomic across the loan row, the installment
// batch and the credit reservation; a failure between those steps leaves a
// loan without its schedule or without its reservation (the installment
// batch itself is transactional at the store).

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::core::{money, AppError, Result};
use crate::modules::customers::services::CustomerService;
use crate::modules::loans::models::{Loan, LoanInstallment};
use crate::modules::loans::repositories::{
    InstallmentStore, LoanStore, MySqlInstallmentRepository, MySqlLoanRepository,
};
use crate::modules::loans::services::{InstallmentScheduler, PaymentAllocator};

/// Result of a repayment call against a loan.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResult {
    pub installments_paid: usize,
    pub total_amount_paid: Decimal,
    pub loan_fully_paid: bool,
}

/// Service orchestrating loan origination and repayment
pub struct LoanService {
    loans: Arc<dyn LoanStore>,
    installments: Arc<dyn InstallmentStore>,
    customers: CustomerService,
    payment_window_months: u32,
}

impl LoanService {
    /// Months ahead within which unpaid installments are payable.
    pub const DEFAULT_PAYMENT_WINDOW_MONTHS: u32 = 3;

    pub fn new(
        loans: Arc<dyn LoanStore>,
        installments: Arc<dyn InstallmentStore>,
        customers: CustomerService,
    ) -> Self {
        Self {
            loans,
            installments,
            customers,
            payment_window_months: Self::DEFAULT_PAYMENT_WINDOW_MONTHS,
        }
    }

    pub fn with_payment_window(mut self, months: u32) -> Self {
        self.payment_window_months = months;
        self
    }

    /// Convenience constructor wiring the MySQL stores
    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(
            Arc::new(MySqlLoanRepository::new(pool.clone())),
            Arc::new(MySqlInstallmentRepository::new(pool.clone())),
            CustomerService::mysql(pool),
        )
    }

    /// Originate a loan against a customer's credit limit.
    ///
    /// The total repayable amount is `principal * (1 + interest_rate)`.
    /// The loan stores that total rounded half-up to two decimals; the
    /// unrounded total is what the scheduler divides into shares and what
    /// the ledger reserves.
    pub async fn create_loan(
        &self,
        customer_id: &str,
        principal: Decimal,
        interest_rate: Decimal,
        installment_count: i32,
    ) -> Result<Loan> {
        if principal <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Loan principal must be positive, got {}",
                principal
            )));
        }

        if interest_rate < Loan::min_interest_rate() || interest_rate > Loan::max_interest_rate() {
            return Err(AppError::validation(format!(
                "Interest rate must be between {} and {}, got {}",
                Loan::min_interest_rate(),
                Loan::max_interest_rate(),
                interest_rate
            )));
        }

        if !Loan::ALLOWED_INSTALLMENT_COUNTS.contains(&installment_count) {
            return Err(AppError::validation(format!(
                "Number of installments must be one of {:?}, got {}",
                Loan::ALLOWED_INSTALLMENT_COUNTS,
                installment_count
            )));
        }

        let total_amount = principal * (Decimal::ONE + interest_rate);

        if !self
            .customers
            .validate_capacity(customer_id, total_amount)
            .await?
        {
            warn!(
                customer_id = customer_id,
                total_amount = %total_amount,
                "Loan rejected, not enough credit capacity"
            );
            return Err(AppError::insufficient_credit(
                "Customer does not have enough credit limit",
            ));
        }

        let today = Utc::now().date_naive();
        let loan = Loan::new(
            customer_id.to_string(),
            money::round(total_amount),
            installment_count,
            today,
        );

        self.loans.insert(&loan).await?;

        let schedule =
            InstallmentScheduler::schedule(&loan.id, total_amount, installment_count, today)?;
        self.installments.insert_batch(&schedule).await?;

        self.customers.adjust_used(customer_id, total_amount).await?;

        info!(
            loan_id = loan.id.as_str(),
            customer_id = customer_id,
            loan_amount = %loan.loan_amount,
            installments = installment_count,
            "Loan created"
        );

        Ok(loan)
    }

    pub async fn get_loans_by_customer(&self, customer_id: &str) -> Result<Vec<Loan>> {
        self.loans.find_by_customer(customer_id).await
    }

    /// All installments of a loan, ordered by ascending due date.
    pub async fn get_installments_by_loan(&self, loan_id: &str) -> Result<Vec<LoanInstallment>> {
        self.installments
            .find_by_loan_ordered_by_due_date(loan_id)
            .await
    }

    /// Apply a payment against a loan's outstanding installments.
    ///
    /// Only installments due within the payment window (three months by
    /// default) are eligible. The loan closes when paying the eligible
    /// subset clears every unpaid installment of the loan; credit is
    /// released for exactly the amount the allocator consumed, also when
    /// allocation stops early on a persistence failure.
    pub async fn pay_loan(&self, loan_id: &str, amount: Decimal) -> Result<PaymentResult> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }

        let mut loan = self
            .loans
            .find_by_id(loan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Loan not found"))?;

        let unpaid = self
            .installments
            .find_unpaid_by_loan_ordered_by_due_date(loan_id)
            .await?;
        let unpaid_count = unpaid.len();

        let today = Utc::now().date_naive();
        let cutoff = self.payment_window_cutoff(today)?;
        let eligible: Vec<LoanInstallment> = unpaid
            .into_iter()
            .filter(|installment| installment.is_due_before(cutoff))
            .collect();

        let allocation = match PaymentAllocator::allocate(
            self.installments.as_ref(),
            eligible,
            amount,
            today,
        )
        .await
        {
            Ok(allocation) => allocation,
            Err(interrupted) => {
                // Installments persisted before the failure stay paid;
                // release credit for that prefix only, then surface the
                // failure.
                warn!(
                    loan_id = loan_id,
                    settled = interrupted.settled.installments_paid,
                    "Payment allocation interrupted"
                );
                self.customers
                    .adjust_used(&loan.customer_id, -interrupted.settled.amount_consumed)
                    .await?;
                return Err(interrupted.source);
            }
        };

        // Closure is decided against every unpaid installment of the loan,
        // not just the eligible subset.
        let loan_fully_paid = unpaid_count == allocation.installments_paid;
        if loan_fully_paid && !loan.is_paid {
            loan.is_paid = true;
            self.loans.update(&loan).await?;
            info!(loan_id = loan_id, "Loan fully paid");
        }

        self.customers
            .adjust_used(&loan.customer_id, -allocation.amount_consumed)
            .await?;

        info!(
            loan_id = loan_id,
            installments_paid = allocation.installments_paid,
            amount_consumed = %allocation.amount_consumed,
            loan_fully_paid = loan_fully_paid,
            "Payment applied"
        );

        Ok(PaymentResult {
            installments_paid: allocation.installments_paid,
            total_amount_paid: allocation.amount_consumed,
            loan_fully_paid,
        })
    }

    fn payment_window_cutoff(&self, today: NaiveDate) -> Result<NaiveDate> {
        today
            .checked_add_months(Months::new(self.payment_window_months))
            .ok_or_else(|| AppError::internal("Payment window cutoff out of range"))
    }
}
