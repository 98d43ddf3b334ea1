// In-memory loan and installment stores, used by the test suites and
// substitutable anywhere the store traits are accepted.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{AppError, Result};
use crate::modules::loans::models::{Loan, LoanInstallment};
use crate::modules::loans::repositories::{InstallmentStore, LoanStore};

#[derive(Default)]
pub struct InMemoryLoanStore {
    loans: Mutex<HashMap<String, Loan>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn insert(&self, loan: &Loan) -> Result<()> {
        let mut loans = self.loans.lock().expect("loan store poisoned");
        loans.insert(loan.id.clone(), loan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Loan>> {
        let loans = self.loans.lock().expect("loan store poisoned");
        Ok(loans.get(id).cloned())
    }

    async fn update(&self, loan: &Loan) -> Result<()> {
        let mut loans = self.loans.lock().expect("loan store poisoned");
        match loans.get_mut(&loan.id) {
            Some(stored) => {
                stored.is_paid = loan.is_paid;
                Ok(())
            }
            None => Err(AppError::not_found("Loan not found")),
        }
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Loan>> {
        let loans = self.loans.lock().expect("loan store poisoned");
        let mut matching: Vec<Loan> = loans
            .values()
            .filter(|loan| loan.customer_id == customer_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.create_date, &a.id).cmp(&(b.create_date, &b.id)));
        Ok(matching)
    }
}

#[derive(Default)]
pub struct InMemoryInstallmentStore {
    installments: Mutex<HashMap<String, LoanInstallment>>,
}

impl InMemoryInstallmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ordered_for_loan<F>(&self, loan_id: &str, filter: F) -> Vec<LoanInstallment>
    where
        F: Fn(&LoanInstallment) -> bool,
    {
        let installments = self.installments.lock().expect("installment store poisoned");
        let mut matching: Vec<LoanInstallment> = installments
            .values()
            .filter(|inst| inst.loan_id == loan_id && filter(inst))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.due_date, &a.id).cmp(&(b.due_date, &b.id)));
        matching
    }
}

#[async_trait]
impl InstallmentStore for InMemoryInstallmentStore {
    async fn insert_batch(&self, batch: &[LoanInstallment]) -> Result<()> {
        let mut installments = self.installments.lock().expect("installment store poisoned");
        for installment in batch {
            installments.insert(installment.id.clone(), installment.clone());
        }
        Ok(())
    }

    async fn update(&self, installment: &LoanInstallment) -> Result<()> {
        let mut installments = self.installments.lock().expect("installment store poisoned");
        match installments.get_mut(&installment.id) {
            Some(stored) => {
                stored.paid_amount = installment.paid_amount;
                stored.payment_date = installment.payment_date;
                stored.is_paid = installment.is_paid;
                Ok(())
            }
            None => Err(AppError::not_found("Installment not found")),
        }
    }

    async fn find_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        Ok(self.ordered_for_loan(loan_id, |_| true))
    }

    async fn find_unpaid_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        Ok(self.ordered_for_loan(loan_id, |inst| !inst.is_paid))
    }
}
