// Allocation semantics: whole-installment greedy walk in due-date order,
// boundary equality, and the settled prefix on a mid-sequence store failure.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use creditline::core::{AppError, Result};
use creditline::loans::models::LoanInstallment;
use creditline::loans::{InMemoryInstallmentStore, InstallmentStore, PaymentAllocator};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
}

fn installment(month: u32, amount: Decimal) -> LoanInstallment {
    LoanInstallment::new(
        "loan-1".to_string(),
        amount,
        NaiveDate::from_ymd_opt(2026, month, 1).unwrap(),
    )
}

async fn store_with(installments: &[LoanInstallment]) -> InMemoryInstallmentStore {
    let store = InMemoryInstallmentStore::new();
    store.insert_batch(installments).await.unwrap();
    store
}

#[tokio::test]
async fn test_payment_250_over_100_installments_pays_two() {
    let pending = vec![
        installment(9, dec!(100)),
        installment(10, dec!(100)),
        installment(11, dec!(100)),
    ];
    let store = store_with(&pending).await;

    let allocation = PaymentAllocator::allocate(&store, pending, dec!(250), today())
        .await
        .unwrap();

    assert_eq!(allocation.installments_paid, 2);
    assert_eq!(allocation.amount_consumed, dec!(200));
}

#[tokio::test]
async fn test_payment_50_pays_nothing() {
    let pending = vec![installment(9, dec!(100)), installment(10, dec!(100))];
    let store = store_with(&pending).await;

    let allocation = PaymentAllocator::allocate(&store, pending, dec!(50), today())
        .await
        .unwrap();

    assert_eq!(allocation.installments_paid, 0);
    assert_eq!(allocation.amount_consumed, dec!(0));
}

#[tokio::test]
async fn test_payment_200_boundary_pays_exactly_two() {
    let pending = vec![
        installment(9, dec!(100)),
        installment(10, dec!(100)),
        installment(11, dec!(100)),
    ];
    let store = store_with(&pending).await;

    let allocation = PaymentAllocator::allocate(&store, pending, dec!(200), today())
        .await
        .unwrap();

    assert_eq!(allocation.installments_paid, 2);
    assert_eq!(allocation.amount_consumed, dec!(200));

    // The third installment is untouched, not partially paid
    let unpaid = store
        .find_unpaid_by_loan_ordered_by_due_date("loan-1")
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].paid_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_earliest_due_installments_paid_first() {
    let pending = vec![
        installment(9, dec!(30)),
        installment(10, dec!(50)),
        installment(11, dec!(20)),
    ];
    let store = store_with(&pending).await;

    // 60 covers the September and October installments; November stays
    // unpaid even though 60 - 30 - 50 < 20 would also have covered it.
    let allocation = PaymentAllocator::allocate(&store, pending, dec!(80), today())
        .await
        .unwrap();

    assert_eq!(allocation.installments_paid, 2);
    assert_eq!(allocation.amount_consumed, dec!(80));

    let unpaid = store
        .find_unpaid_by_loan_ordered_by_due_date("loan-1")
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(
        unpaid[0].due_date,
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
    );
}

/// Store wrapper that starts failing updates after a set number of writes.
struct FlakyInstallmentStore {
    inner: InMemoryInstallmentStore,
    updates_before_failure: AtomicUsize,
}

impl FlakyInstallmentStore {
    fn new(inner: InMemoryInstallmentStore, updates_before_failure: usize) -> Self {
        Self {
            inner,
            updates_before_failure: AtomicUsize::new(updates_before_failure),
        }
    }
}

#[async_trait]
impl InstallmentStore for FlakyInstallmentStore {
    async fn insert_batch(&self, installments: &[LoanInstallment]) -> Result<()> {
        self.inner.insert_batch(installments).await
    }

    async fn update(&self, installment: &LoanInstallment) -> Result<()> {
        if self.updates_before_failure.fetch_sub(1, Ordering::SeqCst) == 0 {
            return Err(AppError::internal("simulated write failure"));
        }
        self.inner.update(installment).await
    }

    async fn find_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        self.inner.find_by_loan_ordered_by_due_date(loan_id).await
    }

    async fn find_unpaid_by_loan_ordered_by_due_date(
        &self,
        loan_id: &str,
    ) -> Result<Vec<LoanInstallment>> {
        self.inner
            .find_unpaid_by_loan_ordered_by_due_date(loan_id)
            .await
    }
}

#[tokio::test]
async fn test_store_failure_reports_settled_prefix() {
    let pending = vec![
        installment(9, dec!(100)),
        installment(10, dec!(100)),
        installment(11, dec!(100)),
    ];
    let inner = store_with(&pending).await;
    // First update succeeds, second fails
    let store = FlakyInstallmentStore::new(inner, 1);

    let interrupted = PaymentAllocator::allocate(&store, pending, dec!(300), today())
        .await
        .unwrap_err();

    // Only the installment that actually persisted counts
    assert_eq!(interrupted.settled.installments_paid, 1);
    assert_eq!(interrupted.settled.amount_consumed, dec!(100));

    let unpaid = store
        .find_unpaid_by_loan_ordered_by_due_date("loan-1")
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 2);
}
