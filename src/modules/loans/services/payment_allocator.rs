use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::AppError;
use crate::modules::loans::models::LoanInstallment;
use crate::modules::loans::repositories::InstallmentStore;

/// Outcome of applying a payment across outstanding installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub installments_paid: usize,
    pub amount_consumed: Decimal,
}

/// Allocation stopped by a persistence failure mid-sequence.
///
/// Installments paid before the failure stay paid; `settled` describes
/// exactly that prefix so the caller releases credit only for what was
/// actually persisted.
#[derive(thiserror::Error, Debug)]
#[error("allocation interrupted after {settled:?}: {source}")]
pub struct AllocationInterrupted {
    pub settled: Allocation,
    #[source]
    pub source: AppError,
}

/// Applies a payment amount across ordered outstanding installments.
///
/// Walks the sequence in due-date order and pays whole installments while
/// the remaining amount covers them; the first installment the remainder
/// cannot fully cover stops the walk. A single installment is never paid
/// partially. Each paid installment is persisted before the next one is
/// considered.
pub struct PaymentAllocator;

impl PaymentAllocator {
    pub async fn allocate(
        store: &dyn InstallmentStore,
        mut pending: Vec<LoanInstallment>,
        payment_amount: Decimal,
        today: NaiveDate,
    ) -> std::result::Result<Allocation, AllocationInterrupted> {
        let mut remaining = payment_amount;
        let mut installments_paid = 0usize;

        for installment in pending.iter_mut() {
            if remaining < installment.amount {
                break;
            }

            let settled = Allocation {
                installments_paid,
                amount_consumed: payment_amount - remaining,
            };

            if let Err(source) = installment.mark_paid(today) {
                return Err(AllocationInterrupted { settled, source });
            }

            if let Err(source) = store.update(installment).await {
                warn!(
                    installment_id = installment.id.as_str(),
                    paid_so_far = installments_paid,
                    "Persisting paid installment failed, stopping allocation"
                );
                return Err(AllocationInterrupted { settled, source });
            }

            remaining -= installment.amount;
            installments_paid += 1;
        }

        let allocation = Allocation {
            installments_paid,
            amount_consumed: payment_amount - remaining,
        };

        info!(
            installments_paid = allocation.installments_paid,
            amount_consumed = %allocation.amount_consumed,
            "Payment allocated"
        );

        Ok(allocation)
    }
}
