use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An installment loan drawn against a customer's credit limit.
///
/// `loan_amount` is the total repayable amount (principal plus the flat
/// interest applied at origination), rounded half-up to two decimals for
/// storage. A loan is immutable after creation except for `is_paid`, which
/// flips to true exactly once, when every installment has been paid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: String,
    pub customer_id: String,
    pub loan_amount: Decimal,
    pub number_of_installments: i32,
    pub is_paid: bool,
    pub create_date: NaiveDate,
}

impl Loan {
    /// Installment counts a loan may be originated with.
    pub const ALLOWED_INSTALLMENT_COUNTS: [i32; 4] = [6, 9, 12, 24];

    /// Lower bound of the accepted flat interest rate (inclusive).
    pub fn min_interest_rate() -> Decimal {
        Decimal::new(1, 1) // 0.1
    }

    /// Upper bound of the accepted flat interest rate (inclusive).
    pub fn max_interest_rate() -> Decimal {
        Decimal::new(5, 1) // 0.5
    }

    pub fn new(
        customer_id: String,
        loan_amount: Decimal,
        number_of_installments: i32,
        create_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            loan_amount,
            number_of_installments,
            is_paid: false,
            create_date,
        }
    }
}
