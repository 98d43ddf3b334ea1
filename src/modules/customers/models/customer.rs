use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A customer holding a revolving credit limit.
///
/// `used_credit_limit` is the reserved portion of `credit_limit`; the
/// invariant `0 <= used_credit_limit <= credit_limit` holds after every
/// ledger mutation. The used limit is only ever changed through the
/// customer store's atomic adjust operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub credit_limit: Decimal,
    pub used_credit_limit: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Create a new customer with no credit in use.
    pub fn new(name: String, surname: String, credit_limit: Decimal) -> Result<Self> {
        if credit_limit < Decimal::ZERO {
            return Err(AppError::validation("Credit limit cannot be negative"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            surname,
            credit_limit,
            used_credit_limit: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        })
    }

    /// Credit remaining for new loans.
    pub fn available_credit(&self) -> Decimal {
        self.credit_limit - self.used_credit_limit
    }
}
