use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for all monetary amounts.
pub const SCALE: u32 = 2;

/// Rounds a monetary amount half-up to two decimal places.
///
/// Ledger amounts round midpoints away from zero (0.005 becomes 0.01),
/// not to the nearest even digit.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// The smallest representable monetary unit (one cent).
pub fn smallest_unit() -> Decimal {
    Decimal::new(1, SCALE)
}
