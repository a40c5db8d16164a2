//! Money helpers with fixed two-place decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Ledger amounts are `rust_decimal::Decimal` stored as NUMERIC(15,2).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for ledger amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] places using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount has no significant digits past [`MONEY_SCALE`].
///
/// `10.500` is accepted (trailing zeros are not significant), `10.005` is not.
#[must_use]
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}
