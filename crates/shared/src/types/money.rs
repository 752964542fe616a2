//! Decimal rounding rules for monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the ledger is a `rust_decimal::Decimal`; these helpers pin
//! down the few places where a computed amount is deliberately rounded.

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale of posted monetary amounts (cents).
pub const MONEY_SCALE: u32 = 2;

/// Scale of intermediate rates and ratios (e.g. declining-balance rate).
pub const RATE_SCALE: u32 = 4;

/// Rounds to `dp` decimal places, ties away from zero (commercial half-up).
#[must_use]
pub fn round_half_up(amount: Decimal, dp: u32) -> Decimal {
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a computed amount to cents using half-up.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    round_half_up(amount, MONEY_SCALE)
}
