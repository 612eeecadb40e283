//! Money helpers over `rust_decimal`.
//!
//! The API sends every amount as a JSON float in the store currency. Amounts
//! are held as [`Decimal`] so that cart and checkout arithmetic is exact.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with two decimals and the euro sign used across the store.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("€{:.2}", round_cents(amount))
}
