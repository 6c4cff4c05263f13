//! Decimal arithmetic helpers

use bigdecimal::{BigDecimal, RoundingMode};

/// Round to `scale` decimal places, ties away from zero
pub fn round_half_up(value: &BigDecimal, scale: i64) -> BigDecimal {
    value.with_scale_round(scale, RoundingMode::HalfUp)
}

/// `amount × rate / 100`, exact
pub fn percent_of(amount: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    (amount * rate) / BigDecimal::from(100)
}

/// `1 + rate / 100`, the multiplier that grosses a base up by `rate` percent
pub fn gross_up_factor(rate: &BigDecimal) -> BigDecimal {
    BigDecimal::from(1) + rate / BigDecimal::from(100)
}
