//! Rounding shared by the display boundary.
//!
//! Calculations keep exact [`Decimal`] products; values are brought to
//! centavos only when they are shown or exported.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly half a centavo round away from zero. The result always
/// carries a scale of two, so `0` renders as `0.00`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use nfse_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(65.0000)), dec!(65.00));
/// assert_eq!(round_half_up(dec!(0.00325)), dec!(0.00));
/// assert_eq!(round_half_up(dec!(0.015)), dec!(0.02));
/// assert_eq!(round_half_up(dec!(-0.015)), dec!(-0.02)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
