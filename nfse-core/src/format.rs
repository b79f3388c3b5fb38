//! pt-BR display formatting.
//!
//! This is the only place amounts are rounded for presentation.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use nfse_core::format::format_brl;
///
/// assert_eq!(format_brl(dec!(7785.0000)), "R$ 7.785,00");
/// assert_eq!(format_brl(dec!(-0.015)), "-R$ 0,02");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let digits = format!("{:.2}", rounded.abs());
    let (integer, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}R$ {},{cents}", group_thousands(integer))
}

/// Formats a percentage with a decimal comma, e.g. `2,5%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize().to_string().replace('.', ","))
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
