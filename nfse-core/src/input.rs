//! Validation of user-entered values before they reach the calculator.
//!
//! [`compute_withholding`](crate::calculations::compute_withholding) trusts
//! its input. Everything typed by a user goes through this module first.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// Largest gross value accepted for a single invoice (R$ 1 trillion).
pub const MAX_GROSS_VALUE: Decimal = dec!(1000000000000);

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("amount {0} exceeds the maximum of {max}", max = MAX_GROSS_VALUE)]
    AmountTooLarge(Decimal),

    #[error("unsupported ISS rate '{0}'; expected one of 2, 2.5, 3, 4, 5")]
    UnsupportedIssRate(String),

    #[error("unknown withholding '{0}'; expected one of iss, ir, pis, cofins, csll, inss")]
    UnknownWithholding(String),
}

/// Normalizes a typed amount to plain `1234.56` notation.
///
/// Strips the `R$` symbol and whitespace. With a comma present the comma is
/// the decimal separator and dots before it group thousands (`1.234,56`).
/// Without one, repeated dots group thousands (`1.234.567`) and a single dot
/// is the decimal point, except that `1.500` reads as thousands after `R$`
/// and is rejected as ambiguous without it.
///
/// Returns `None` for malformed grouping such as `1.234,5.6` or `1.23.4`.
fn normalize_amount(s: &str) -> Option<String> {
    let trimmed = s.trim();
    let (has_symbol, rest) = match trimmed.strip_prefix("R$") {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let stripped: String = rest.chars().filter(|c| !c.is_whitespace()).collect();

    let (integer, fraction) = match stripped.split_once(',') {
        Some((integer, fraction)) => {
            if fraction.contains([',', '.']) {
                return None;
            }
            (integer, Some(fraction))
        }
        None => match stripped.split_once('.') {
            Some((integer, fraction)) if !fraction.contains('.') => {
                if is_thousands_group(fraction) && ungroup(&stripped).is_some() {
                    if !has_symbol {
                        return None;
                    }
                    (stripped.as_str(), None)
                } else {
                    (integer, Some(fraction))
                }
            }
            _ => (stripped.as_str(), None),
        },
    };

    let integer = ungroup(integer)?;
    Some(match fraction {
        Some(fraction) => format!("{integer}.{fraction}"),
        None => integer,
    })
}

fn is_thousands_group(group: &str) -> bool {
    group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit())
}

/// Removes thousands dots from an integer part, checking the grouping.
fn ungroup(integer: &str) -> Option<String> {
    if !integer.contains('.') {
        return Some(integer.to_string());
    }

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer),
    };
    let mut groups = digits.split('.');
    let leading = groups.next()?;
    let leading_ok = (1..=3).contains(&leading.len()) && leading.bytes().all(|b| b.is_ascii_digit());
    if !leading_ok {
        return None;
    }

    let mut out = format!("{sign}{leading}");
    for group in groups {
        if !is_thousands_group(group) {
            return None;
        }
        out.push_str(group);
    }
    Some(out)
}

/// Parses a monetary amount typed by a user.
///
/// Accepts `1.234,56`, `R$ 1.234,56`, `R$ 1.500` and `1234.56`. Empty input
/// is zero.
///
/// # Errors
///
/// * [`InputError::InvalidAmount`] when the text is not a number, groups
///   thousands wrongly, or is ambiguous (`10.000` without `R$`).
/// * [`InputError::NegativeAmount`] / [`InputError::AmountTooLarge`] when it
///   falls outside the accepted range.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use nfse_core::input::parse_amount;
///
/// assert_eq!(parse_amount("R$ 10.000,00").unwrap(), dec!(10000.00));
/// assert_eq!(parse_amount("R$ 1.500").unwrap(), dec!(1500));
/// assert_eq!(parse_amount("1234.5").unwrap(), dec!(1234.5));
/// assert!(parse_amount("10.000").is_err());
/// assert!(parse_amount("-1,00").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    let Some(normalized) = normalize_amount(s) else {
        tracing::error!(input = %s, "malformed or ambiguous amount");
        return Err(InputError::InvalidAmount(s.trim().to_string()));
    };
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        InputError::InvalidAmount(s.trim().to_string())
    })?;

    validate_gross_value(value)
}

/// Checks that a gross value lies in `0..=MAX_GROSS_VALUE`.
///
/// # Errors
///
/// [`InputError::NegativeAmount`] or [`InputError::AmountTooLarge`].
pub fn validate_gross_value(value: Decimal) -> Result<Decimal, InputError> {
    if value.is_sign_negative() && !value.is_zero() {
        tracing::warn!(value = %value, "rejected negative amount");
        return Err(InputError::NegativeAmount(value));
    }
    if value > MAX_GROSS_VALUE {
        tracing::warn!(value = %value, max = %MAX_GROSS_VALUE, "rejected amount above maximum");
        return Err(InputError::AmountTooLarge(value));
    }
    Ok(value)
}
