//! Major/minor currency unit conversion.
//!
//! The gateway takes amounts as integers in the currency's minor unit
//! (`10.00 USD` is `1000`, `1000 JPY` is `1000`, `1.000 KWD` is `1000`).

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::{ErrorKind, PaysafeError, Result};

/// Currencies without a minor unit.
const ZERO_DECIMAL: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

/// Currencies with three minor digits.
const THREE_DECIMAL: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Number of minor-unit digits for an ISO 4217 code.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCurrencyCode`] if the code is not three ASCII
/// uppercase letters.
pub fn exponent(currency_code: &str) -> Result<u32> {
    if currency_code.len() != 3 || !currency_code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(PaysafeError::new(ErrorKind::InvalidCurrencyCode, String::new()));
    }
    Ok(if ZERO_DECIMAL.contains(&currency_code) {
        0
    } else if THREE_DECIMAL.contains(&currency_code) {
        3
    } else {
        2
    })
}

/// Converts a major-unit amount to minor units.
///
/// Amounts with more precision than the currency allows are rounded half
/// away from zero.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCurrencyCode`] for a malformed code and
/// [`ErrorKind::InvalidAmount`] for negative or overflowing amounts.
///
/// # Examples
///
/// ```
/// use paysafe_sdk::currency::to_minor_units;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_minor_units(Decimal::new(1000, 2), "USD").unwrap(), 1000);
/// assert_eq!(to_minor_units(Decimal::new(1000, 0), "JPY").unwrap(), 1000);
/// assert_eq!(to_minor_units(Decimal::new(1, 0), "KWD").unwrap(), 1000);
/// ```
pub fn to_minor_units(amount: Decimal, currency_code: &str) -> Result<u64> {
    let exponent = exponent(currency_code)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PaysafeError::new(ErrorKind::InvalidAmount, String::new()));
    }
    let scale = Decimal::from(10_u64.pow(exponent));
    amount
        .checked_mul(scale)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_u64())
        .ok_or_else(|| PaysafeError::new(ErrorKind::InvalidAmount, String::new()))
}

/// Converts a minor-unit amount back to major units.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidCurrencyCode`] for a malformed code.
pub fn from_minor_units(amount: u64, currency_code: &str) -> Result<Decimal> {
    let exponent = exponent(currency_code)?;
    Ok(Decimal::from_i128_with_scale(i128::from(amount), exponent))
}
