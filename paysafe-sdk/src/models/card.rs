//! Card instrument details.
//!
//! # Security Considerations
//!
//! - The PAN and CVV are zeroized on drop
//! - `Debug` output never contains the PAN or CVV
//! - Only the BIN (first six digits) and last four digits are exposed

use std::fmt;

use serde::Serialize;
use zeroize::Zeroize;

/// Card expiry date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardExpiry {
    /// Month, 1-12.
    pub month: u8,
    /// Four-digit year.
    pub year: u16,
}

/// Raw card details submitted once to obtain a payment handle.
///
/// # Examples
///
/// ```
/// use paysafe_sdk::models::{CardDetails, CardExpiry};
///
/// let card = CardDetails {
///     card_num: "4000000000001091".to_owned(),
///     card_expiry: CardExpiry { month: 12, year: 2030 },
///     cvv: Some("123".to_owned()),
///     holder_name: Some("Jane Doe".to_owned()),
/// };
///
/// assert_eq!(card.bin(), Some("400000"));
/// assert_eq!(card.last_four(), "1091");
/// assert!(!format!("{card:?}").contains("4000000000001091"));
/// ```
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Primary account number, digits only.
    pub card_num: String,
    /// Expiry date.
    pub card_expiry: CardExpiry,
    /// Card verification value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    /// Cardholder name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
}

impl CardDetails {
    /// First six digits of the PAN, used to set up 3-D Secure sessions.
    #[must_use]
    pub fn bin(&self) -> Option<&str> {
        self.card_num.get(..6).filter(|bin| bin.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Last four characters of the PAN, or the whole PAN when shorter.
    ///
    /// Works on unvalidated input.
    #[must_use]
    pub fn last_four(&self) -> &str {
        self.card_num
            .char_indices()
            .rev()
            .nth(3)
            .and_then(|(start, _)| self.card_num.get(start..))
            .unwrap_or(&self.card_num)
    }

    /// Checks the PAN shape (12-19 digits, valid Luhn check digit), the expiry
    /// month and the CVV length.
    ///
    /// Returns the name of the first invalid field.
    pub fn validate(&self) -> Result<(), &'static str> {
        let digits = self.card_num.len();
        if !(12..=19).contains(&digits) || !self.card_num.bytes().all(|b| b.is_ascii_digit()) {
            return Err("card.cardNum");
        }
        if !luhn_valid(&self.card_num) {
            return Err("card.cardNum");
        }
        if !(1..=12).contains(&self.card_expiry.month) {
            return Err("card.cardExpiry.month");
        }
        if let Some(cvv) = &self.cvv
            && (!(3..=4).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err("card.cvv");
        }
        Ok(())
    }
}

fn luhn_valid(number: &str) -> bool {
    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("last_four", &self.last_four())
            .field("card_expiry", &self.card_expiry)
            .field("holder_name", &self.holder_name)
            .finish_non_exhaustive()
    }
}

impl Drop for CardDetails {
    fn drop(&mut self) {
        self.card_num.zeroize();
        self.cvv.zeroize();
    }
}
