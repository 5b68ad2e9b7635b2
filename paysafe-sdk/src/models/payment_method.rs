//! Payment method configuration returned for a merchant account.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Payment instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// Card (also used for Apple Pay, which rides on card accounts).
    Card,
    /// PayPal.
    Paypal,
    /// Venmo.
    Venmo,
    /// Any method this client does not know.
    #[serde(other)]
    Unknown,
}

impl PaymentType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::Paypal => "PAYPAL",
            Self::Venmo => "VENMO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-account feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfiguration {
    /// Whether Apple Pay is enabled on this card account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_apple_pay: Option<bool>,
    /// Card brand (`VI`, `MC`, `AM`, ...) → accepted category (`CREDIT`, `DEBIT`, `BOTH`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub card_type_config: BTreeMap<String, String>,
    /// Vendor client id for alternative payment methods (PayPal, Venmo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// A payment method enabled for an account in a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Instrument family.
    pub payment_method: PaymentType,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Merchant account id.
    pub account_id: String,
    /// Optional account feature flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_configuration: Option<AccountConfiguration>,
}

impl PaymentMethod {
    /// Whether this card account accepts Apple Pay.
    #[must_use]
    pub fn supports_apple_pay(&self) -> bool {
        self.payment_method == PaymentType::Card
            && self.account_configuration.as_ref().and_then(|c| c.is_apple_pay).unwrap_or(false)
    }
}

/// Response of the payment methods endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    /// Enabled methods.
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
}
