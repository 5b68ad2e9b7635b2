//! Wallet and alternative payment method request sub-objects.

use serde::{Deserialize, Serialize};

/// Apple Pay token wrapped for the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayRequest {
    /// Label shown on the payment sheet.
    pub label: String,
    /// Whether the billing address was requested from the wallet.
    pub request_billing_address: bool,
    /// Token produced by the wallet.
    pub apple_pay_payment_token: ApplePayPaymentToken,
}

/// Apple Pay payment token as produced by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplePayPaymentToken {
    /// Wallet transaction identifier.
    pub transaction_identifier: String,
    /// Base64 of the encrypted payment data.
    pub payment_data: String,
    /// Card network display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Card network (`Visa`, `MasterCard`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// `debit`, `credit`, `prepaid` or `store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
}

/// PayPal shipping preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayPalShippingPreference {
    /// Use the address on file with PayPal.
    #[default]
    GetFromFile,
    /// No shipping.
    NoShipping,
    /// Use the address provided by the merchant.
    SetProvidedAddress,
}

/// PayPal sub-object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalRequest {
    /// Payer's PayPal account id (email).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    /// Order description shown by PayPal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
    /// Recipient description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_description: Option<String>,
    /// Shipping preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_preference: Option<PayPalShippingPreference>,
}

/// Venmo sub-object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenmoRequest {
    /// Payer id at the merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    /// Venmo profile id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// Venmo merchant account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
}
