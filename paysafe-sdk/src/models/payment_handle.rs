//! Single-use payment handles.
//!
//! A payment handle is the gateway's token for a tokenized, not yet charged
//! instrument. Its status is driven entirely by the server: this client reads
//! the status returned by each call and decides the next step, it never
//! computes a transition locally.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    billing::{BillingDetails, MerchantDescriptor, Profile, ShippingDetails},
    card::CardDetails,
    payment_method::PaymentType,
    wallet::{ApplePayRequest, PayPalRequest, VenmoRequest},
};
use crate::api_error::ApiErrorBody;

/// Server-side status of a payment handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentHandleStatus {
    /// Created, waiting for the payer (redirect or authentication).
    Initiated,
    /// Ready to be used in a payment.
    Payable,
    /// Being processed by the gateway.
    Processing,
    /// Rejected.
    Failed,
    /// Not used within its time to live.
    Expired,
    /// Consumed by a payment.
    Completed,
}

impl PaymentHandleStatus {
    /// Whether the handle can never become payable.
    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Expired)
    }
}

impl fmt::Display for PaymentHandleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initiated => "INITIATED",
            Self::Payable => "PAYABLE",
            Self::Processing => "PROCESSING",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
            Self::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Transaction type of a handle request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Regular payment.
    #[default]
    Payment,
    /// Standalone credit.
    StandaloneCredit,
    /// Original credit.
    OriginalCredit,
    /// Account verification without a charge.
    Verification,
}

/// Relation of a return link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnLinkRel {
    /// Used when no more specific link applies.
    Default,
    /// Payer completed the redirect flow.
    OnCompleted,
    /// Payer failed the redirect flow.
    OnFailed,
    /// Payer cancelled the redirect flow.
    OnCancelled,
}

/// Where the payer returns after a redirect flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLink {
    /// Link relation.
    pub rel: ReturnLinkRel,
    /// Target URL.
    pub href: String,
    /// HTTP method, usually `GET`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Hypermedia link returned by the gateway, e.g. the `redirect_payment` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link relation.
    pub rel: String,
    /// Target URL.
    pub href: String,
}

/// 3-D Secure block of a card handle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDsRequest {
    /// Merchant website URL.
    pub merchant_url: String,
    /// Always `SDK` for this client.
    pub device_channel: String,
    /// `PAYMENT` or `NON_PAYMENT`.
    pub message_category: String,
    /// `PAYMENT_TRANSACTION`, `RECURRING_TRANSACTION`, ...
    pub authentication_purpose: String,
    /// `NO_PREFERENCE`, `NO_CHALLENGE_REQUESTED`, `CHALLENGE_REQUESTED`, `CHALLENGE_MANDATED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requestor_challenge_preference: Option<String>,
}

/// Instrument-specific part of a handle request. Exactly one is sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethodRequest {
    /// Raw card.
    Card(CardDetails),
    /// Apple Pay token.
    ApplePay(ApplePayRequest),
    /// PayPal.
    Paypal(PayPalRequest),
    /// Venmo.
    Venmo(VenmoRequest),
}

impl PaymentMethodRequest {
    /// Payment type sent alongside this sub-object.
    ///
    /// Apple Pay is tokenized as a card.
    #[must_use]
    pub const fn payment_type(&self) -> PaymentType {
        match self {
            Self::Card(_) | Self::ApplePay(_) => PaymentType::Card,
            Self::Paypal(_) => PaymentType::Paypal,
            Self::Venmo(_) => PaymentType::Venmo,
        }
    }
}

/// Body of `POST /paymenthub/v1/singleusepaymenthandles`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandleRequest {
    /// Merchant reference, unique per attempt.
    pub merchant_ref_num: String,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Merchant account the handle belongs to.
    pub account_id: String,
    /// Instrument family.
    pub payment_type: PaymentType,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Redirect targets for wallet flows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub return_links: Vec<ReturnLink>,
    /// Payer profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Billing address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_details: Option<BillingDetails>,
    /// Shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_details: Option<ShippingDetails>,
    /// Statement descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_descriptor: Option<MerchantDescriptor>,
    /// Instrument sub-object, flattened into `card`, `applePay`, `paypal` or `venmo`.
    #[serde(flatten)]
    pub method: PaymentMethodRequest,
    /// 3-D Secure parameters, cards only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_ds: Option<ThreeDsRequest>,
}

/// Vendor-specific data returned for wallet handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// Vendor order id (PayPal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Processor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Vendor client token (Venmo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    /// Vendor session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

/// A payment handle as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandle {
    /// Handle id.
    pub id: String,
    /// Merchant account.
    #[serde(default)]
    pub account_id: String,
    /// Server-side status.
    pub status: PaymentHandleStatus,
    /// Merchant reference echoed back.
    #[serde(default)]
    pub merchant_ref_num: String,
    /// Opaque token used to charge the instrument.
    pub payment_handle_token: String,
    /// Instrument family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    /// `NONE`, `REDIRECT`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// `SINGLE_USE` for handles created by this client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Amount in minor units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Hypermedia links (redirect targets).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Return links echoed back.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub return_links: Vec<ReturnLink>,
    /// Wallet vendor data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_response: Option<GatewayResponse>,
    /// Seconds until the handle expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live_seconds: Option<u64>,
    /// Error embedded in a failed handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

impl PaymentHandle {
    /// URL of the first link with the given relation.
    #[must_use]
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.iter().find(|l| l.rel == rel).map(|l| l.href.as_str())
    }
}
