//! 3-D Secure service requests and responses.

use serde::{Deserialize, Serialize};

/// Body of `POST /threedsecure/v2/accounts/{accountId}/jwts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtRequest {
    /// First six digits of the card.
    pub card_bin: String,
}

/// Session-setup token issued for the vendor authentication engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    /// JWT handed to the engine's `setup`.
    pub jwt: String,
    /// Server-side fingerprinting id, echoed in the authentication request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_fingerprinting_id: Option<String>,
}

/// Body of `POST /threedsecure/v2/accounts/{accountId}/authentications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequest {
    /// Merchant reference of the flow.
    pub merchant_ref_num: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Payment handle being authenticated.
    pub payment_handle_token: String,
    /// Session id returned by the engine's `setup`.
    pub sdk_session_id: String,
    /// Fingerprinting id from the JWT response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_fingerprinting_id: Option<String>,
    /// Merchant website URL.
    pub merchant_url: String,
    /// Always `SDK`.
    pub device_channel: String,
    /// `PAYMENT` or `NON_PAYMENT`.
    pub message_category: String,
    /// `PAYMENT_TRANSACTION`, ...
    pub authentication_purpose: String,
    /// Challenge preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestor_challenge_preference: Option<String>,
}

/// Status of an authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthenticationStatus {
    /// Frictionless success or successful challenge.
    Completed,
    /// Waiting for a challenge.
    Pending,
    /// Rejected.
    Failed,
}

/// Response of the authentications and finalize endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    /// Authentication id.
    pub id: String,
    /// Status.
    pub status: AuthenticationStatus,
    /// Base64 of a JSON [`SdkChallengePayload`], present when a challenge is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_challenge_payload: Option<String>,
    /// `Y`, `N`, `A`, `U`, `R` or `C`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_d_result: Option<String>,
    /// Electronic commerce indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eci: Option<u8>,
    /// Cardholder authentication verification value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cavv: Option<String>,
}

/// Decoded challenge payload handed to the vendor engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkChallengePayload {
    /// Vendor transaction id.
    pub transaction_id: String,
    /// Opaque payload for the engine.
    pub payload: String,
    /// Account the authentication belongs to.
    pub account_id: String,
}

/// Body of `POST .../authentications/{id}/finalize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeAuthenticationRequest {
    /// Server JWT returned by the engine after a successful challenge.
    pub jwt: String,
}
