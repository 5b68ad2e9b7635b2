//! Error types for the Paysafe client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error is a
//! [`PaysafeError`]: a domain [`ErrorKind`] paired with the correlation id of the
//! flow that produced it. The correlation id is what support teams use to find
//! the flow in logs, so it is attached to every error, including ones raised
//! before any request left the device.
//!
//! # Error Categories
//!
//! - **Gateway errors** ([`ErrorKind::InvalidApiKey`], [`ErrorKind::InvalidCurrencyCode`],
//!   [`ErrorKind::GenericApi`], ...): backend error codes translated through the tables in
//!   [`crate::api_error`]
//! - **Network errors** ([`ErrorKind::Timeout`], [`ErrorKind::NoConnection`],
//!   [`ErrorKind::InvalidUrl`]): transport failures
//! - **Codec errors** ([`ErrorKind::EncodingError`], [`ErrorKind::InvalidResponse`],
//!   [`ErrorKind::ChallengePayload`]): JSON or base64 failures
//! - **Flow errors** ([`ErrorKind::AuthenticationFailed`], [`ErrorKind::AccountNotConfigured`],
//!   [`ErrorKind::InvalidParameter`]): the flow cannot continue
//!
//! # Examples
//!
//! ```
//! use paysafe_sdk::error::{ErrorKind, PaysafeError, Result};
//!
//! fn require_currency(code: &str, correlation_id: &str) -> Result<()> {
//!     if code.len() != 3 {
//!         return Err(PaysafeError::new(ErrorKind::InvalidCurrencyCode, correlation_id));
//!     }
//!     Ok(())
//! }
//!
//! let err = require_currency("US", "corr-1").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::InvalidCurrencyCode);
//! assert_eq!(err.correlation_id, "corr-1");
//! ```

use thiserror::Error;

/// Result type alias for client operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, PaysafeError>;

/// Closed set of failure kinds a flow can end with.
///
/// None of these are retried by this crate. Hosts that want to retry can ask
/// [`PaysafeError::is_retryable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The API key was rejected by the gateway or is not a valid
    /// base64-encoded `username:password` pair.
    #[error("invalid API key")]
    InvalidApiKey,

    /// The currency code is malformed or not supported for the account.
    #[error("invalid currency code")]
    InvalidCurrencyCode,

    /// The amount is zero, out of range, or rejected by the 3-D Secure service.
    #[error("invalid amount")]
    InvalidAmount,

    /// The country code is malformed or rejected by the 3-D Secure service.
    #[error("invalid country")]
    InvalidCountry,

    /// A request body could not be encoded as JSON.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// The request URL could not be built or is not allowed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The gateway did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The gateway could not be reached.
    #[error("no connection: {0}")]
    NoConnection(String),

    /// The gateway answered with a body this client cannot decode.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A gateway error code with no dedicated kind.
    ///
    /// `code` is the backend code parsed as an integer (0 when it is not
    /// numeric); `raw_code` keeps the original string for diagnostics.
    #[error("API error {raw_code}: {message}")]
    GenericApi {
        /// Backend code as an integer, 0 if unparsable.
        code: i64,
        /// Backend code exactly as received.
        raw_code: String,
        /// Backend message.
        message: String,
    },

    /// A 3-D Secure challenge payload could not be decoded.
    #[error("invalid challenge payload: {0}")]
    ChallengePayload(String),

    /// A tokenize option failed client-side validation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The merchant account has no payment method of the requested type
    /// for the requested currency.
    #[error("account {account_id} is not configured for {payment_type} in {currency_code}")]
    AccountNotConfigured {
        /// Requested merchant account.
        account_id: String,
        /// Requested payment type.
        payment_type: String,
        /// Requested currency.
        currency_code: String,
    },

    /// 3-D Secure authentication ended without success (failure, cancellation
    /// or abandonment).
    #[error("3-D Secure authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The SDK configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Domain error returned to the host.
///
/// This type implements `#[must_use]` to ensure errors are not silently ignored.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (correlation id: {correlation_id})")]
pub struct PaysafeError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Identifier of the flow that failed.
    pub correlation_id: String,
}

impl PaysafeError {
    /// Creates an error for the given flow.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(kind: ErrorKind, correlation_id: impl Into<String>) -> Self {
        Self { kind, correlation_id: correlation_id.into() }
    }

    /// Creates a configuration error. Configuration is loaded before any flow
    /// exists, so these carry an empty correlation id.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration(reason.into()), String::new())
    }

    /// Returns true for failures a host may reasonably retry (timeouts and
    /// lost connections). The client itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout | ErrorKind::NoConnection(_))
    }
}
