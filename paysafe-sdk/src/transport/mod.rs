//! Transport abstraction layer.
//!
//! This module provides the `Transport` trait the API client sends its
//! requests through, and the reqwest-backed [`HttpTransport`].
//!
//! # Architecture
//!
//! The transport layer separates protocol mechanics from gateway semantics:
//! - **Transport**: moves bytes (URL validation, headers, timeouts, pooling)
//! - **[`PaysafeClient`](crate::client::PaysafeClient)**: JSON encoding, authentication headers,
//!   error envelope translation
//!
//! A transport returns every HTTP answer as a [`TransportResponse`], including
//! non-2xx ones, so the client can decode the gateway's error envelope. Only
//! failures that produced no answer at all are [`TransportError`]s.
//!
//! # Examples
//!
//! ```rust,no_run
//! use paysafe_sdk::transport::{HttpTransport, RequestContext, Transport};
//!
//! # async fn example() -> Result<(), paysafe_sdk::transport::TransportError> {
//! let transport = HttpTransport::new();
//!
//! let ctx = RequestContext {
//!     base_url: "https://api.test.paysafe.com",
//!     path: "/paymenthub/v1/paymentmethods",
//!     query: vec![("currencyCode", "USD")],
//!     headers: vec![("Accept", "application/json")],
//! };
//!
//! let response = transport.get(ctx).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use thiserror::Error;

use crate::error::ErrorKind;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Request context for transport operations.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// Environment base URL (e.g., <https://api.paysafe.com>).
    pub base_url: &'a str,
    /// Request path (e.g., "/paymenthub/v1/paymentmethods").
    pub path: &'a str,
    /// Query string parameters.
    pub query: Vec<(&'a str, &'a str)>,
    /// HTTP headers to include.
    pub headers: Vec<(&'a str, &'a str)>,
}

/// Response from transport operations.
///
/// Contains the raw response body, HTTP status code, and response headers.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// First header with the given name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Failures that prevented a request from producing an HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The URL is malformed or not allowed (non-HTTPS, localhost).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request was rejected before sending (path traversal, header injection).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No answer within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was lost.
    #[error("connection failed: {0}")]
    NoConnection(String),

    /// The answer arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<TransportError> for ErrorKind {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::InvalidUrl(reason) | TransportError::InvalidRequest(reason) => {
                Self::InvalidUrl(reason)
            }
            TransportError::Timeout => Self::Timeout,
            TransportError::NoConnection(reason) => Self::NoConnection(reason),
            TransportError::Body(reason) => Self::InvalidResponse(reason),
        }
    }
}

/// Transport protocol abstraction.
///
/// Implemented by [`HttpTransport`] in production. Hosts and tests may provide
/// their own implementation (a recording stub, a platform HTTP stack).
///
/// # Security
///
/// [`HttpTransport`]:
/// - Validates base URLs (HTTPS only, no localhost)
/// - Rejects path traversal sequences
/// - Rejects control characters in headers
/// - Applies request and connect timeouts
pub trait Transport: Send + Sync {
    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or no answer arrives.
    /// Non-2xx answers are returned as responses.
    fn get<'a>(
        &'a self,
        ctx: RequestContext<'a>,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'a;

    /// Executes a POST request with a body.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or no answer arrives.
    /// Non-2xx answers are returned as responses.
    fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'a;

    /// Protocol name, used in log fields.
    fn protocol_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        let mut response = TransportResponse { status: 200, body: vec![], headers: vec![] };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 302;
        assert!(!response.is_success());
        response.status = 401;
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let response = TransportResponse {
            status: 200,
            body: vec![],
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        };
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Missing"), None);
    }

    #[test]
    fn test_transport_error_to_error_kind() {
        assert_eq!(ErrorKind::from(TransportError::Timeout), ErrorKind::Timeout);
        assert_eq!(
            ErrorKind::from(TransportError::NoConnection("refused".to_owned())),
            ErrorKind::NoConnection("refused".to_owned())
        );
        assert_eq!(
            ErrorKind::from(TransportError::InvalidRequest("traversal".to_owned())),
            ErrorKind::InvalidUrl("traversal".to_owned())
        );
        assert_eq!(
            ErrorKind::from(TransportError::Body("eof".to_owned())),
            ErrorKind::InvalidResponse("eof".to_owned())
        );
    }
}
