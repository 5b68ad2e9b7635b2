//! Backend error envelope and code translation tables.
//!
//! The gateway reports failures as
//! `{"error": {"code": "<string>", "message": "<string>"}}`. The payment hub and
//! the 3-D Secure service share most of their code vocabulary but not all of
//! it, so each has its own [`ErrorTable`]. Keeping them as two separate tables
//! means a mapping added for one service can never leak into the other.
//!
//! # Examples
//!
//! ```
//! use paysafe_sdk::{
//!     api_error::{GATEWAY_ERRORS, THREE_DS_ERRORS},
//!     error::ErrorKind,
//! };
//!
//! let err = GATEWAY_ERRORS.translate("5279", "Invalid credentials", "corr-1");
//! assert_eq!(err.kind, ErrorKind::InvalidApiKey);
//!
//! // 5003 only has a dedicated meaning for the 3-D Secure service.
//! let err = THREE_DS_ERRORS.translate("5003", "Amount invalid", "corr-2");
//! assert_eq!(err.kind, ErrorKind::InvalidAmount);
//! let err = GATEWAY_ERRORS.translate("5003", "Amount invalid", "corr-3");
//! assert!(matches!(err.kind, ErrorKind::GenericApi { code: 5003, .. }));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ErrorKind, PaysafeError};

/// Wire envelope for backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error body.
    pub error: ApiErrorBody,
}

/// Backend error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Backend error code. Always a string on the wire, usually numeric.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Extra detail lines, when the backend sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    /// Per-field validation failures, when the backend sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field path.
    pub field: String,
    /// What is wrong with it.
    pub error: String,
}

impl ApiErrorBody {
    /// Message enriched with the first detail or field error, matching what the
    /// gateway shows in its own dashboards.
    #[must_use]
    pub fn reason(&self) -> String {
        let detail = self.details.as_ref().and_then(|d| d.first());
        let field = self.field_errors.as_ref().and_then(|f| f.first());
        match (detail, field) {
            (Some(detail), Some(field)) => format!("{detail}, {}", field.error),
            (Some(detail), None) => detail.clone(),
            (None, Some(field)) => format!("{}: {}", field.field, field.error),
            (None, None) => self.message.clone(),
        }
    }
}

/// Kinds a backend code can be mapped to.
///
/// Only the kinds the backend actually reports by code appear here; the rest
/// of [`ErrorKind`] is produced client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedKind {
    /// Maps to [`ErrorKind::InvalidApiKey`].
    InvalidApiKey,
    /// Maps to [`ErrorKind::InvalidCurrencyCode`].
    InvalidCurrencyCode,
    /// Maps to [`ErrorKind::InvalidAmount`].
    InvalidAmount,
    /// Maps to [`ErrorKind::InvalidCountry`].
    InvalidCountry,
}

impl From<MappedKind> for ErrorKind {
    fn from(kind: MappedKind) -> Self {
        match kind {
            MappedKind::InvalidApiKey => Self::InvalidApiKey,
            MappedKind::InvalidCurrencyCode => Self::InvalidCurrencyCode,
            MappedKind::InvalidAmount => Self::InvalidAmount,
            MappedKind::InvalidCountry => Self::InvalidCountry,
        }
    }
}

/// A named, static code → kind lookup table.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTable {
    name: &'static str,
    entries: &'static [(&'static str, MappedKind)],
}

/// Payment hub (`/paymenthub`) error codes.
pub static GATEWAY_ERRORS: ErrorTable = ErrorTable {
    name: "gateway",
    entries: &[("5279", MappedKind::InvalidApiKey), ("5001", MappedKind::InvalidCurrencyCode)],
};

/// 3-D Secure service (`/threedsecure`) error codes.
pub static THREE_DS_ERRORS: ErrorTable = ErrorTable {
    name: "three_ds",
    entries: &[
        ("5279", MappedKind::InvalidApiKey),
        ("5001", MappedKind::InvalidCurrencyCode),
        ("5003", MappedKind::InvalidAmount),
        ("5016", MappedKind::InvalidCountry),
    ],
};

impl ErrorTable {
    /// Table name, used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Looks up a code without building an error.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<MappedKind> {
        self.entries.iter().find(|(known, _)| *known == code).map(|(_, kind)| *kind)
    }

    /// Codes this table maps to a dedicated kind.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    /// Translates a backend code into a domain error.
    ///
    /// Total and deterministic: unknown codes become [`ErrorKind::GenericApi`]
    /// keeping the original string, its integer value (0 when not numeric) and
    /// the message.
    pub fn translate(&self, code: &str, message: &str, correlation_id: &str) -> PaysafeError {
        let kind = self.lookup(code).map_or_else(
            || ErrorKind::GenericApi {
                code: code.parse().unwrap_or(0),
                raw_code: code.to_owned(),
                message: message.to_owned(),
            },
            ErrorKind::from,
        );
        PaysafeError::new(kind, correlation_id)
    }

    /// Translates a decoded envelope body.
    ///
    /// The error keeps the backend message; details and field errors are only
    /// logged.
    pub fn translate_body(&self, body: &ApiErrorBody, correlation_id: &str) -> PaysafeError {
        if body.details.is_some() || body.field_errors.is_some() {
            debug!(table = self.name, code = %body.code, reason = %body.reason(), "gateway error details");
        }
        self.translate(&body.code, &body.message, correlation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_envelope() {
        let json = r#"{"error":{"code":"9205","message":"Encoding error."}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.code, "9205");
        assert_eq!(envelope.error.message, "Encoding error.");
        assert!(envelope.error.details.is_none());
        assert!(envelope.error.field_errors.is_none());
    }

    #[test]
    fn test_decode_error_envelope_with_field_errors() {
        let json = r#"{
            "error": {
                "code": "5068",
                "message": "Field error(s)",
                "details": ["Invalid fields"],
                "fieldErrors": [{"field": "card.cardExpiry.year", "error": "must be >= 2024"}],
                "links": [{"rel": "errorinfo", "href": "https://developer.paysafe.com"}]
            }
        }"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.reason(), "Invalid fields, must be >= 2024");

        let err = GATEWAY_ERRORS.translate_body(&envelope.error, "corr-5068");
        assert!(matches!(
            err.kind,
            ErrorKind::GenericApi { code: 5068, ref message, .. } if message == "Field error(s)"
        ));
    }

    #[test]
    fn test_translate_body_keeps_backend_message_over_details() {
        let json = r#"{"error":{"code":"3009","message":"Your request has been declined by the issuing bank.","details":["Insufficient funds"]}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).unwrap();
        let err = GATEWAY_ERRORS.translate_body(&envelope.error, "corr-3009");
        assert_eq!(
            err.kind,
            ErrorKind::GenericApi {
                code: 3009,
                raw_code: "3009".to_owned(),
                message: "Your request has been declined by the issuing bank.".to_owned(),
            }
        );
        assert_eq!(err.correlation_id, "corr-3009");
    }

    #[test]
    fn test_reason_falls_back_to_message() {
        let body = ApiErrorBody {
            code: "1".to_owned(),
            message: "Something".to_owned(),
            details: None,
            field_errors: None,
        };
        assert_eq!(body.reason(), "Something");
    }

    #[test]
    fn test_gateway_known_codes() {
        let err = GATEWAY_ERRORS.translate("5279", "bad key", "corr-1");
        assert_eq!(err.kind, ErrorKind::InvalidApiKey);
        assert_eq!(err.correlation_id, "corr-1");

        let err = GATEWAY_ERRORS.translate("5001", "bad currency", "corr-2");
        assert_eq!(err.kind, ErrorKind::InvalidCurrencyCode);
    }

    #[test]
    fn test_three_ds_specific_codes() {
        assert_eq!(THREE_DS_ERRORS.translate("5003", "m", "c").kind, ErrorKind::InvalidAmount);
        assert_eq!(THREE_DS_ERRORS.translate("5016", "m", "c").kind, ErrorKind::InvalidCountry);
    }

    #[test]
    fn test_three_ds_codes_do_not_leak_into_gateway() {
        for code in ["5003", "5016"] {
            assert!(GATEWAY_ERRORS.lookup(code).is_none(), "{code} must stay 3DS-only");
            let err = GATEWAY_ERRORS.translate(code, "msg", "c");
            assert!(matches!(err.kind, ErrorKind::GenericApi { .. }));
        }
    }

    #[test]
    fn test_unknown_numeric_code() {
        let err = GATEWAY_ERRORS.translate("3009", "Your request has been declined", "corr-9");
        assert_eq!(
            err.kind,
            ErrorKind::GenericApi {
                code: 3009,
                raw_code: "3009".to_owned(),
                message: "Your request has been declined".to_owned(),
            }
        );
        assert_eq!(err.correlation_id, "corr-9");
    }

    #[test]
    fn test_unknown_non_numeric_code_keeps_raw_string() {
        let err = THREE_DS_ERRORS.translate("E-TIMEOUT", "upstream", "c");
        assert_eq!(
            err.kind,
            ErrorKind::GenericApi {
                code: 0,
                raw_code: "E-TIMEOUT".to_owned(),
                message: "upstream".to_owned(),
            }
        );
    }

    #[test]
    fn test_padded_code_is_not_numeric() {
        let err = GATEWAY_ERRORS.translate(" 42 ", "padded", "c");
        assert_eq!(
            err.kind,
            ErrorKind::GenericApi {
                code: 0,
                raw_code: " 42 ".to_owned(),
                message: "padded".to_owned(),
            }
        );
    }

    #[test]
    fn test_empty_code() {
        let err = GATEWAY_ERRORS.translate("", "", "c");
        assert!(matches!(err.kind, ErrorKind::GenericApi { code: 0, .. }));
    }

    #[test]
    fn test_table_names_and_codes() {
        assert_eq!(GATEWAY_ERRORS.name(), "gateway");
        assert_eq!(THREE_DS_ERRORS.name(), "three_ds");
        assert_eq!(GATEWAY_ERRORS.codes().count(), 2);
        assert_eq!(THREE_DS_ERRORS.codes().count(), 4);
    }
}
