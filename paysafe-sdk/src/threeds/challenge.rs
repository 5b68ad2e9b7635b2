//! Challenge payload decoding.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    error::{ErrorKind, PaysafeError, Result},
    models::SdkChallengePayload,
};

/// Decodes the `sdkChallengePayload` field of an authentication response:
/// standard-alphabet base64 wrapping a JSON [`SdkChallengePayload`].
///
/// # Errors
///
/// Returns [`ErrorKind::ChallengePayload`] if either layer fails to decode.
///
/// # Examples
///
/// ```
/// use base64::{Engine, engine::general_purpose::STANDARD};
/// use paysafe_sdk::threeds::decode_challenge_payload;
///
/// let encoded = STANDARD.encode(r#"{"transactionId":"t-1","payload":"p","accountId":"1001"}"#);
/// let payload = decode_challenge_payload(&encoded, "corr-1").unwrap();
/// assert_eq!(payload.transaction_id, "t-1");
/// ```
pub fn decode_challenge_payload(encoded: &str, correlation_id: &str) -> Result<SdkChallengePayload> {
    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
        PaysafeError::new(ErrorKind::ChallengePayload(format!("invalid base64: {e}")), correlation_id)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        PaysafeError::new(ErrorKind::ChallengePayload(format!("invalid JSON: {e}")), correlation_id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_payload() {
        let encoded = STANDARD.encode(
            r#"{"transactionId":"txn-9","payload":"eyJhY3NVcmwiOiJodHRwcyJ9","accountId":"1001456650"}"#,
        );
        let payload = decode_challenge_payload(&encoded, "c").unwrap();
        assert_eq!(payload.transaction_id, "txn-9");
        assert_eq!(payload.payload, "eyJhY3NVcmwiOiJodHRwcyJ9");
        assert_eq!(payload.account_id, "1001456650");
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_challenge_payload("***not base64***", "corr-3").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ChallengePayload(msg) if msg.contains("base64")));
        assert_eq!(err.correlation_id, "corr-3");
    }

    #[test]
    fn test_invalid_json() {
        let encoded = STANDARD.encode("not json");
        let err = decode_challenge_payload(&encoded, "c").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ChallengePayload(msg) if msg.contains("JSON")));
    }

    #[test]
    fn test_missing_fields() {
        let encoded = STANDARD.encode(r#"{"transactionId":"t"}"#);
        assert!(matches!(
            decode_challenge_payload(&encoded, "c").unwrap_err().kind,
            ErrorKind::ChallengePayload(_)
        ));
    }
}
