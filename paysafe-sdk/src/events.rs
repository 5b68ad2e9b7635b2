//! Lifecycle events and sensitive-data redaction.
//!
//! Every significant step of a flow (success, validation failure, network
//! failure) is reported to an [`EventSink`] as an [`SdkEvent`]. Reporting is a
//! notification only: sinks return nothing and a sink that fails internally
//! must never change the outcome of the flow.
//!
//! Messages are passed through [`redact_sensitive`] when the event is built,
//! so no sink ever sees a full card number or CVV.

use std::{fmt, time::SystemTime};

use serde::Serialize;

/// Tag of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A tokenize flow started.
    FlowStarted,
    /// Tokenize options failed client-side validation.
    ValidationFailed,
    /// Payment methods were fetched and an account matched.
    PaymentMethodResolved,
    /// A payment handle was created.
    HandleCreated,
    /// A payment handle was re-read after authentication.
    HandleRefreshed,
    /// The 3-D Secure engine accepted the session JWT.
    ThreeDsSessionConfigured,
    /// A challenge was handed to the 3-D Secure engine.
    ChallengeStarted,
    /// 3-D Secure authentication reached a terminal state.
    AuthenticationCompleted,
    /// A wallet adapter produced a result for the host.
    WalletResult,
    /// A request failed without an HTTP answer.
    NetworkFailure,
    /// The gateway answered with an error.
    ApiError,
    /// A flow delivered a payment handle.
    FlowSucceeded,
    /// A flow ended with an error.
    FlowFailed,
}

impl EventType {
    /// Whether the event reports a failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::ValidationFailed | Self::NetworkFailure | Self::ApiError | Self::FlowFailed)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FlowStarted => "flow_started",
            Self::ValidationFailed => "validation_failed",
            Self::PaymentMethodResolved => "payment_method_resolved",
            Self::HandleCreated => "handle_created",
            Self::HandleRefreshed => "handle_refreshed",
            Self::ThreeDsSessionConfigured => "three_ds_session_configured",
            Self::ChallengeStarted => "challenge_started",
            Self::AuthenticationCompleted => "authentication_completed",
            Self::WalletResult => "wallet_result",
            Self::NetworkFailure => "network_failure",
            Self::ApiError => "api_error",
            Self::FlowSucceeded => "flow_succeeded",
            Self::FlowFailed => "flow_failed",
        };
        f.write_str(s)
    }
}

/// A lifecycle event.
///
/// # Examples
///
/// ```
/// use paysafe_sdk::events::{EventType, SdkEvent};
///
/// let event = SdkEvent::new(
///     EventType::ValidationFailed,
///     "corr-1",
///     "rejected card 4111 1111 1111 1111",
/// );
/// assert_eq!(event.message, "rejected card XXXX XXXX XXXX 1111");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SdkEvent {
    /// When the event was built.
    pub timestamp: SystemTime,
    /// What happened.
    pub event_type: EventType,
    /// Flow the event belongs to.
    pub correlation_id: String,
    /// Human-readable, redacted description.
    pub message: String,
}

impl SdkEvent {
    /// Builds an event, redacting the message.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(
        event_type: EventType,
        correlation_id: impl Into<String>,
        message: impl AsRef<str>,
    ) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            correlation_id: correlation_id.into(),
            message: redact_sensitive(message.as_ref()),
        }
    }
}

/// Receiver of lifecycle events.
pub trait EventSink: Send + Sync {
    /// Records one event. Must not panic and must not block for long.
    fn record(&self, event: &SdkEvent);
}

/// Sink that emits events on the `paysafe::events` tracing target.
///
/// Failure events are logged at `WARN`, everything else at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: &SdkEvent) {
        if event.event_type.is_failure() {
            tracing::warn!(
                target: "paysafe::events",
                event_type = %event.event_type,
                correlation_id = %event.correlation_id,
                "{}",
                event.message
            );
        } else {
            tracing::info!(
                target: "paysafe::events",
                event_type = %event.event_type,
                correlation_id = %event.correlation_id,
                "{}",
                event.message
            );
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &SdkEvent) {}
}

/// Masks card numbers and CVV codes in free text.
///
/// # Pattern Matching
///
/// - Card numbers (12-19 digits, optionally grouped by spaces or dashes): every
///   digit but the last four becomes `X`, separators are kept
/// - CVV codes (3-4 digits after `cvv`, `cvv2`, `cvc` or `cid`, case-insensitive,
///   with optional `:`, `=`, quotes or spaces in between): digits become `X`
///
/// # Examples
///
/// ```
/// use paysafe_sdk::events::redact_sensitive;
///
/// assert_eq!(redact_sensitive("card 4111-1111-1111-1111"), "card XXXX-XXXX-XXXX-1111");
/// assert_eq!(redact_sensitive("CVV: 123"), "CVV: XXX");
/// assert_eq!(redact_sensitive("amount 1000 USD"), "amount 1000 USD");
/// ```
#[must_use]
pub fn redact_sensitive(input: &str) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    mask_card_numbers(&mut chars);
    mask_cvv(&mut chars);
    chars.into_iter().collect()
}

fn mask_card_numbers(chars: &mut [char]) {
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut digits = Vec::new();
        let mut j = i;
        while j < chars.len() {
            if chars[j].is_ascii_digit() {
                digits.push(j);
                j += 1;
            } else if matches!(chars[j], ' ' | '-')
                && chars.get(j + 1).is_some_and(char::is_ascii_digit)
            {
                j += 1;
            } else {
                break;
            }
        }

        if (12..=19).contains(&digits.len()) {
            for &pos in &digits[..digits.len() - 4] {
                chars[pos] = 'X';
            }
        }
        i = j;
    }
}

const CVV_KEYWORDS: [&str; 4] = ["cvv2", "cvv", "cvc", "cid"];

fn mask_cvv(chars: &mut [char]) {
    let lower: Vec<char> = chars.iter().map(char::to_ascii_lowercase).collect();
    let mut i = 0;
    while i < chars.len() {
        let Some(keyword) = CVV_KEYWORDS.iter().find(|k| starts_with_at(&lower, i, k)) else {
            i += 1;
            continue;
        };

        let mut j = i + keyword.len();
        while j < chars.len() && matches!(chars[j], ':' | '=' | ' ' | '"') {
            j += 1;
        }
        let digits_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if (3..=4).contains(&(j - digits_start)) {
            for c in &mut chars[digits_start..j] {
                *c = 'X';
            }
        }
        i = j;
    }
}

fn starts_with_at(chars: &[char], at: usize, keyword: &str) -> bool {
    keyword.chars().enumerate().all(|(k, c)| chars.get(at + k) == Some(&c))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_redact_card_numbers() {
        let inputs = [
            ("Card: 4111-1111-1111-1111", "Card: XXXX-XXXX-XXXX-1111"),
            ("Card: 4111 1111 1111 1111", "Card: XXXX XXXX XXXX 1111"),
            ("Card: 4111111111111111", "Card: XXXXXXXXXXXX1111"),
            ("Amex 378282246310005 ok", "Amex XXXXXXXXXXX0005 ok"),
        ];

        for (input, expected) in &inputs {
            assert_eq!(&redact_sensitive(input), expected, "Failed to redact: {input}");
        }
    }

    #[test]
    fn test_short_numbers_untouched() {
        for input in ["amount 1000", "account 1001456650", "2024-01-15 12:00", "code 5279"] {
            assert_eq!(redact_sensitive(input), input);
        }
    }

    #[test]
    fn test_redact_cvv() {
        assert_eq!(redact_sensitive("CVV: 123"), "CVV: XXX");
        assert_eq!(redact_sensitive("cvv2=1234"), "cvv2=XXXX");
        assert_eq!(redact_sensitive(r#"{"cvv":"987"}"#), r#"{"cvv":"XXX"}"#);
        assert_eq!(redact_sensitive("cid 55"), "cid 55");
    }

    #[test]
    fn test_redact_non_ascii_input() {
        assert_eq!(redact_sensitive("carte № 4111111111111111 é"), "carte № XXXXXXXXXXXX1111 é");
    }

    #[test]
    fn test_event_type_failure_classification() {
        assert!(EventType::ApiError.is_failure());
        assert!(EventType::FlowFailed.is_failure());
        assert!(!EventType::HandleCreated.is_failure());
        assert_eq!(EventType::ThreeDsSessionConfigured.to_string(), "three_ds_session_configured");
    }

    #[derive(Default)]
    struct CollectingSink(Mutex<Vec<SdkEvent>>);

    impl EventSink for CollectingSink {
        fn record(&self, event: &SdkEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_sinks_receive_redacted_events() {
        let sink = CollectingSink::default();
        let event = SdkEvent::new(EventType::FlowFailed, "corr-7", "cvc: 321");
        sink.record(&event);
        TracingEventSink.record(&event);
        NoopEventSink.record(&event);

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].correlation_id, "corr-7");
        assert_eq!(events[0].message, "cvc: XXX");
    }
}
