//! State machine over a single 3-D Secure authentication attempt.
//!
//! ```text
//! Uninitialized ──setup(jwt)──▶ SessionConfigured ──payload──▶ ChallengeStarted
//!                                      │                              │
//!                                      └──── no payload ────┐         │ outcome
//!                                                           ▼         ▼
//!                                                  Completed(Succeeded | Failed)
//! ```
//!
//! A call made in the wrong state fails without touching the engine or the
//! state. Any other failure leaves the bridge in `Completed(Failed)`, so an
//! abandoned attempt never stays pending.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::{
    challenge::decode_challenge_payload,
    engine::{AuthenticationEngine, ChallengeCompletion, ChallengeOutcome},
};
use crate::{
    error::{ErrorKind, PaysafeError, Result},
    models::{AuthenticationResponse, AuthenticationStatus},
};

/// Terminal result of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationResult {
    /// The cardholder was authenticated.
    Succeeded,
    /// Authentication failed, was cancelled or timed out.
    Failed,
}

/// Bridge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// No session yet.
    Uninitialized,
    /// The engine accepted the JWT.
    SessionConfigured,
    /// A challenge is on screen.
    ChallengeStarted,
    /// Terminal.
    Completed(AuthenticationResult),
}

/// How a successful attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// No challenge was needed; the authentication response was `COMPLETED`.
    Frictionless,
    /// A challenge succeeded; `server_jwt` must be sent to the finalize endpoint.
    Challenged {
        /// Engine-issued JWT for finalization.
        server_jwt: String,
    },
}

/// Drives one authentication attempt against an [`AuthenticationEngine`].
#[derive(Debug)]
pub struct ThreeDsBridge<'e, E> {
    engine: &'e E,
    state: BridgeState,
    challenge_timeout: Duration,
    correlation_id: String,
}

impl<'e, E: AuthenticationEngine> ThreeDsBridge<'e, E> {
    /// Creates a bridge in [`BridgeState::Uninitialized`].
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(
        engine: &'e E,
        challenge_timeout: Duration,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            state: BridgeState::Uninitialized,
            challenge_timeout,
            correlation_id: correlation_id.into(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BridgeState {
        self.state
    }

    /// Configures the engine session and returns the device session id.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AuthenticationFailed`] if called outside
    /// `Uninitialized` or if the engine rejects the JWT.
    #[instrument(skip(self, jwt), fields(correlation_id = %self.correlation_id))]
    pub async fn configure_session(&mut self, jwt: &str) -> Result<String> {
        self.expect_state(BridgeState::Uninitialized, "configure_session")?;

        match self.engine.setup(jwt).await {
            Ok(session_id) => {
                debug!("3-D Secure session configured");
                self.state = BridgeState::SessionConfigured;
                Ok(session_id)
            }
            Err(e) => {
                warn!(error = %e, "3-D Secure engine setup failed");
                self.fail(ErrorKind::AuthenticationFailed(e.to_string()))
            }
        }
    }

    /// Drives the attempt to a terminal state from an authentication response.
    ///
    /// With a challenge payload, the payload is decoded and handed to the engine
    /// exactly once, and the engine's outcome decides. Without one, the response
    /// status decides: only `COMPLETED` succeeds.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ChallengePayload`] if the payload cannot be decoded
    /// - [`ErrorKind::Timeout`] if the engine reports nothing within the challenge timeout
    /// - [`ErrorKind::AuthenticationFailed`] for failed, cancelled or out-of-order attempts
    #[instrument(
        skip(self, response),
        fields(
            correlation_id = %self.correlation_id,
            authentication_id = %response.id,
            status = ?response.status
        )
    )]
    pub async fn handle_authentication(
        &mut self,
        response: &AuthenticationResponse,
    ) -> Result<AuthenticationOutcome> {
        self.expect_state(BridgeState::SessionConfigured, "handle_authentication")?;

        let Some(encoded) = response.sdk_challenge_payload.as_deref() else {
            return match response.status {
                AuthenticationStatus::Completed => {
                    self.state = BridgeState::Completed(AuthenticationResult::Succeeded);
                    Ok(AuthenticationOutcome::Frictionless)
                }
                AuthenticationStatus::Pending => self.fail(ErrorKind::AuthenticationFailed(
                    "authentication pending without a challenge".to_owned(),
                )),
                AuthenticationStatus::Failed => self.fail(ErrorKind::AuthenticationFailed(
                    format!("authentication {} failed", response.id),
                )),
            };
        };

        let payload = match decode_challenge_payload(encoded, &self.correlation_id) {
            Ok(payload) => payload,
            Err(e) => {
                self.state = BridgeState::Completed(AuthenticationResult::Failed);
                return Err(e);
            }
        };

        let (completion, receiver) = ChallengeCompletion::channel();
        self.state = BridgeState::ChallengeStarted;
        debug!(transaction_id = %payload.transaction_id, "presenting challenge");
        self.engine.continue_challenge(&payload.transaction_id, &payload.payload, completion);

        let outcome = match tokio::time::timeout(self.challenge_timeout, receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => ChallengeOutcome::Cancelled,
            Err(_) => {
                warn!(timeout = ?self.challenge_timeout, "challenge timed out");
                return self.fail(ErrorKind::Timeout);
            }
        };

        match outcome {
            ChallengeOutcome::Succeeded { server_jwt } => {
                self.state = BridgeState::Completed(AuthenticationResult::Succeeded);
                Ok(AuthenticationOutcome::Challenged { server_jwt })
            }
            ChallengeOutcome::Failed { reason } => {
                self.fail(ErrorKind::AuthenticationFailed(format!("challenge failed: {reason}")))
            }
            ChallengeOutcome::Cancelled => {
                self.fail(ErrorKind::AuthenticationFailed("challenge cancelled".to_owned()))
            }
        }
    }

    /// Ends a non-terminal attempt as failed. No-op once completed.
    pub fn abandon(&mut self) {
        if !matches!(self.state, BridgeState::Completed(_)) {
            debug!(correlation_id = %self.correlation_id, "authentication abandoned");
            self.state = BridgeState::Completed(AuthenticationResult::Failed);
        }
    }

    fn expect_state(&self, expected: BridgeState, operation: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PaysafeError::new(
                ErrorKind::AuthenticationFailed(format!(
                    "{operation} called in state {:?}",
                    self.state
                )),
                self.correlation_id.clone(),
            ))
        }
    }

    fn fail<T>(&mut self, kind: ErrorKind) -> Result<T> {
        self.state = BridgeState::Completed(AuthenticationResult::Failed);
        Err(PaysafeError::new(kind, self.correlation_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use base64::{Engine, engine::general_purpose::STANDARD};

    use super::*;
    use crate::threeds::EngineError;

    /// What the test engine does with a challenge.
    #[derive(Debug, Clone)]
    enum Script {
        Succeed,
        Fail,
        Abandon,
        Hold,
    }

    #[derive(Debug)]
    struct ScriptedEngine {
        script: Script,
        reject_setup: bool,
        challenges: AtomicUsize,
        held: Mutex<Vec<ChallengeCompletion>>,
    }

    impl ScriptedEngine {
        fn new(script: Script) -> Self {
            Self {
                script,
                reject_setup: false,
                challenges: AtomicUsize::new(0),
                held: Mutex::new(Vec::new()),
            }
        }
    }

    impl AuthenticationEngine for ScriptedEngine {
        async fn setup<'a>(&'a self, jwt: &'a str) -> std::result::Result<String, EngineError> {
            if self.reject_setup {
                Err(EngineError::new("bad jwt"))
            } else {
                Ok(format!("session-for-{jwt}"))
            }
        }

        fn continue_challenge(&self, _: &str, _: &str, completion: ChallengeCompletion) {
            self.challenges.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Succeed => completion.succeed("server-jwt"),
                Script::Fail => completion.fail("issuer declined"),
                Script::Abandon => drop(completion),
                Script::Hold => self.held.lock().unwrap().push(completion),
            }
        }
    }

    fn response(status: AuthenticationStatus, payload: Option<String>) -> AuthenticationResponse {
        AuthenticationResponse {
            id: "auth-1".to_owned(),
            status,
            sdk_challenge_payload: payload,
            three_d_result: None,
            eci: None,
            cavv: None,
        }
    }

    fn valid_payload() -> String {
        STANDARD.encode(r#"{"transactionId":"txn-1","payload":"opaque","accountId":"1001"}"#)
    }

    async fn configured(engine: &ScriptedEngine) -> ThreeDsBridge<'_, ScriptedEngine> {
        let mut bridge = ThreeDsBridge::new(engine, Duration::from_secs(5), "corr-1");
        assert_eq!(bridge.state(), BridgeState::Uninitialized);
        let session = bridge.configure_session("jwt").await.unwrap();
        assert_eq!(session, "session-for-jwt");
        assert_eq!(bridge.state(), BridgeState::SessionConfigured);
        bridge
    }

    #[tokio::test]
    async fn test_frictionless_completed() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        let outcome = bridge
            .handle_authentication(&response(AuthenticationStatus::Completed, None))
            .await
            .unwrap();
        assert_eq!(outcome, AuthenticationOutcome::Frictionless);
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Succeeded));
        assert_eq!(engine.challenges.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_failed_without_payload() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        let err = bridge
            .handle_authentication(&response(AuthenticationStatus::Failed, None))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::AuthenticationFailed(_)));
        assert_eq!(err.correlation_id, "corr-1");
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
    }

    #[tokio::test]
    async fn test_pending_without_payload_fails() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        assert!(
            bridge
                .handle_authentication(&response(AuthenticationStatus::Pending, None))
                .await
                .is_err()
        );
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
    }

    #[tokio::test]
    async fn test_challenge_succeeds_exactly_once() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        let outcome = bridge
            .handle_authentication(&response(AuthenticationStatus::Pending, Some(valid_payload())))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AuthenticationOutcome::Challenged { server_jwt: "server-jwt".to_owned() }
        );
        assert_eq!(engine.challenges.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Succeeded));
    }

    #[tokio::test]
    async fn test_challenge_failed_and_dropped() {
        for script in [Script::Fail, Script::Abandon] {
            let engine = ScriptedEngine::new(script);
            let mut bridge = configured(&engine).await;
            let err = bridge
                .handle_authentication(&response(
                    AuthenticationStatus::Pending,
                    Some(valid_payload()),
                ))
                .await
                .unwrap_err();
            assert!(matches!(err.kind, ErrorKind::AuthenticationFailed(_)));
            assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_challenge_timeout() {
        let engine = ScriptedEngine::new(Script::Hold);
        let mut bridge = configured(&engine).await;
        let err = bridge
            .handle_authentication(&response(AuthenticationStatus::Pending, Some(valid_payload())))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));

        // The engine answering late is harmless.
        let late = engine.held.lock().unwrap().pop().unwrap();
        assert!(late.is_abandoned());
        late.succeed("too-late");
    }

    #[tokio::test]
    async fn test_bad_payload_is_terminal() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        let err = bridge
            .handle_authentication(&response(
                AuthenticationStatus::Pending,
                Some("%%%".to_owned()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ChallengePayload(_)));
        assert_eq!(engine.challenges.load(Ordering::SeqCst), 0);
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
    }

    #[tokio::test]
    async fn test_out_of_order_calls_rejected() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = ThreeDsBridge::new(&engine, Duration::from_secs(5), "c");
        let err = bridge
            .handle_authentication(&response(AuthenticationStatus::Completed, None))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::AuthenticationFailed(msg) if msg.contains("Uninitialized")));
        assert_eq!(bridge.state(), BridgeState::Uninitialized);

        bridge.configure_session("jwt").await.unwrap();
        assert!(bridge.configure_session("jwt").await.is_err());
    }

    #[tokio::test]
    async fn test_setup_rejected() {
        let mut engine = ScriptedEngine::new(Script::Succeed);
        engine.reject_setup = true;
        let mut bridge = ThreeDsBridge::new(&engine, Duration::from_secs(5), "c");
        let err = bridge.configure_session("jwt").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::AuthenticationFailed(msg) if msg.contains("bad jwt")));
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
    }

    #[tokio::test]
    async fn test_abandon() {
        let engine = ScriptedEngine::new(Script::Succeed);
        let mut bridge = configured(&engine).await;
        bridge.abandon();
        assert_eq!(bridge.state(), BridgeState::Completed(AuthenticationResult::Failed));
        assert!(
            bridge
                .handle_authentication(&response(AuthenticationStatus::Completed, None))
                .await
                .is_err()
        );
    }
}
