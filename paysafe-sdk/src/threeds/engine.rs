//! Contract with the vendor 3-D Secure engine.
//!
//! The engine is an external SDK that fingerprints the device and renders
//! challenges. This crate only needs two things from it: turn a server JWT
//! into a session id, and run a challenge that eventually reports an outcome
//! through a [`ChallengeCompletion`].

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Failure reported by the engine during setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("3-D Secure engine error: {message}")]
pub struct EngineError {
    /// Engine-provided description.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Terminal result of a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// The cardholder passed. `server_jwt` is sent to the finalize endpoint.
    Succeeded {
        /// JWT issued by the engine for the finalize call.
        server_jwt: String,
    },
    /// The issuer or the engine rejected the cardholder.
    Failed {
        /// Engine-provided reason.
        reason: String,
    },
    /// The cardholder or the host abandoned the challenge.
    Cancelled,
}

/// Single-fire completion handle passed to [`AuthenticationEngine::continue_challenge`].
///
/// Completing consumes the handle, so an outcome is delivered at most once.
/// Dropping it without completing delivers [`ChallengeOutcome::Cancelled`].
/// Completing after the flow has ended is a no-op.
#[derive(Debug)]
pub struct ChallengeCompletion {
    sender: Option<oneshot::Sender<ChallengeOutcome>>,
}

impl ChallengeCompletion {
    /// Creates a completion handle and the receiver awaiting it.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<ChallengeOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender: Some(sender) }, receiver)
    }

    /// Delivers the outcome.
    pub fn complete(mut self, outcome: ChallengeOutcome) {
        self.send(outcome);
    }

    /// Delivers [`ChallengeOutcome::Succeeded`].
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn succeed(self, server_jwt: impl Into<String>) {
        self.complete(ChallengeOutcome::Succeeded { server_jwt: server_jwt.into() });
    }

    /// Delivers [`ChallengeOutcome::Failed`].
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn fail(self, reason: impl Into<String>) {
        self.complete(ChallengeOutcome::Failed { reason: reason.into() });
    }

    /// Delivers [`ChallengeOutcome::Cancelled`].
    pub fn cancel(self) {
        self.complete(ChallengeOutcome::Cancelled);
    }

    /// Whether nobody is waiting for the outcome any more.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.sender.as_ref().is_none_or(oneshot::Sender::is_closed)
    }

    fn send(&mut self, outcome: ChallengeOutcome) {
        if let Some(sender) = self.sender.take()
            && sender.send(outcome).is_err()
        {
            debug!("challenge outcome delivered after the flow ended, ignoring");
        }
    }
}

impl Drop for ChallengeCompletion {
    fn drop(&mut self) {
        self.send(ChallengeOutcome::Cancelled);
    }
}

/// Vendor 3-D Secure engine.
///
/// Implementations wrap the platform SDK. [`setup`](Self::setup) resolves once
/// the SDK has configured its session; [`continue_challenge`](Self::continue_challenge)
/// returns immediately and reports the outcome later through the completion.
pub trait AuthenticationEngine: Send + Sync {
    /// Configures a device session from the server-issued JWT and returns the
    /// session id to send with the authentication request.
    ///
    /// # Errors
    ///
    /// Returns error if the engine rejects the JWT or cannot initialize.
    fn setup<'a>(
        &'a self,
        jwt: &'a str,
    ) -> impl Future<Output = Result<String, EngineError>> + Send + 'a;

    /// Presents the challenge. The engine must eventually complete, or drop,
    /// `completion`.
    fn continue_challenge(&self, transaction_id: &str, payload: &str, completion: ChallengeCompletion);
}
