//! Per-flow 3-D Secure options.

use serde::Serialize;

use crate::error::{ErrorKind, PaysafeError, Result};

/// Requestor challenge preference sent with the handle and the authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengePreference {
    /// Let the issuer decide.
    #[default]
    NoPreference,
    /// Prefer frictionless.
    NoChallengeRequested,
    /// Prefer a challenge.
    ChallengeRequested,
    /// Require a challenge.
    ChallengeMandated,
}

impl ChallengePreference {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPreference => "NO_PREFERENCE",
            Self::NoChallengeRequested => "NO_CHALLENGE_REQUESTED",
            Self::ChallengeRequested => "CHALLENGE_REQUESTED",
            Self::ChallengeMandated => "CHALLENGE_MANDATED",
        }
    }
}

/// 3-D Secure options of a card flow.
///
/// Presence of these options on a card flow is what turns 3-D Secure on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreeDsOptions {
    /// Account the authentication runs on. Defaults to the flow's account.
    pub account_id: Option<String>,
    /// First six digits of the card. Defaults to the card's own BIN.
    pub card_bin: Option<String>,
    /// Challenge preference.
    pub challenge_preference: ChallengePreference,
}

impl ThreeDsOptions {
    /// Resolves defaults against the flow and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`] if the account id is empty or
    /// the BIN is not six digits.
    pub fn resolve(
        &self,
        flow_account_id: &str,
        card_bin: Option<&str>,
        correlation_id: &str,
    ) -> Result<ResolvedThreeDsOptions> {
        let account_id = self.account_id.as_deref().unwrap_or(flow_account_id);
        if account_id.is_empty() {
            return Err(PaysafeError::new(
                ErrorKind::InvalidParameter("threeDs.accountId is empty".to_owned()),
                correlation_id,
            ));
        }
        let bin = self.card_bin.as_deref().or(card_bin).unwrap_or_default();
        if bin.len() != 6 || !bin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaysafeError::new(
                ErrorKind::InvalidParameter("threeDs.cardBin must be six digits".to_owned()),
                correlation_id,
            ));
        }
        Ok(ResolvedThreeDsOptions {
            account_id: account_id.to_owned(),
            card_bin: bin.to_owned(),
            challenge_preference: self.challenge_preference,
        })
    }
}

/// [`ThreeDsOptions`] with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedThreeDsOptions {
    /// Account the authentication runs on.
    pub account_id: String,
    /// First six digits of the card.
    pub card_bin: String,
    /// Challenge preference.
    pub challenge_preference: ChallengePreference,
}
