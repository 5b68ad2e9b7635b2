//! SDK configuration.
//!
//! One [`SdkConfig`] is loaded at startup and shared read-only (behind an
//! [`Arc`](std::sync::Arc)) by every client and tokenizer built from it.
//!
//! # Examples
//!
//! ```
//! use paysafe_sdk::config::{Environment, SdkConfig};
//!
//! let config = SdkConfig::from_toml(
//!     r#"
//!     api_key = "dXNlcm5hbWU6cGFzc3dvcmQ="
//!     environment = "test"
//!
//!     [http]
//!     timeout_secs = 20
//!
//!     [three_ds]
//!     merchant_url = "https://shop.example.com"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.environment, Environment::Test);
//! assert_eq!(config.environment.base_url(), "https://api.test.paysafe.com");
//! ```

use std::{path::Path, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    error::{ErrorKind, PaysafeError, Result},
    transport::HttpConfig,
};

/// Gateway environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live traffic.
    Production,
    /// Merchant test environment.
    #[default]
    Test,
}

impl Environment {
    /// Base URL of the gateway for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://api.paysafe.com",
            Self::Test => "https://api.test.paysafe.com",
        }
    }
}

/// 3-D Secure settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreeDsConfig {
    /// Merchant website URL sent with every authentication. Required for card
    /// flows that run 3-D Secure.
    #[serde(default)]
    pub merchant_url: Option<String>,

    /// Upper bound on how long a challenge may stay open, in seconds.
    #[serde(default = "default_challenge_timeout_secs")]
    pub challenge_timeout_secs: u64,

    /// `PAYMENT` or `NON_PAYMENT`.
    #[serde(default = "default_message_category")]
    pub message_category: String,

    /// `PAYMENT_TRANSACTION`, `RECURRING_TRANSACTION`, ...
    #[serde(default = "default_authentication_purpose")]
    pub authentication_purpose: String,
}

impl Default for ThreeDsConfig {
    fn default() -> Self {
        Self {
            merchant_url: None,
            challenge_timeout_secs: default_challenge_timeout_secs(),
            message_category: default_message_category(),
            authentication_purpose: default_authentication_purpose(),
        }
    }
}

impl ThreeDsConfig {
    /// Validates the merchant URL scheme and the challenge timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfiguration`] if the merchant URL is not
    /// HTTPS or the timeout is outside 1-900 seconds.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.merchant_url {
            let parsed = url::Url::parse(url).map_err(|e| {
                PaysafeError::configuration(format!("three_ds.merchant_url is invalid: {e}"))
            })?;
            if parsed.scheme() != "https" {
                return Err(PaysafeError::configuration("three_ds.merchant_url must use https"));
            }
        }
        if self.challenge_timeout_secs == 0 || self.challenge_timeout_secs > 900 {
            return Err(PaysafeError::configuration(
                "three_ds.challenge_timeout_secs must be between 1 and 900",
            ));
        }
        Ok(())
    }

    /// Returns the challenge timeout as Duration.
    #[must_use]
    pub const fn challenge_timeout(&self) -> Duration {
        Duration::from_secs(self.challenge_timeout_secs)
    }
}

/// Process-wide SDK configuration.
///
/// `Debug` output never shows the API key.
#[derive(Debug, Deserialize)]
pub struct SdkConfig {
    /// Base64 of `username:password`, as issued in the merchant back office.
    pub api_key: SecretString,

    /// Gateway environment.
    #[serde(default)]
    pub environment: Environment,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// 3-D Secure settings.
    #[serde(default)]
    pub three_ds: ThreeDsConfig,
}

impl SdkConfig {
    /// Creates a configuration with default transport and 3-D Secure settings.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidApiKey`] if the key is not base64 of
    /// `username:password`.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Result<Self> {
        let config = Self {
            api_key: SecretString::from(api_key.into()),
            environment,
            http: HttpConfig::default(),
            three_ds: ThreeDsConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the 3-D Secure merchant URL.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfiguration`] if the URL is malformed or
    /// not HTTPS.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_merchant_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.three_ds.merchant_url = Some(url.into());
        self.three_ds.validate()?;
        Ok(self)
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or [`SdkConfig::validate`] fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PaysafeError::configuration(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or [`SdkConfig::from_toml`] fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PaysafeError::configuration(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidApiKey`] for a malformed key and
    /// [`ErrorKind::InvalidConfiguration`] for out-of-range settings.
    pub fn validate(&self) -> Result<()> {
        validate_api_key(self.api_key.expose_secret())?;
        self.http.validate()?;
        self.three_ds.validate()
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization_header(&self) -> String {
        format!("Basic {}", self.api_key.expose_secret().trim())
    }
}

/// Checks the key decodes to `username:password` with both parts non-empty.
fn validate_api_key(api_key: &str) -> Result<()> {
    let invalid = || PaysafeError::new(ErrorKind::InvalidApiKey, String::new());
    let decoded = STANDARD.decode(api_key.trim()).map_err(|_| invalid())?;
    let credentials = String::from_utf8(decoded).map_err(|_| invalid())?;
    match credentials.split_once(':') {
        Some((user, password)) if !user.is_empty() && !password.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

const fn default_challenge_timeout_secs() -> u64 {
    300
}

fn default_message_category() -> String {
    "PAYMENT".to_owned()
}

fn default_authentication_purpose() -> String {
    "PAYMENT_TRANSACTION".to_owned()
}
