//! Paysafe SDK: tokenization and 3-D Secure for mobile payment hosts
//!
//! A Rust library implementing the client core of a mobile payment SDK. It
//! turns cards, Apple Pay tokens, PayPal and Venmo approvals into single-use
//! Paysafe payment handles, runs 3-D Secure authentication through a pluggable
//! vendor engine, and translates every gateway error into one closed
//! taxonomy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Host app      │  UI, wallet sheets, vendor SDKs
//! └────────┬────────┘
//!          │ TokenizeOptions / TokenizeObserver
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │              paysafe-sdk (this crate)           │
//! │  ┌──────────────┐  ┌──────────┐  ┌──────────┐   │
//! │  │  Tokenizer   │──│  3DS     │──│ Engine   │   │
//! │  │ (tokenize)   │  │ bridge   │  │ (vendor) │   │
//! │  └──────┬───────┘  └──────────┘  └──────────┘   │
//! │  ┌──────▼───────┐  ┌──────────────────────┐     │
//! │  │ PaysafeClient│──│ Error tables         │     │
//! │  └──────┬───────┘  └──────────────────────┘     │
//! │  ┌──────▼───────┐                               │
//! │  │  Transport   │  reqwest, HTTPS only          │
//! │  └──────────────┘                               │
//! └────────┬────────────────────────────────────────┘
//!          │ HTTPS, Basic auth
//! ┌────────▼────────┐
//! │  Paysafe API    │  payment hub + 3-D Secure v2
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use paysafe_sdk::{
//!     client::PaysafeClient,
//!     config::SdkConfig,
//!     models::{CardDetails, CardExpiry},
//!     threeds::{AuthenticationEngine, ChallengeCompletion, EngineError},
//!     tokenize::{PaymentMethodOptions, TokenizeOptions, Tokenizer},
//! };
//!
//! struct Engine;
//!
//! impl AuthenticationEngine for Engine {
//!     async fn setup<'a>(&'a self, _jwt: &'a str) -> Result<String, EngineError> {
//!         Ok("device-session".to_owned())
//!     }
//!
//!     fn continue_challenge(&self, _tx: &str, _payload: &str, completion: ChallengeCompletion) {
//!         // Present the vendor challenge UI, then report its outcome.
//!         completion.cancel();
//!     }
//! }
//!
//! # async fn example() -> paysafe_sdk::Result<()> {
//! let config = Arc::new(SdkConfig::from_file("paysafe.toml")?);
//! let tokenizer = Tokenizer::new(PaysafeClient::from_config(config)?, Engine);
//!
//! let options = TokenizeOptions::new(
//!     1000,
//!     "USD",
//!     "order-42",
//!     "1001456650",
//!     PaymentMethodOptions::Card {
//!         card: CardDetails {
//!             card_num: "4111111111111111".to_owned(),
//!             card_expiry: CardExpiry { month: 12, year: 2030 },
//!             cvv: Some("123".to_owned()),
//!             holder_name: Some("Jane Doe".to_owned()),
//!         },
//!         three_ds: None,
//!     },
//! );
//!
//! let handle = tokenizer.tokenize(options).await?;
//! println!("{} is {}", handle.payment_handle_token, handle.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`tokenize`]: the tokenize flow and background delivery to observers
//! - [`threeds`]: 3-D Secure state machine and the vendor engine contract
//! - [`wallet`]: Apple Pay, PayPal and Venmo adapters
//! - [`client`]: one async method per gateway endpoint
//! - [`transport`]: HTTP transport abstraction and its reqwest implementation
//! - [`api_error`]: error envelope and the per-service translation tables
//! - [`error`]: the closed error taxonomy
//! - [`events`]: lifecycle events and PAN/CVV redaction
//! - [`config`]: TOML configuration
//! - [`currency`]: major/minor unit conversion
//! - [`models`]: wire DTOs
//!
//! # Error Handling
//!
//! Every failure is a [`PaysafeError`] carrying the flow's correlation id:
//!
//! ```rust
//! use paysafe_sdk::{ErrorKind, api_error::GATEWAY_ERRORS};
//!
//! let err = GATEWAY_ERRORS.translate("5279", "Invalid credentials", "corr-1");
//! assert_eq!(err.kind, ErrorKind::InvalidApiKey);
//! assert_eq!(err.correlation_id, "corr-1");
//!
//! match err.kind {
//!     ErrorKind::Timeout | ErrorKind::NoConnection(_) => { /* offer a retry */ }
//!     ErrorKind::InvalidApiKey => { /* configuration problem */ }
//!     other => eprintln!("payment failed: {other}"),
//! }
//! ```
//!
//! # Security Considerations
//!
//! - **HTTPS only**: the transport rejects any other scheme
//! - **Card data**: PAN and CVV are zeroized on drop and never printed by `Debug`
//! - **Events**: messages are redacted before any sink sees them
//! - **API key**: held in a [`secrecy::SecretString`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod api_error;
pub mod client;
pub mod config;
pub mod currency;
pub mod error;
pub mod events;
pub mod models;
pub mod threeds;
pub mod tokenize;
pub mod transport;
pub mod wallet;

pub use client::PaysafeClient;
pub use config::{Environment, SdkConfig};
pub use error::{ErrorKind, PaysafeError, Result};
pub use tokenize::{PaymentMethodOptions, TokenizeObserver, TokenizeOptions, Tokenizer};
