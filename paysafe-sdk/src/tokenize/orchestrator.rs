//! Tokenize flow orchestration.
//!
//! One call to [`Tokenizer::tokenize`] is one linear flow:
//!
//! ```text
//! validate ─▶ payment methods ─▶ create handle ─┬─ PAYABLE ──────────────▶ handle
//!                                               ├─ FAILED | EXPIRED ─────▶ error
//!                                               ├─ card + 3-D Secure ─┐
//!                                               └─ otherwise ─────────┼──▶ handle
//!                                                                     ▼
//!                 jwt ─▶ engine setup ─▶ authenticate ─▶ [challenge ─▶ finalize] ─▶ refresh ─▶ handle
//! ```
//!
//! The first failing step ends the flow. Nothing is retried.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Weak},
};

use tokio::task::JoinHandle;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

use super::{
    observer::TokenizeObserver,
    options::{PaymentMethodOptions, TokenizeOptions},
};
use crate::{
    api_error::GATEWAY_ERRORS,
    client::PaysafeClient,
    error::{ErrorKind, PaysafeError, Result},
    events::{EventSink, EventType, SdkEvent, TracingEventSink},
    models::{
        AuthenticationRequest, AuthenticationStatus, CardDetails, FinalizeAuthenticationRequest,
        JwtRequest, PaymentHandle, PaymentHandleRequest, PaymentHandleStatus, PaymentMethod,
        PaymentMethodRequest, ThreeDsRequest,
    },
    threeds::{AuthenticationEngine, AuthenticationOutcome, ThreeDsBridge, ThreeDsOptions},
    transport::Transport,
    wallet::{ApplePayAdapter, PayPalAdapter, VenmoAdapter, WalletAdapter, WalletResult},
};

/// Device channel sent with every 3-D Secure request from this client.
const DEVICE_CHANNEL: &str = "SDK";

/// Runs tokenize flows against the gateway and a 3-D Secure engine.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use paysafe_sdk::{
///     client::PaysafeClient,
///     config::{Environment, SdkConfig},
///     models::{CardDetails, CardExpiry},
///     threeds::{AuthenticationEngine, ChallengeCompletion, EngineError},
///     tokenize::{PaymentMethodOptions, TokenizeOptions, Tokenizer},
/// };
///
/// struct FrictionlessOnly;
///
/// impl AuthenticationEngine for FrictionlessOnly {
///     async fn setup<'a>(&'a self, _jwt: &'a str) -> Result<String, EngineError> {
///         Ok("device-session".to_owned())
///     }
///
///     fn continue_challenge(&self, _tx: &str, _payload: &str, completion: ChallengeCompletion) {
///         completion.fail("challenges are not supported");
///     }
/// }
///
/// # async fn example() -> paysafe_sdk::error::Result<()> {
/// let config = Arc::new(SdkConfig::new("dXNlcm5hbWU6cGFzc3dvcmQ=", Environment::Test)?);
/// let tokenizer = Tokenizer::new(PaysafeClient::from_config(config)?, FrictionlessOnly);
///
/// let handle = tokenizer
///     .tokenize(TokenizeOptions::new(
///         1000,
///         "USD",
///         "order-42",
///         "1001456650",
///         PaymentMethodOptions::Card {
///             card: CardDetails {
///                 card_num: "4111111111111111".to_owned(),
///                 card_expiry: CardExpiry { month: 12, year: 2030 },
///                 cvv: Some("123".to_owned()),
///                 holder_name: None,
///             },
///             three_ds: None,
///         },
///     ))
///     .await?;
/// println!("token: {}", handle.payment_handle_token);
/// # Ok(())
/// # }
/// ```
pub struct Tokenizer<T, E> {
    client: PaysafeClient<T>,
    engine: E,
    events: Arc<dyn EventSink>,
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Tokenizer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("client", &self.client)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, E: AuthenticationEngine> Tokenizer<T, E> {
    /// Creates a tokenizer reporting events through [`TracingEventSink`].
    #[must_use]
    pub fn new(client: PaysafeClient<T>, engine: E) -> Self {
        Self::with_event_sink(client, engine, Arc::new(TracingEventSink))
    }

    /// Creates a tokenizer reporting events to `events`.
    #[must_use]
    pub fn with_event_sink(
        client: PaysafeClient<T>,
        engine: E,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { client, engine, events }
    }

    /// API client used by the flows.
    #[must_use]
    pub const fn client(&self) -> &PaysafeClient<T> {
        &self.client
    }

    /// 3-D Secure engine used by the flows.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Tokenizes one instrument.
    ///
    /// Returns the payment handle in its final state for this flow: `PAYABLE`
    /// for completed card flows, or `INITIATED` with redirect links or vendor
    /// data for wallet flows that continue outside this crate.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step, carrying the flow's
    /// correlation id.
    #[instrument(
        skip(self, options),
        fields(
            correlation_id,
            payment_method = options.payment_method.name(),
            amount = options.amount,
            currency = %options.currency_code
        )
    )]
    pub async fn tokenize(&self, options: TokenizeOptions) -> Result<PaymentHandle> {
        let correlation_id =
            options.correlation_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        Span::current().record("correlation_id", correlation_id.as_str());

        self.emit(
            EventType::FlowStarted,
            &correlation_id,
            format!(
                "tokenizing {} for {} {}",
                options.payment_method.name(),
                options.amount,
                options.currency_code
            ),
        );

        let result = self.run(&options, &correlation_id).await;
        match &result {
            Ok(handle) => {
                info!(payment_handle_id = %handle.id, status = %handle.status, "tokenize completed");
                self.emit(
                    EventType::FlowSucceeded,
                    &correlation_id,
                    format!("payment handle {} is {}", handle.id, handle.status),
                );
            }
            Err(e) => self.emit(EventType::FlowFailed, &correlation_id, e.kind.to_string()),
        }
        result
    }

    /// Runs [`Tokenizer::tokenize`] on a tokio task and hands the result to
    /// `observer`.
    ///
    /// If the observer has been dropped by the time the flow ends, the result
    /// is discarded.
    pub fn spawn_tokenize<O>(
        self: &Arc<Self>,
        options: TokenizeOptions,
        observer: Weak<O>,
    ) -> JoinHandle<()>
    where
        T: 'static,
        E: 'static,
        O: TokenizeObserver + ?Sized + 'static,
    {
        let tokenizer = Arc::clone(self);
        tokio::spawn(async move {
            let result = tokenizer.tokenize(options).await;
            match observer.upgrade() {
                Some(observer) => observer.on_result(result),
                None => debug!("tokenize observer released, dropping result"),
            }
        })
    }

    /// Combines a wallet flow's gateway and vendor outcomes and reports the
    /// result as a [`EventType::WalletResult`] event.
    #[must_use]
    pub fn wallet_result<A: WalletAdapter>(
        &self,
        adapter: &A,
        handle: &Result<PaymentHandle>,
        vendor: A::VendorResult,
        correlation_id: &str,
    ) -> WalletResult {
        let result = adapter.wallet_result(handle, vendor, correlation_id);
        let message = match &result {
            WalletResult::Success { .. } => "wallet payment approved".to_owned(),
            WalletResult::Failed(e) => format!("wallet payment failed: {}", e.kind),
            WalletResult::Cancelled => "wallet payment cancelled".to_owned(),
        };
        self.emit(EventType::WalletResult, correlation_id, message);
        result
    }

    async fn run(&self, options: &TokenizeOptions, correlation_id: &str) -> Result<PaymentHandle> {
        if let Err(e) = options.validate(correlation_id) {
            self.emit(EventType::ValidationFailed, correlation_id, e.kind.to_string());
            return Err(e);
        }

        let method = self.resolve_payment_method(options, correlation_id).await?;
        self.emit(
            EventType::PaymentMethodResolved,
            correlation_id,
            format!("{} account {} in {}", method.payment_method, method.account_id, method.currency_code),
        );

        let request = self.build_request(options, correlation_id)?;
        let handle = self
            .network_step(correlation_id, self.client.create_payment_handle(&request, correlation_id))
            .await?;
        self.emit(
            EventType::HandleCreated,
            correlation_id,
            format!("payment handle {} is {}", handle.id, handle.status),
        );

        match (handle.status, &options.payment_method) {
            (PaymentHandleStatus::Payable, _) => Ok(handle),
            (status, _) if status.is_terminal_failure() => {
                Err(handle_failure(&handle, correlation_id))
            }
            (_, PaymentMethodOptions::Card { card, three_ds: Some(three_ds) }) => {
                self.authenticate(options, card, three_ds, &handle, correlation_id).await
            }
            _ => Ok(handle),
        }
    }

    #[instrument(skip_all, fields(account_id = %options.account_id))]
    async fn resolve_payment_method(
        &self,
        options: &TokenizeOptions,
        correlation_id: &str,
    ) -> Result<PaymentMethod> {
        let methods = self
            .network_step(
                correlation_id,
                self.client.payment_methods(&options.currency_code, correlation_id),
            )
            .await?;

        let payment_type = options.payment_method.payment_type();
        let apple_pay = matches!(options.payment_method, PaymentMethodOptions::ApplePay(_));
        methods
            .into_iter()
            .find(|m| {
                m.account_id == options.account_id
                    && m.currency_code == options.currency_code
                    && m.payment_method == payment_type
                    && (!apple_pay || m.supports_apple_pay())
            })
            .ok_or_else(|| {
                PaysafeError::new(
                    ErrorKind::AccountNotConfigured {
                        account_id: options.account_id.clone(),
                        payment_type: if apple_pay { "APPLE_PAY" } else { payment_type.as_str() }
                            .to_owned(),
                        currency_code: options.currency_code.clone(),
                    },
                    correlation_id,
                )
            })
    }

    fn build_request(
        &self,
        options: &TokenizeOptions,
        correlation_id: &str,
    ) -> Result<PaymentHandleRequest> {
        let mut billing_details = options.billing_details.clone();
        let mut profile = options.profile.clone();
        let mut three_ds = None;

        let method = match &options.payment_method {
            PaymentMethodOptions::Card { card, three_ds: three_ds_options } => {
                if let Some(three_ds_options) = three_ds_options {
                    three_ds = Some(self.three_ds_request(three_ds_options, correlation_id)?);
                }
                PaymentMethodRequest::Card(card.clone())
            }
            PaymentMethodOptions::ApplePay(authorization) => {
                billing_details = billing_details.or_else(|| ApplePayAdapter.billing_details(authorization));
                profile = profile.or_else(|| ApplePayAdapter.profile(authorization));
                ApplePayAdapter.build_request(authorization)
            }
            PaymentMethodOptions::PayPal(paypal) => PayPalAdapter.build_request(paypal),
            PaymentMethodOptions::Venmo(venmo) => VenmoAdapter.build_request(venmo),
        };

        Ok(PaymentHandleRequest {
            merchant_ref_num: options.merchant_ref_num.clone(),
            transaction_type: options.transaction_type,
            account_id: options.account_id.clone(),
            payment_type: method.payment_type(),
            amount: options.amount,
            currency_code: options.currency_code.clone(),
            return_links: options.return_links.clone(),
            profile,
            billing_details,
            shipping_details: options.shipping_details.clone(),
            merchant_descriptor: options.merchant_descriptor.clone(),
            method,
            three_ds,
        })
    }

    fn three_ds_request(
        &self,
        options: &ThreeDsOptions,
        correlation_id: &str,
    ) -> Result<ThreeDsRequest> {
        let config = &self.client.config().three_ds;
        Ok(ThreeDsRequest {
            merchant_url: self.merchant_url(correlation_id)?.to_owned(),
            device_channel: DEVICE_CHANNEL.to_owned(),
            message_category: config.message_category.clone(),
            authentication_purpose: config.authentication_purpose.clone(),
            requestor_challenge_preference: Some(options.challenge_preference.as_str().to_owned()),
        })
    }

    fn merchant_url(&self, correlation_id: &str) -> Result<&str> {
        self.client.config().three_ds.merchant_url.as_deref().ok_or_else(|| {
            PaysafeError::new(
                ErrorKind::InvalidConfiguration(
                    "three_ds.merchant_url is required for 3-D Secure".to_owned(),
                ),
                correlation_id,
            )
        })
    }

    /// 3-D Secure leg of a card flow. Returns the refreshed handle.
    #[allow(clippy::too_many_lines, reason = "linear flow reads best as one function")]
    #[instrument(skip_all, fields(payment_handle_id = %handle.id))]
    async fn authenticate(
        &self,
        options: &TokenizeOptions,
        card: &CardDetails,
        three_ds: &ThreeDsOptions,
        handle: &PaymentHandle,
        correlation_id: &str,
    ) -> Result<PaymentHandle> {
        let resolved = three_ds.resolve(&options.account_id, card.bin(), correlation_id)?;
        let config = &self.client.config().three_ds;

        let jwt = self
            .network_step(
                correlation_id,
                self.client.create_jwt(
                    &resolved.account_id,
                    &JwtRequest { card_bin: resolved.card_bin.clone() },
                    correlation_id,
                ),
            )
            .await?;

        let mut bridge = ThreeDsBridge::new(&self.engine, config.challenge_timeout(), correlation_id);
        let session_id = bridge.configure_session(&jwt.jwt).await?;
        self.emit(EventType::ThreeDsSessionConfigured, correlation_id, "3-D Secure session configured");

        let request = AuthenticationRequest {
            merchant_ref_num: options.merchant_ref_num.clone(),
            amount: options.amount,
            currency: options.currency_code.clone(),
            payment_handle_token: handle.payment_handle_token.clone(),
            sdk_session_id: session_id,
            device_fingerprinting_id: jwt.device_fingerprinting_id.clone(),
            merchant_url: self.merchant_url(correlation_id)?.to_owned(),
            device_channel: DEVICE_CHANNEL.to_owned(),
            message_category: config.message_category.clone(),
            authentication_purpose: config.authentication_purpose.clone(),
            requestor_challenge_preference: Some(
                resolved.challenge_preference.as_str().to_owned(),
            ),
        };
        let response = match self
            .network_step(
                correlation_id,
                self.client.authenticate(&resolved.account_id, &request, correlation_id),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                bridge.abandon();
                return Err(e);
            }
        };

        if response.sdk_challenge_payload.is_some() {
            self.emit(
                EventType::ChallengeStarted,
                correlation_id,
                format!("challenge required for authentication {}", response.id),
            );
        }
        let outcome = bridge.handle_authentication(&response).await;
        self.emit(
            EventType::AuthenticationCompleted,
            correlation_id,
            match &outcome {
                Ok(AuthenticationOutcome::Frictionless) => "authenticated without challenge".to_owned(),
                Ok(AuthenticationOutcome::Challenged { .. }) => "challenge succeeded".to_owned(),
                Err(e) => format!("authentication failed: {}", e.kind),
            },
        );

        if let AuthenticationOutcome::Challenged { server_jwt } = outcome? {
            let finalized = self
                .network_step(
                    correlation_id,
                    self.client.finalize_authentication(
                        &resolved.account_id,
                        &response.id,
                        &FinalizeAuthenticationRequest { jwt: server_jwt },
                        correlation_id,
                    ),
                )
                .await?;
            if finalized.status != AuthenticationStatus::Completed {
                return Err(PaysafeError::new(
                    ErrorKind::AuthenticationFailed(format!(
                        "finalize returned {:?}",
                        finalized.status
                    )),
                    correlation_id,
                ));
            }
        }

        let refreshed = self
            .network_step(correlation_id, self.client.payment_handle(&handle.id, correlation_id))
            .await?;
        self.emit(
            EventType::HandleRefreshed,
            correlation_id,
            format!("payment handle {} is {}", refreshed.id, refreshed.status),
        );
        if refreshed.status.is_terminal_failure() {
            return Err(handle_failure(&refreshed, correlation_id));
        }
        Ok(refreshed)
    }

    /// Awaits a client call and reports its failure as a network or API event.
    async fn network_step<R, F>(&self, correlation_id: &str, step: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        step.await.inspect_err(|e| {
            let event_type = match e.kind {
                ErrorKind::Timeout | ErrorKind::NoConnection(_) | ErrorKind::InvalidUrl(_) => {
                    EventType::NetworkFailure
                }
                _ => EventType::ApiError,
            };
            self.emit(event_type, correlation_id, e.kind.to_string());
        })
    }

    fn emit(&self, event_type: EventType, correlation_id: &str, message: impl AsRef<str>) {
        self.events.record(&SdkEvent::new(event_type, correlation_id, message));
    }
}

/// Error for a handle the gateway reports as failed or expired.
fn handle_failure(handle: &PaymentHandle, correlation_id: &str) -> PaysafeError {
    match &handle.error {
        Some(body) => GATEWAY_ERRORS.translate_body(body, correlation_id),
        None => PaysafeError::new(
            ErrorKind::GenericApi {
                code: 0,
                raw_code: String::new(),
                message: format!("payment handle {} is {}", handle.id, handle.status),
            },
            correlation_id,
        ),
    }
}
