//! Typed gateway API client.
//!
//! [`PaysafeClient`] turns each gateway endpoint into one async method. It owns
//! JSON encoding and decoding, the authentication headers, and translation of
//! error envelopes: payment hub endpoints go through
//! [`GATEWAY_ERRORS`], 3-D Secure endpoints through [`THREE_DS_ERRORS`].
//!
//! Every method takes the correlation id of the calling flow and attaches it to
//! any error it returns. Nothing is retried.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    api_error::{ApiErrorEnvelope, ErrorTable, GATEWAY_ERRORS, THREE_DS_ERRORS},
    config::SdkConfig,
    error::{ErrorKind, PaysafeError, Result},
    models::{
        AuthenticationRequest, AuthenticationResponse, FinalizeAuthenticationRequest,
        JwtRequest, JwtResponse, PaymentHandle, PaymentHandleRequest, PaymentMethod,
        PaymentMethodsResponse,
    },
    transport::{HttpTransport, RequestContext, Transport, TransportResponse},
};

const PAYMENT_METHODS_PATH: &str = "/paymenthub/v1/paymentmethods";
const PAYMENT_HANDLES_PATH: &str = "/paymenthub/v1/singleusepaymenthandles";
const THREE_DS_ACCOUNTS_PATH: &str = "/threedsecure/v2/accounts";

/// Gateway API client.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use paysafe_sdk::{
///     client::PaysafeClient,
///     config::{Environment, SdkConfig},
/// };
///
/// # async fn example() -> paysafe_sdk::error::Result<()> {
/// let config = Arc::new(SdkConfig::new("dXNlcm5hbWU6cGFzc3dvcmQ=", Environment::Test)?);
/// let client = PaysafeClient::from_config(config)?;
///
/// let methods = client.payment_methods("USD", "corr-1").await?;
/// for method in methods {
///     println!("{} account {}", method.payment_method, method.account_id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PaysafeClient<T> {
    transport: T,
    config: Arc<SdkConfig>,
    authorization: String,
}

impl PaysafeClient<HttpTransport> {
    /// Creates a client on a reqwest transport built from `config.http`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: Arc<SdkConfig>) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.http)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> PaysafeClient<T> {
    /// Creates a client on the given transport.
    #[must_use]
    pub fn new(transport: T, config: Arc<SdkConfig>) -> Self {
        let authorization = config.authorization_header();
        Self { transport, config, authorization }
    }

    /// Shared configuration.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists the payment methods enabled for the merchant in a currency.
    ///
    /// # Errors
    ///
    /// Returns the translated gateway error, a transport error, or
    /// [`ErrorKind::InvalidResponse`] if the body cannot be decoded.
    #[instrument(skip(self), fields(protocol = self.transport.protocol_name()))]
    pub async fn payment_methods(
        &self,
        currency_code: &str,
        correlation_id: &str,
    ) -> Result<Vec<PaymentMethod>> {
        let response: PaymentMethodsResponse = self
            .get_json(
                PAYMENT_METHODS_PATH,
                vec![("currencyCode", currency_code)],
                &GATEWAY_ERRORS,
                correlation_id,
            )
            .await?;
        debug!(count = response.payment_methods.len(), "payment methods fetched");
        Ok(response.payment_methods)
    }

    /// Creates a single-use payment handle.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EncodingError`] if the request cannot be encoded,
    /// otherwise as [`PaysafeClient::payment_methods`].
    #[instrument(
        skip(self, request),
        fields(
            merchant_ref_num = %request.merchant_ref_num,
            payment_type = %request.payment_type,
            amount = request.amount
        )
    )]
    pub async fn create_payment_handle(
        &self,
        request: &PaymentHandleRequest,
        correlation_id: &str,
    ) -> Result<PaymentHandle> {
        self.post_json(PAYMENT_HANDLES_PATH, request, &GATEWAY_ERRORS, correlation_id).await
    }

    /// Re-reads a payment handle.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidUrl`] if the id is not a safe path segment,
    /// otherwise as [`PaysafeClient::payment_methods`].
    #[instrument(skip(self))]
    pub async fn payment_handle(
        &self,
        payment_handle_id: &str,
        correlation_id: &str,
    ) -> Result<PaymentHandle> {
        let id = path_segment(payment_handle_id, correlation_id)?;
        let path = format!("{PAYMENT_HANDLES_PATH}/{id}");
        self.get_json(&path, Vec::new(), &GATEWAY_ERRORS, correlation_id).await
    }

    /// Requests the JWT that configures the 3-D Secure engine session.
    ///
    /// # Errors
    ///
    /// Errors are translated with the 3-D Secure table.
    #[instrument(skip(self, request))]
    pub async fn create_jwt(
        &self,
        account_id: &str,
        request: &JwtRequest,
        correlation_id: &str,
    ) -> Result<JwtResponse> {
        let account = path_segment(account_id, correlation_id)?;
        let path = format!("{THREE_DS_ACCOUNTS_PATH}/{account}/jwts");
        self.post_json(&path, request, &THREE_DS_ERRORS, correlation_id).await
    }

    /// Starts an authentication.
    ///
    /// # Errors
    ///
    /// Errors are translated with the 3-D Secure table.
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    pub async fn authenticate(
        &self,
        account_id: &str,
        request: &AuthenticationRequest,
        correlation_id: &str,
    ) -> Result<AuthenticationResponse> {
        let account = path_segment(account_id, correlation_id)?;
        let path = format!("{THREE_DS_ACCOUNTS_PATH}/{account}/authentications");
        self.post_json(&path, request, &THREE_DS_ERRORS, correlation_id).await
    }

    /// Finalizes an authentication after a successful challenge.
    ///
    /// # Errors
    ///
    /// Errors are translated with the 3-D Secure table.
    #[instrument(skip(self, request))]
    pub async fn finalize_authentication(
        &self,
        account_id: &str,
        authentication_id: &str,
        request: &FinalizeAuthenticationRequest,
        correlation_id: &str,
    ) -> Result<AuthenticationResponse> {
        let account = path_segment(account_id, correlation_id)?;
        let authentication = path_segment(authentication_id, correlation_id)?;
        let path =
            format!("{THREE_DS_ACCOUNTS_PATH}/{account}/authentications/{authentication}/finalize");
        self.post_json(&path, request, &THREE_DS_ERRORS, correlation_id).await
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&str, &str)>,
        table: &ErrorTable,
        correlation_id: &str,
    ) -> Result<R> {
        let ctx = RequestContext {
            base_url: self.config.environment.base_url(),
            path,
            query,
            headers: vec![("Accept", "application/json"), ("Authorization", &self.authorization)],
        };
        let response = self
            .transport
            .get(ctx)
            .await
            .map_err(|e| PaysafeError::new(ErrorKind::from(e), correlation_id))?;
        decode_response(&response, table, correlation_id)
    }

    async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        table: &ErrorTable,
        correlation_id: &str,
    ) -> Result<R> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            PaysafeError::new(ErrorKind::EncodingError(e.to_string()), correlation_id)
        })?;
        let ctx = RequestContext {
            base_url: self.config.environment.base_url(),
            path,
            query: Vec::new(),
            headers: vec![
                ("Content-Type", "application/json"),
                ("Accept", "application/json"),
                ("Authorization", &self.authorization),
            ],
        };
        let response = self
            .transport
            .post(ctx, &bytes)
            .await
            .map_err(|e| PaysafeError::new(ErrorKind::from(e), correlation_id))?;
        decode_response(&response, table, correlation_id)
    }
}

/// Decodes a 2xx body, or translates a non-2xx error envelope.
fn decode_response<R: DeserializeOwned>(
    response: &TransportResponse,
    table: &ErrorTable,
    correlation_id: &str,
) -> Result<R> {
    if response.is_success() {
        return serde_json::from_slice(&response.body).map_err(|e| {
            PaysafeError::new(ErrorKind::InvalidResponse(e.to_string()), correlation_id)
        });
    }

    match serde_json::from_slice::<ApiErrorEnvelope>(&response.body) {
        Ok(envelope) => {
            warn!(
                status = response.status,
                code = %envelope.error.code,
                table = table.name(),
                "gateway returned an error"
            );
            Err(table.translate_body(&envelope.error, correlation_id))
        }
        Err(_) => Err(PaysafeError::new(
            ErrorKind::InvalidResponse(format!(
                "HTTP {} without an error envelope",
                response.status
            )),
            correlation_id,
        )),
    }
}

/// Checks a value is safe to splice into a URL path.
fn path_segment<'a>(value: &'a str, correlation_id: &str) -> Result<&'a str> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        Ok(value)
    } else {
        Err(PaysafeError::new(
            ErrorKind::InvalidUrl(format!("invalid path segment: {value:?}")),
            correlation_id,
        ))
    }
}
