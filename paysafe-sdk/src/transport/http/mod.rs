//! HTTP transport implementation.
//!
//! HTTP/1.1 and HTTP/2 over rustls using reqwest.

use std::{sync::LazyLock, time::Duration};

use reqwest::{Client, RequestBuilder};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{PaysafeError, Result},
    transport::{RequestContext, Transport, TransportError, TransportResponse},
};

/// Default HTTP client with connection pooling enabled.
///
/// Shared by every transport built with [`HttpTransport::new`] so they share
/// one connection pool.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(16)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default()
});

/// Validates URL for security constraints.
///
/// Ensures the URL uses HTTPS and does not point to localhost.
fn validate_url(url: &Url) -> std::result::Result<(), TransportError> {
    if url.scheme() != "https" {
        return Err(TransportError::InvalidUrl("Only HTTPS URLs are allowed".to_owned()));
    }

    if let Some(host) = url.host_str()
        && (host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]")
    {
        return Err(TransportError::InvalidUrl("Localhost URLs are not allowed".to_owned()));
    }

    Ok(())
}

/// Rejects paths containing directory traversal sequences.
fn sanitize_path(path: &str) -> std::result::Result<&str, TransportError> {
    if path.contains("..") || path.contains("//") {
        return Err(TransportError::InvalidRequest(
            "Invalid path: traversal sequences not allowed".to_owned(),
        ));
    }
    if !path.is_empty() && !path.starts_with('/') {
        return Err(TransportError::InvalidRequest("Path must start with '/'".to_owned()));
    }
    Ok(path)
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> std::result::Result<(), TransportError> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(TransportError::InvalidRequest(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(TransportError::InvalidRequest(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// Builds the full request URL from a validated context.
fn build_url(ctx: &RequestContext<'_>) -> std::result::Result<Url, TransportError> {
    let base = Url::parse(ctx.base_url)
        .map_err(|e| TransportError::InvalidUrl(format!("invalid base_url: {e}")))?;
    validate_url(&base)?;

    let path = sanitize_path(ctx.path)?;
    let mut url = Url::parse(&format!("{}{path}", ctx.base_url.trim_end_matches('/')))
        .map_err(|e| TransportError::InvalidUrl(format!("invalid path: {e}")))?;

    if !ctx.query.is_empty() {
        url.query_pairs_mut().extend_pairs(ctx.query.iter().copied());
    }
    Ok(url)
}

/// Classifies a reqwest failure.
fn map_reqwest_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else if error.is_body() || error.is_decode() {
        TransportError::Body(error.to_string())
    } else {
        TransportError::NoConnection(error.to_string())
    }
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling, keep-alive, and HTTP/2 multiplexing.
///
/// # Examples
///
/// ```rust,no_run
/// use paysafe_sdk::transport::{HttpTransport, RequestContext, Transport};
///
/// # async fn example() -> Result<(), paysafe_sdk::transport::TransportError> {
/// let transport = HttpTransport::new();
///
/// let ctx = RequestContext {
///     base_url: "https://api.test.paysafe.com",
///     path: "/paymenthub/v1/singleusepaymenthandles",
///     query: vec![],
///     headers: vec![("Content-Type", "application/json")],
/// };
///
/// let response = transport.post(ctx, b"{}").await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Creates a transport on the shared default client.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 16
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: Auto (prefer HTTP/2)
    #[must_use]
    pub fn new() -> Self {
        Self { client: DEFAULT_HTTP_CLIENT.clone(), http_version: HttpVersion::Auto }
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfiguration`](crate::error::ErrorKind::InvalidConfiguration)
    /// if the HTTP client cannot be built (e.g. the TLS backend fails to initialize).
    ///
    /// # Examples
    ///
    /// ```
    /// use paysafe_sdk::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
    ///
    /// let config = HttpConfig { http_version: HttpVersion::Http1, ..HttpConfig::default() };
    /// let transport = HttpTransport::with_config(&config).unwrap();
    /// assert_eq!(transport.protocol_name(), "http/1.1");
    /// ```
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder
            .build()
            .map_err(|e| PaysafeError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, http_version: config.http_version })
    }

    /// Validates, sends and collects one request.
    #[instrument(
        skip(self, ctx, body),
        fields(base_url = ctx.base_url, path = ctx.path, status)
    )]
    async fn execute_request(
        &self,
        ctx: RequestContext<'_>,
        method: &str,
        body: Option<&[u8]>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = build_url(&ctx)?;

        for (name, value) in &ctx.headers {
            validate_header(name, value)?;
        }

        let mut request: RequestBuilder = match method {
            "GET" => self.client.get(url),
            "POST" => self.client.post(url),
            _ => {
                return Err(TransportError::InvalidRequest(format!(
                    "unsupported HTTP method: {method}"
                )));
            }
        };

        for (name, value) in ctx.headers {
            request = request.header(name, value);
        }

        if let Some(bytes) = body {
            request = request.body(bytes.to_vec());
        }

        let response = request.send().await.map_err(|e| map_reqwest_error(&e))?;

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let response_body = response.bytes().await.map_err(|e| map_reqwest_error(&e))?.to_vec();
        debug!(status, bytes = response_body.len(), "response received");

        Ok(TransportResponse { status, body: response_body, headers })
    }
}

impl Transport for HttpTransport {
    async fn get<'a>(
        &'a self,
        ctx: RequestContext<'a>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.execute_request(ctx, "GET", None).await
    }

    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.execute_request(ctx, "POST", Some(body)).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
