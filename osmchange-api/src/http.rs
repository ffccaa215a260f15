//! `reqwest`-backed [`SignedTransport`].
//!
//! The [`SignedTransport`] trait is synchronous so the client stays usable
//! from plain blocking code. This transport bridges to async `reqwest` by
//! blocking on a Tokio runtime it owns.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::transport::{Method, SignedRequest, SignedTransport, TransportError, TransportResponse};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("osmchange/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Error type for [`HttpTransport`] construction failures.
#[derive(Debug, Error)]
pub enum HttpTransportBuildError {
    /// The access token cannot be used as a header value.
    #[error("access token is not a valid header value: {0}")]
    InvalidToken(#[source] InvalidHeaderValue),
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpTransport`].
#[derive(Clone)]
pub struct HttpTransportConfig {
    /// Connect and overall request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// OAuth 2 access token sent as `Authorization: Bearer <token>`.
    pub access_token: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            access_token: None,
        }
    }
}

impl fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl HttpTransportConfig {
    /// Create a configuration with defaults and no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Authenticate every request with a bearer token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn default_headers(&self) -> Result<HeaderMap, HttpTransportBuildError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(HttpTransportBuildError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Blocking HTTP transport built on `reqwest`.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the transport drives requests on its own
/// current-thread runtime. Inside a multi-threaded runtime it reuses that
/// runtime's handle through [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime it drives its own runtime from a scoped helper
/// thread, which blocks the caller's runtime for the duration of the
/// request.
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
    runtime: Runtime,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport with default configuration and no credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, HttpTransportBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, HttpTransportBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(config.default_headers()?)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(HttpTransportBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(HttpTransportBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    async fn send_async(&self, request: SignedRequest) -> Result<TransportResponse, reqwest::Error> {
        let builder = match request.method {
            Method::Put => self.client.put(request.url),
            Method::Post => self.client.post(request.url),
        };
        let builder = match request.body {
            Some(body) => builder.header(CONTENT_TYPE, XML_CONTENT_TYPE).body(body),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

impl SignedTransport for HttpTransport {
    fn send(&self, request: SignedRequest) -> Result<TransportResponse, TransportError> {
        let future = self.send_async(request);
        let result = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // Nested `block_on` panics on the caller's thread.
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(move || self.runtime.block_on(future))
                    .join()
            })
            .map_err(|_| TransportError::from("HTTP worker thread panicked"))?,
            Err(_) => self.runtime.block_on(future),
        };
        result.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpTransportConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_access_token("secret");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
    }

    #[rstest]
    fn debug_output_redacts_token() {
        let config = HttpTransportConfig::new().with_access_token("secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn bearer_header_is_sensitive() {
        let headers = HttpTransportConfig::new()
            .with_access_token("abc")
            .default_headers()
            .expect("valid token");
        let value = headers.get(AUTHORIZATION).expect("authorization header");
        assert_eq!(value.to_str().ok(), Some("Bearer abc"));
        assert!(value.is_sensitive());
    }

    #[rstest]
    fn rejects_token_with_newline() {
        let err = HttpTransport::with_config(HttpTransportConfig::new().with_access_token("a\nb"))
            .expect_err("newline is not a header value");
        assert!(matches!(err, HttpTransportBuildError::InvalidToken(_)));
    }

    #[rstest]
    fn builds_without_credentials() {
        let transport = HttpTransport::new().expect("transport should build");
        assert_eq!(transport.config().user_agent, DEFAULT_USER_AGENT);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_host_is_a_transport_error() {
        let transport = HttpTransport::with_config(
            HttpTransportConfig::new().with_timeout(Duration::from_millis(500)),
        )
        .expect("transport should build");
        let request = SignedRequest {
            method: Method::Put,
            url: url::Url::parse("http://127.0.0.1:9/api/0.6/changeset/create")
                .expect("valid url"),
            body: None,
        };
        assert!(transport.send(request).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn current_thread_runtime_reports_errors_without_panicking() {
        let transport = HttpTransport::with_config(
            HttpTransportConfig::new().with_timeout(Duration::from_millis(500)),
        )
        .expect("transport should build");
        let request = SignedRequest {
            method: Method::Post,
            url: url::Url::parse("http://127.0.0.1:9/api/0.6/changeset/1/upload")
                .expect("valid url"),
            body: Some("<osmChange/>".to_owned()),
        };
        let err = transport
            .send(request)
            .expect_err("nothing listens on the discard port");
        assert!(!err.to_string().contains("runtime"));
    }
}
