//! The signed-transport seam between the API client and the network.
//!
//! Authentication is the transport's business: implementations receive
//! requests that must leave the process already signed or carrying
//! credentials. The client only inspects status codes and bodies.

use std::fmt;

use url::Url;

/// Error produced by a transport, passed through to callers unmodified.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP methods used by the OSM changeset API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `PUT`, for creating and closing changesets.
    Put,
    /// `POST`, for diff uploads.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => f.write_str("PUT"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A request for the transport to sign and send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute endpoint URL.
    pub url: Url,
    /// XML request body, if any.
    pub body: Option<String>,
}

/// Status and body of a completed round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl TransportResponse {
    /// Build a response from its parts.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Perform one authenticated HTTP round trip, blocking until it completes.
///
/// Any status code is a successful round trip; only connection-level
/// failures are errors.
///
/// # Examples
///
/// ```
/// use osmchange_api::{SignedRequest, SignedTransport, TransportError, TransportResponse};
///
/// struct AlwaysOk;
///
/// impl SignedTransport for AlwaysOk {
///     fn send(&self, _request: SignedRequest) -> Result<TransportResponse, TransportError> {
///         Ok(TransportResponse::new(200, "1"))
///     }
/// }
/// ```
pub trait SignedTransport {
    /// Send `request` and return the server's response.
    fn send(&self, request: SignedRequest) -> Result<TransportResponse, TransportError>;
}

impl<T> SignedTransport for &T
where
    T: SignedTransport + ?Sized,
{
    fn send(&self, request: SignedRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}
