//! HTTP client for the OpenStreetMap changeset API.
//!
//! Responsibilities:
//! - Open, upload to and close changesets ([`OsmApiClient`]).
//! - Define the [`SignedTransport`] seam that carries authenticated requests.
//! - Provide a blocking `reqwest` transport ([`HttpTransport`]).
//!
//! Boundaries:
//! - Credentials are supplied by the caller; no OAuth handshake happens here.
//! - Responses to uploads are returned verbatim and never parsed.

#![forbid(unsafe_code)]

pub mod client;
pub mod http;
#[doc(hidden)]
pub mod test_support;
pub mod transport;

pub use client::{ClientError, DEFAULT_API_URL, OsmApiClient};
pub use http::{DEFAULT_USER_AGENT, HttpTransport, HttpTransportBuildError, HttpTransportConfig};
pub use transport::{Method, SignedRequest, SignedTransport, TransportError, TransportResponse};
