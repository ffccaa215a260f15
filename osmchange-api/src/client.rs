//! Changeset operations against the OSM API v0.6.
//!
//! Each operation is one blocking round trip through a [`SignedTransport`].
//! Nothing is retried. Any status other than 200 becomes
//! [`ClientError::Api`] carrying the upstream status and body verbatim.

use std::num::ParseIntError;

use log::debug;
use osmchange_core::{ChangesetMetadata, OsmChange, XmlError};
use thiserror::Error;
use url::Url;

use crate::transport::{
    Method, SignedRequest, SignedTransport, TransportError, TransportResponse,
};

/// Development API server used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://api06.dev.openstreetmap.org/";

const STATUS_OK: u16 = 200;

/// Errors raised by [`OsmApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status other than 200.
    #[error("API request failed with status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the server.
        body: String,
    },
    /// The transport could not complete the round trip.
    #[error(transparent)]
    Transport(TransportError),
    /// The changeset has no server id, so no endpoint can be addressed.
    #[error("changeset has not been created on the server")]
    UnassignedChangeset,
    /// A create response body was not a decimal changeset id.
    #[error("server returned an invalid changeset id {body:?}")]
    InvalidChangesetId {
        /// Body of the create response.
        body: String,
        /// Parse failure.
        #[source]
        source: ParseIntError,
    },
    /// An endpoint URL could not be formed.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    /// A request body could not be rendered.
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Client for the changeset create, upload and close endpoints.
///
/// # Examples
///
/// ```
/// use osmchange_api::OsmApiClient;
/// use osmchange_api::test_support::StubTransport;
///
/// let transport = StubTransport::new().respond(200, "1001").respond(200, "");
/// let client = OsmApiClient::from_base_url("https://example.test/", &transport)?;
///
/// let changeset = client.create_changeset("docs", "example")?;
/// assert_eq!(changeset.id(), Some(1001));
/// client.close_changeset(&changeset)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct OsmApiClient<T> {
    base_url: Url,
    transport: T,
}

impl<T: SignedTransport> OsmApiClient<T> {
    /// Create a client rooted at `base_url`.
    ///
    /// A missing trailing slash is added so endpoint paths join beneath the
    /// base rather than replacing its last segment.
    pub fn new(mut base_url: Url, transport: T) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            transport,
        }
    }

    /// Parse `base_url` and create a client rooted at it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] if `base_url` does not parse.
    pub fn from_base_url(base_url: &str, transport: T) -> Result<Self, ClientError> {
        Ok(Self::new(Url::parse(base_url)?, transport))
    }

    /// Create a client against [`DEFAULT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] if the default URL does not parse.
    pub fn with_default_url(transport: T) -> Result<Self, ClientError> {
        Self::from_base_url(DEFAULT_API_URL, transport)
    }

    /// The normalised base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Open a new changeset and return its metadata with the server id set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] on a non-200 response,
    /// [`ClientError::InvalidChangesetId`] if the body is not an id, and
    /// [`ClientError::Transport`] if the round trip fails.
    pub fn create_changeset(
        &self,
        created_by: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<ChangesetMetadata, ClientError> {
        let mut changeset = ChangesetMetadata::new(created_by, comment);
        self.open_changeset(&mut changeset)?;
        Ok(changeset)
    }

    /// Open `changeset` on the server and record the assigned id.
    ///
    /// The id is left untouched when the request fails.
    ///
    /// # Errors
    ///
    /// As for [`OsmApiClient::create_changeset`].
    pub fn open_changeset(&self, changeset: &mut ChangesetMetadata) -> Result<u64, ClientError> {
        let url = self.endpoint("api/0.6/changeset/create")?;
        let body = changeset.to_xml()?;
        debug!("creating changeset at {url}");
        let response = self.send(Method::Put, url, Some(body))?;
        let trimmed = response.body.trim();
        let id = trimmed
            .parse::<u64>()
            .map_err(|source| ClientError::InvalidChangesetId {
                body: response.body.clone(),
                source,
            })?;
        changeset.assign_id(id);
        debug!("created changeset {id}");
        Ok(id)
    }

    /// Close `changeset` on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnassignedChangeset`] if the changeset has no
    /// id, [`ClientError::Api`] on a non-200 response and
    /// [`ClientError::Transport`] if the round trip fails.
    pub fn close_changeset(&self, changeset: &ChangesetMetadata) -> Result<(), ClientError> {
        let id = changeset.id().ok_or(ClientError::UnassignedChangeset)?;
        let url = self.endpoint(&format!("api/0.6/changeset/{id}/close"))?;
        debug!("closing changeset {id}");
        self.send(Method::Put, url, None)?;
        Ok(())
    }

    /// Upload `change` to its changeset and return the raw `diffResult`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnassignedChangeset`] if the change's
    /// changeset has no id, [`ClientError::Xml`] if rendering fails,
    /// [`ClientError::Api`] on a non-200 response and
    /// [`ClientError::Transport`] if the round trip fails.
    pub fn diff_upload(&self, change: &OsmChange<'_>) -> Result<String, ClientError> {
        let id = change
            .changeset()
            .id()
            .ok_or(ClientError::UnassignedChangeset)?;
        let url = self.endpoint(&format!("api/0.6/changeset/{id}/upload"))?;
        let body = change.to_xml()?;
        debug!(
            "uploading {} elements to changeset {id} ({} bytes)",
            change.len(),
            body.len()
        );
        let response = self.send(Method::Post, url, Some(body))?;
        Ok(response.body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<TransportResponse, ClientError> {
        let response = self
            .transport
            .send(SignedRequest { method, url, body })
            .map_err(ClientError::Transport)?;
        if response.status != STATUS_OK {
            debug!("request failed with status {}", response.status);
            return Err(ClientError::Api {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }
}
