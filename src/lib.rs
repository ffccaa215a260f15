//! Facade crate for composing and uploading OpenStreetMap changesets.
//!
//! This crate re-exports the changeset model and, behind the `http` feature,
//! the API client and its `reqwest` transport.

#![forbid(unsafe_code)]

pub use osmchange_core::{
    ChangesetMetadata, Geometry, GeometryKind, GeometryRecord, IntoGeometry, InvalidGeometry,
    Member, MemberRole, Multipolygon, Node, NodeId, OsmChange, RelationId, Tags, Way, WayId,
    XmlError,
};

#[cfg(feature = "http")]
pub use osmchange_api::{
    ClientError, HttpTransport, HttpTransportBuildError, HttpTransportConfig, Method,
    OsmApiClient, SignedRequest, SignedTransport, TransportError, TransportResponse,
};
