//! Core model for composing OpenStreetMap changesets from geometries.
//!
//! Responsibilities:
//! - Normalise heterogeneous geometry inputs ([`IntoGeometry`]).
//! - Register nodes, ways and multipolygon relations with placeholder ids
//!   ([`OsmChange`]).
//! - Render the `osmChange` and changeset XML documents ([`xml`]).
//!
//! Boundaries:
//! - No network or file I/O; transmission lives in `osmchange-api`.
//! - Only creation is modelled: no modify or delete, no relation roles
//!   beyond `outer` and `inner`.
//!
//! Invariants:
//! - No global mutable state; a change is owned by one caller at a time.

#![forbid(unsafe_code)]

pub mod change;
pub mod changeset;
pub mod geometry;
pub mod ids;
pub mod xml;

pub use change::{Member, MemberRole, Multipolygon, Node, OsmChange, Tags, Way};
pub use changeset::ChangesetMetadata;
pub use geometry::{Geometry, GeometryKind, GeometryRecord, IntoGeometry, InvalidGeometry};
pub use ids::{NodeId, RelationId, WayId};
pub use xml::XmlError;
