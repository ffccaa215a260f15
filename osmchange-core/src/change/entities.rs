use std::collections::BTreeMap;
use std::fmt;

use geo::Coord;

use crate::ids::{NodeId, RelationId, WayId};

/// Free-form OSM key/value tags.
///
/// Ordered by key so that serialisation is deterministic.
pub type Tags = BTreeMap<String, String>;

/// A node awaiting creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Placeholder id.
    pub id: NodeId,
    /// Position with `x = longitude`, `y = latitude`; always finite.
    pub location: Coord<f64>,
    /// Tags attached to the node.
    pub tags: Tags,
}

impl Node {
    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }
}

/// A way awaiting creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    /// Placeholder id.
    pub id: WayId,
    /// Nodes in line order. Every id refers to a node of the same change.
    pub node_refs: Vec<NodeId>,
    /// Tags attached to the way.
    pub tags: Tags,
}

/// Role of a way inside a multipolygon relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRole {
    /// Exterior boundary.
    Outer,
    /// Hole.
    Inner,
}

impl MemberRole {
    /// Role string used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Inner => "inner",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A way membership inside a multipolygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Outer or inner.
    pub role: MemberRole,
    /// The member way.
    pub way: WayId,
}

/// A multipolygon relation awaiting creation.
///
/// The `type=multipolygon` tag is added on serialisation and is not stored
/// in [`Multipolygon::tags`].
#[derive(Debug, Clone, PartialEq)]
pub struct Multipolygon {
    /// Placeholder id.
    pub id: RelationId,
    /// Member ways, polygon by polygon: each exterior followed by its holes.
    pub members: Vec<Member>,
    /// Caller supplied tags.
    pub tags: Tags,
}
