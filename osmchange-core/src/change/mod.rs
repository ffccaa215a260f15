//! Accumulate new OSM entities for a single diff upload.
//!
//! Responsibilities:
//! - Register nodes, ways and multipolygon relations built from geometries.
//! - Allocate placeholder ids, children first and the parent last.
//! - Preserve creation order, which is also serialisation order.
//!
//! Invariants:
//! - Every way node reference and every relation member refers to an entity
//!   already registered in the same change.
//! - Ids strictly decrease in creation order and are never reused.
//!
//! Failures are not transactional: when a geometry is rejected part way
//! through, the nodes and ways already created for it stay registered.

use geo::Coord;

use crate::changeset::ChangesetMetadata;
use crate::geometry::{Geometry, GeometryKind, IntoGeometry, InvalidGeometry, PolygonRings};
use crate::ids::{IdAllocator, NodeId, RelationId, WayId};

mod entities;

pub use entities::{Member, MemberRole, Multipolygon, Node, Tags, Way};

/// An osmChange document under construction.
///
/// The change borrows the [`ChangesetMetadata`] it will be uploaded to; the
/// metadata is shared, not owned, and must outlive the change.
///
/// # Examples
///
/// ```
/// use osmchange_core::{ChangesetMetadata, OsmChange, Tags};
/// use serde_json::json;
///
/// # fn main() -> Result<(), osmchange_core::InvalidGeometry> {
/// let changeset = ChangesetMetadata::new("docs", "example").with_id(42);
/// let mut change = OsmChange::new(&changeset);
///
/// let tags = Tags::from([("highway".to_owned(), "footway".to_owned())]);
/// let way = change.create_way(
///     json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}),
///     tags,
/// )?;
///
/// assert_eq!(way.get(), -3);
/// assert_eq!(change.nodes().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OsmChange<'a> {
    changeset: &'a ChangesetMetadata,
    ids: IdAllocator,
    nodes: Vec<Node>,
    ways: Vec<Way>,
    relations: Vec<Multipolygon>,
}

impl<'a> OsmChange<'a> {
    /// Start an empty change bound to `changeset`.
    #[must_use]
    pub fn new(changeset: &'a ChangesetMetadata) -> Self {
        Self {
            changeset,
            ids: IdAllocator::default(),
            nodes: Vec::new(),
            ways: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Register a node for a `Point` geometry.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGeometry`] when the input is not a point, has no
    /// coordinates or has a non-finite coordinate.
    pub fn create_node<G>(&mut self, point: G, tags: Tags) -> Result<NodeId, InvalidGeometry>
    where
        G: IntoGeometry,
    {
        match point.into_geometry()? {
            Geometry::Point(location) => self.push_node(location, tags),
            other => Err(InvalidGeometry::UnexpectedKind {
                expected: "Point",
                found: other.kind(),
            }),
        }
    }

    /// Register a way, plus one untagged node per coordinate, for a
    /// `LineString` or `LinearRing` geometry.
    ///
    /// Nodes are never deduplicated: repeated coordinates (including the
    /// closing coordinate of a ring) each get their own node.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGeometry`] for other kinds, empty coordinate
    /// sequences and non-finite coordinates.
    pub fn create_way<G>(&mut self, line: G, tags: Tags) -> Result<WayId, InvalidGeometry>
    where
        G: IntoGeometry,
    {
        match line.into_geometry()? {
            Geometry::LineString(coords) => self.push_way(&coords, tags, GeometryKind::LineString),
            Geometry::LinearRing(coords) => self.push_way(&coords, tags, GeometryKind::LinearRing),
            other => Err(InvalidGeometry::UnexpectedKind {
                expected: "LineString or LinearRing",
                found: other.kind(),
            }),
        }
    }

    /// Register a multipolygon relation for a `Polygon` or `MultiPolygon`.
    ///
    /// For each polygon in input order the exterior ring becomes an `outer`
    /// way and each interior ring an `inner` way. The relation id is
    /// allocated after all of its ways.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGeometry`] for other kinds, for geometries without
    /// polygons or rings, and for any ring the way builder rejects.
    pub fn create_multipolygon<G>(
        &mut self,
        polygon: G,
        tags: Tags,
    ) -> Result<RelationId, InvalidGeometry>
    where
        G: IntoGeometry,
    {
        let (polygons, kind) = match polygon.into_geometry()? {
            Geometry::Polygon(rings) => (vec![rings], GeometryKind::Polygon),
            Geometry::MultiPolygon(polygons) => (polygons, GeometryKind::MultiPolygon),
            other => {
                return Err(InvalidGeometry::UnexpectedKind {
                    expected: "Polygon or MultiPolygon",
                    found: other.kind(),
                });
            }
        };
        if polygons.is_empty() {
            return Err(InvalidGeometry::EmptyCoordinates { kind });
        }

        let mut members = Vec::new();
        for rings in &polygons {
            self.push_polygon_members(rings, kind, &mut members)?;
        }
        let id = self.ids.relation();
        self.relations.push(Multipolygon { id, members, tags });
        Ok(id)
    }

    fn push_polygon_members(
        &mut self,
        rings: &PolygonRings,
        kind: GeometryKind,
        members: &mut Vec<Member>,
    ) -> Result<(), InvalidGeometry> {
        let Some((exterior, interiors)) = rings.split_first() else {
            return Err(InvalidGeometry::EmptyCoordinates { kind });
        };
        let outer = self.push_way(exterior, Tags::new(), kind)?;
        members.push(Member {
            role: MemberRole::Outer,
            way: outer,
        });
        for interior in interiors {
            let inner = self.push_way(interior, Tags::new(), kind)?;
            members.push(Member {
                role: MemberRole::Inner,
                way: inner,
            });
        }
        Ok(())
    }

    fn push_way(
        &mut self,
        coords: &[Coord<f64>],
        tags: Tags,
        kind: GeometryKind,
    ) -> Result<WayId, InvalidGeometry> {
        if coords.is_empty() {
            return Err(InvalidGeometry::EmptyCoordinates { kind });
        }
        let node_refs = coords
            .iter()
            .map(|coord| self.push_node(*coord, Tags::new()))
            .collect::<Result<Vec<_>, _>>()?;
        let id = self.ids.way();
        self.ways.push(Way {
            id,
            node_refs,
            tags,
        });
        Ok(id)
    }

    fn push_node(&mut self, location: Coord<f64>, tags: Tags) -> Result<NodeId, InvalidGeometry> {
        if !(location.x.is_finite() && location.y.is_finite()) {
            return Err(InvalidGeometry::NonFiniteCoordinate {
                lon: location.x,
                lat: location.y,
            });
        }
        let id = self.ids.node();
        self.nodes.push(Node { id, location, tags });
        Ok(id)
    }

    /// The changeset this change will be uploaded to.
    #[must_use]
    pub const fn changeset(&self) -> &'a ChangesetMetadata {
        self.changeset
    }

    /// Nodes in creation order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ways in creation order.
    #[must_use]
    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    /// Multipolygon relations in creation order.
    #[must_use]
    pub fn relations(&self) -> &[Multipolygon] {
        &self.relations
    }

    /// Look up a node created by this change.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Look up a way created by this change.
    #[must_use]
    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.iter().find(|way| way.id == id)
    }

    /// Look up a multipolygon created by this change.
    #[must_use]
    pub fn relation(&self, id: RelationId) -> Option<&Multipolygon> {
        self.relations.iter().find(|relation| relation.id == id)
    }

    /// Total number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() + self.ways.len() + self.relations.len()
    }

    /// Whether nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
