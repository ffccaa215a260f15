//! Canonical geometry representation accepted by the changeset builder.
//!
//! Callers hand the builder anything implementing [`IntoGeometry`]: the
//! [`Geometry`] sum type itself, a raw `{type, coordinates}` record
//! ([`GeometryRecord`] or a `serde_json::Value`), a GeoJSON geometry, or a
//! `geo` primitive. Every input is normalised into [`Geometry`] before any
//! entity is registered.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`.

use std::fmt;
use std::str::FromStr;

use geo::Coord;

mod convert;
mod error;
mod record;

pub use error::InvalidGeometry;
pub use record::GeometryRecord;

/// An ordered sequence of coordinates forming a line or ring.
pub type Ring = Vec<Coord<f64>>;

/// A polygon as its rings: the exterior first, then any interiors.
pub type PolygonRings = Vec<Ring>;

/// Geometry type tags understood by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// An open sequence of positions.
    LineString,
    /// A closed sequence of positions.
    LinearRing,
    /// One exterior ring with optional holes.
    Polygon,
    /// A collection of polygons.
    MultiPolygon,
}

impl GeometryKind {
    /// The canonical type string, as found in a record's `type` member.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::LinearRing => "LinearRing",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = InvalidGeometry;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Point" => Ok(Self::Point),
            "LineString" => Ok(Self::LineString),
            "LinearRing" => Ok(Self::LinearRing),
            "Polygon" => Ok(Self::Polygon),
            "MultiPolygon" => Ok(Self::MultiPolygon),
            other => Err(InvalidGeometry::UnknownType(other.to_owned())),
        }
    }
}

/// A normalised geometry carrying its coordinate payload.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use osmchange_core::{Geometry, GeometryKind};
///
/// let line = Geometry::LineString(vec![
///     Coord { x: 13.40, y: 52.52 },
///     Coord { x: 13.41, y: 52.53 },
/// ]);
/// assert_eq!(line.kind(), GeometryKind::LineString);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single position.
    Point(Coord<f64>),
    /// An open line.
    LineString(Ring),
    /// A closed ring. Closure is not checked.
    LinearRing(Ring),
    /// Exterior ring followed by interior rings.
    Polygon(PolygonRings),
    /// Polygons in input order.
    MultiPolygon(Vec<PolygonRings>),
}

impl Geometry {
    /// The type tag of this geometry.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::LinearRing(_) => GeometryKind::LinearRing,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }
}

/// Conversion into the canonical [`Geometry`] representation.
///
/// This is the seam through which heterogeneous inputs reach the builder.
/// Implement it for your own geometry types to pass them straight to
/// [`OsmChange`](crate::OsmChange).
///
/// # Examples
///
/// ```
/// use osmchange_core::{Geometry, GeometryKind, IntoGeometry};
/// use serde_json::json;
///
/// let point = json!({"type": "Point", "coordinates": [13.4, 52.5]}).into_geometry()?;
/// assert_eq!(point.kind(), GeometryKind::Point);
/// # Ok::<(), osmchange_core::InvalidGeometry>(())
/// ```
pub trait IntoGeometry {
    /// Normalise `self`, failing when the input is not a usable geometry.
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry>;
}

impl IntoGeometry for Geometry {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(self)
    }
}

impl IntoGeometry for &Geometry {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Point", GeometryKind::Point)]
    #[case("LineString", GeometryKind::LineString)]
    #[case("LinearRing", GeometryKind::LinearRing)]
    #[case("Polygon", GeometryKind::Polygon)]
    #[case("MultiPolygon", GeometryKind::MultiPolygon)]
    fn kind_round_trips_through_its_name(#[case] name: &str, #[case] kind: GeometryKind) {
        assert_eq!(name.parse::<GeometryKind>(), Ok(kind));
        assert_eq!(kind.to_string(), name);
    }

    #[rstest]
    #[case("point")]
    #[case("MultiPoint")]
    #[case("")]
    fn unknown_names_are_rejected(#[case] name: &str) {
        let err = name.parse::<GeometryKind>().expect_err("name should be rejected");
        assert_eq!(err, InvalidGeometry::UnknownType(name.to_owned()));
    }
}
