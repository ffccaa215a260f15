//! Adapters from the `geo` and `geojson` ecosystems.

use geo::{Coord, CoordsIter};

use super::record::position_from_slice;
use super::{Geometry, GeometryKind, IntoGeometry, InvalidGeometry, PolygonRings, Ring};

impl IntoGeometry for Coord<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(Geometry::Point(self))
    }
}

impl IntoGeometry for geo::Point<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(Geometry::Point(self.0))
    }
}

impl IntoGeometry for geo::LineString<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(Geometry::LineString(self.0))
    }
}

impl IntoGeometry for geo::Polygon<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(Geometry::Polygon(polygon_rings(&self)))
    }
}

impl IntoGeometry for geo::MultiPolygon<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        Ok(Geometry::MultiPolygon(
            self.0.iter().map(polygon_rings).collect(),
        ))
    }
}

impl IntoGeometry for geo::Geometry<f64> {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        match self {
            Self::Point(point) => point.into_geometry(),
            Self::Line(line) => Ok(Geometry::LineString(line.coords_iter().collect())),
            Self::LineString(line) => line.into_geometry(),
            Self::Polygon(polygon) => polygon.into_geometry(),
            Self::MultiPolygon(polygons) => polygons.into_geometry(),
            Self::Rect(rect) => rect.to_polygon().into_geometry(),
            Self::Triangle(triangle) => triangle.to_polygon().into_geometry(),
            Self::MultiPoint(_) => Err(InvalidGeometry::UnsupportedType("MultiPoint")),
            Self::MultiLineString(_) => Err(InvalidGeometry::UnsupportedType("MultiLineString")),
            Self::GeometryCollection(_) => {
                Err(InvalidGeometry::UnsupportedType("GeometryCollection"))
            }
        }
    }
}

fn polygon_rings(polygon: &geo::Polygon<f64>) -> PolygonRings {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.0.clone())
        .collect()
}

impl IntoGeometry for geojson::Geometry {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        self.value.into_geometry()
    }
}

impl IntoGeometry for &geojson::Geometry {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        (&self.value).into_geometry()
    }
}

impl IntoGeometry for geojson::Value {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        (&self).into_geometry()
    }
}

impl IntoGeometry for &geojson::Value {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        match self {
            geojson::Value::Point(position) => {
                position_from_slice(position, GeometryKind::Point).map(Geometry::Point)
            }
            geojson::Value::LineString(line) => {
                geojson_ring(line, GeometryKind::LineString).map(Geometry::LineString)
            }
            geojson::Value::Polygon(rings) => {
                geojson_polygon(rings, GeometryKind::Polygon).map(Geometry::Polygon)
            }
            geojson::Value::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| geojson_polygon(rings, GeometryKind::MultiPolygon))
                .collect::<Result<Vec<_>, _>>()
                .map(Geometry::MultiPolygon),
            geojson::Value::MultiPoint(_) => Err(InvalidGeometry::UnsupportedType("MultiPoint")),
            geojson::Value::MultiLineString(_) => {
                Err(InvalidGeometry::UnsupportedType("MultiLineString"))
            }
            geojson::Value::GeometryCollection(_) => {
                Err(InvalidGeometry::UnsupportedType("GeometryCollection"))
            }
        }
    }
}

fn geojson_ring(
    positions: &[geojson::Position],
    kind: GeometryKind,
) -> Result<Ring, InvalidGeometry> {
    positions
        .iter()
        .map(|position| position_from_slice(position, kind))
        .collect()
}

fn geojson_polygon(
    rings: &[Vec<geojson::Position>],
    kind: GeometryKind,
) -> Result<PolygonRings, InvalidGeometry> {
    rings.iter().map(|ring| geojson_ring(ring, kind)).collect()
}
