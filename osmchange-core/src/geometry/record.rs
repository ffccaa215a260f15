//! The raw `{type, coordinates}` record shape.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Geometry, GeometryKind, IntoGeometry, InvalidGeometry, PolygonRings, Ring};

/// A geometry in its canonical record shape.
///
/// `coordinates` stays as raw JSON until conversion so that malformed input
/// is reported as [`InvalidGeometry`] rather than a deserialisation failure.
///
/// # Examples
///
/// ```
/// use osmchange_core::{GeometryKind, GeometryRecord, IntoGeometry};
/// use serde_json::json;
///
/// let record = GeometryRecord::new("LineString", json!([[0.0, 0.0], [1.0, 1.0]]));
/// let geometry = record.into_geometry()?;
/// assert_eq!(geometry.kind(), GeometryKind::LineString);
/// # Ok::<(), osmchange_core::InvalidGeometry>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    /// Geometry type tag, e.g. `"Polygon"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Coordinates nested per the kind; missing means empty.
    #[serde(default)]
    pub coordinates: Value,
}

impl GeometryRecord {
    /// Build a record from a type tag and its coordinates.
    pub fn new(kind: impl Into<String>, coordinates: Value) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
        }
    }
}

impl IntoGeometry for GeometryRecord {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        parse_geometry(&self.kind, &self.coordinates)
    }
}

impl IntoGeometry for &GeometryRecord {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        parse_geometry(&self.kind, &self.coordinates)
    }
}

impl IntoGeometry for &Value {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        let kind = self
            .get("type")
            .and_then(Value::as_str)
            .ok_or(InvalidGeometry::MissingType)?;
        let coordinates = self.get("coordinates").unwrap_or(&Value::Null);
        parse_geometry(kind, coordinates)
    }
}

impl IntoGeometry for Value {
    fn into_geometry(self) -> Result<Geometry, InvalidGeometry> {
        (&self).into_geometry()
    }
}

fn parse_geometry(kind: &str, coordinates: &Value) -> Result<Geometry, InvalidGeometry> {
    let kind: GeometryKind = kind.parse()?;
    match kind {
        GeometryKind::Point => parse_position(coordinates, kind).map(Geometry::Point),
        GeometryKind::LineString => parse_ring(coordinates, kind).map(Geometry::LineString),
        GeometryKind::LinearRing => parse_ring(coordinates, kind).map(Geometry::LinearRing),
        GeometryKind::Polygon => parse_polygon(coordinates, kind).map(Geometry::Polygon),
        GeometryKind::MultiPolygon => elements(coordinates, kind)?
            .iter()
            .map(|polygon| parse_polygon(polygon, kind))
            .collect::<Result<Vec<_>, _>>()
            .map(Geometry::MultiPolygon),
    }
}

/// Borrow the members of a JSON array; `null` counts as empty.
fn elements(value: &Value, kind: GeometryKind) -> Result<&[Value], InvalidGeometry> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Null => Ok(&[]),
        _ => Err(InvalidGeometry::MalformedCoordinates {
            kind,
            reason: "expected an array",
        }),
    }
}

fn parse_position(value: &Value, kind: GeometryKind) -> Result<Coord<f64>, InvalidGeometry> {
    let members = elements(value, kind)?;
    if members.is_empty() {
        return Err(InvalidGeometry::EmptyCoordinates { kind });
    }
    let numbers = members
        .iter()
        .map(|member| {
            member.as_f64().ok_or(InvalidGeometry::MalformedCoordinates {
                kind,
                reason: "position members must be numbers",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    position_from_slice(&numbers, kind)
}

fn parse_ring(value: &Value, kind: GeometryKind) -> Result<Ring, InvalidGeometry> {
    elements(value, kind)?
        .iter()
        .map(|position| parse_position(position, kind))
        .collect()
}

fn parse_polygon(value: &Value, kind: GeometryKind) -> Result<PolygonRings, InvalidGeometry> {
    elements(value, kind)?
        .iter()
        .map(|ring| parse_ring(ring, kind))
        .collect()
}

/// Read `[lon, lat, ...]`, ignoring any elevation or measure members.
pub(super) fn position_from_slice(
    numbers: &[f64],
    kind: GeometryKind,
) -> Result<Coord<f64>, InvalidGeometry> {
    match numbers {
        [] => Err(InvalidGeometry::EmptyCoordinates { kind }),
        [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
        [_] => Err(InvalidGeometry::MalformedCoordinates {
            kind,
            reason: "a position needs a longitude and a latitude",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn parses_point_record() {
        let geometry = json!({"type": "Point", "coordinates": [13.4, 52.5]})
            .into_geometry()
            .expect("point should parse");
        assert_eq!(geometry, Geometry::Point(Coord { x: 13.4, y: 52.5 }));
    }

    #[rstest]
    fn ignores_elevation() {
        let geometry = GeometryRecord::new("Point", json!([1.0, 2.0, 35.0]))
            .into_geometry()
            .expect("3D point should parse");
        assert_eq!(geometry, Geometry::Point(Coord { x: 1.0, y: 2.0 }));
    }

    #[rstest]
    fn parses_polygon_with_hole() {
        let record = json!({
            "type": "Polygon",
            "coordinates": [
                [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]],
                [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]
            ]
        });
        let Geometry::Polygon(rings) = record.into_geometry().expect("polygon should parse")
        else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], Coord { x: 1.0, y: 1.0 });
    }

    #[rstest]
    fn deserialises_record_with_missing_coordinates() {
        let record: GeometryRecord =
            serde_json::from_str(r#"{"type": "LineString"}"#).expect("record should decode");
        assert_eq!(record.coordinates, Value::Null);
        assert_eq!(
            record.into_geometry(),
            Ok(Geometry::LineString(Vec::new()))
        );
    }

    #[rstest]
    #[case(json!({"type": "Point", "coordinates": []}), InvalidGeometry::EmptyCoordinates { kind: GeometryKind::Point })]
    #[case(json!({"type": "Point"}), InvalidGeometry::EmptyCoordinates { kind: GeometryKind::Point })]
    #[case(json!({"type": "Hexagon", "coordinates": [0.0, 0.0]}), InvalidGeometry::UnknownType("Hexagon".to_owned()))]
    #[case(json!({"coordinates": [0.0, 0.0]}), InvalidGeometry::MissingType)]
    #[case(
        json!({"type": "Point", "coordinates": [1.0]}),
        InvalidGeometry::MalformedCoordinates {
            kind: GeometryKind::Point,
            reason: "a position needs a longitude and a latitude",
        }
    )]
    #[case(
        json!({"type": "Point", "coordinates": ["1", "2"]}),
        InvalidGeometry::MalformedCoordinates {
            kind: GeometryKind::Point,
            reason: "position members must be numbers",
        }
    )]
    #[case(
        json!({"type": "LineString", "coordinates": [1.0, 2.0]}),
        InvalidGeometry::MalformedCoordinates {
            kind: GeometryKind::LineString,
            reason: "expected an array",
        }
    )]
    fn rejects_malformed_records(#[case] record: Value, #[case] expected: InvalidGeometry) {
        assert_eq!(record.into_geometry(), Err(expected));
    }
}
