use thiserror::Error;

use super::GeometryKind;

/// Errors raised when a geometry cannot be turned into OSM entities.
///
/// Returned synchronously by the adapter and by every `create_*` entry point
/// of [`OsmChange`](crate::OsmChange). Entities registered before the failure
/// stay registered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGeometry {
    /// The record carried no `type` member.
    #[error("geometry record has no type")]
    MissingType,
    /// The `type` member named a geometry this library does not know.
    #[error("unrecognised geometry type {0:?}")]
    UnknownType(String),
    /// A recognised geometry that has no OSM representation here.
    #[error("{0} geometries cannot be converted into OSM entities")]
    UnsupportedType(&'static str),
    /// The geometry kind does not match the entity being created.
    #[error("expected {expected} geometry, found {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: GeometryKind,
    },
    /// Coordinates were missing or empty.
    #[error("{kind} geometry has no coordinates")]
    EmptyCoordinates { kind: GeometryKind },
    /// Coordinates did not follow the nesting expected for the kind.
    #[error("{kind} coordinates are malformed: {reason}")]
    MalformedCoordinates {
        kind: GeometryKind,
        reason: &'static str,
    },
    /// A longitude or latitude was NaN or infinite.
    #[error("coordinate ({lon}, {lat}) is not finite")]
    NonFiniteCoordinate { lon: f64, lat: f64 },
}
