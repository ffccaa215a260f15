//! Turn GeoJSON features into OSM elements.
//!
//! `Point` features become nodes, `LineString` features become ways and
//! `Polygon`/`MultiPolygon` features become multipolygon relations. Scalar
//! properties become tags; features without a supported geometry are skipped
//! with a warning.

use std::io::BufReader;

use camino::Utf8Path;
use geojson::{Feature, GeoJson, JsonObject, JsonValue, Value};
use log::{debug, warn};
use osmchange_core::{OsmChange, Tags};

use crate::CliError;
use crate::fs::open_utf8_file;

/// Counts of what a GeoJSON document contributed to a change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub(crate) nodes: usize,
    pub(crate) ways: usize,
    pub(crate) relations: usize,
    pub(crate) skipped: usize,
}

/// Load a GeoJSON document from disk.
pub(crate) fn load_geojson(path: &Utf8Path) -> Result<GeoJson, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenGeoJson {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseGeoJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Register every supported feature of `geojson` with `change`.
///
/// Features are numbered from zero in document order; a bare geometry or
/// single feature is feature 0.
pub(crate) fn import_geojson(
    change: &mut OsmChange<'_>,
    geojson: &GeoJson,
) -> Result<ImportSummary, CliError> {
    let mut summary = ImportSummary::default();
    match geojson {
        GeoJson::Geometry(geometry) => {
            import_geometry(change, 0, geometry, Tags::new(), &mut summary)?;
        }
        GeoJson::Feature(feature) => import_feature(change, 0, feature, &mut summary)?,
        GeoJson::FeatureCollection(collection) => {
            for (index, feature) in collection.features.iter().enumerate() {
                import_feature(change, index, feature, &mut summary)?;
            }
        }
    }
    debug!(
        "imported {} nodes, {} ways and {} relations ({} features skipped)",
        summary.nodes, summary.ways, summary.relations, summary.skipped
    );
    Ok(summary)
}

fn import_feature(
    change: &mut OsmChange<'_>,
    index: usize,
    feature: &Feature,
    summary: &mut ImportSummary,
) -> Result<(), CliError> {
    let Some(geometry) = &feature.geometry else {
        warn!("skipping feature {index}: no geometry");
        summary.skipped += 1;
        return Ok(());
    };
    let tags = properties_to_tags(feature.properties.as_ref());
    import_geometry(change, index, geometry, tags, summary)
}

fn import_geometry(
    change: &mut OsmChange<'_>,
    index: usize,
    geometry: &geojson::Geometry,
    tags: Tags,
    summary: &mut ImportSummary,
) -> Result<(), CliError> {
    let invalid = |source| CliError::InvalidFeature { index, source };
    match &geometry.value {
        Value::Point(_) => {
            change.create_node(geometry, tags).map_err(invalid)?;
            summary.nodes += 1;
        }
        Value::LineString(_) => {
            change.create_way(geometry, tags).map_err(invalid)?;
            summary.ways += 1;
        }
        Value::Polygon(_) | Value::MultiPolygon(_) => {
            change.create_multipolygon(geometry, tags).map_err(invalid)?;
            summary.relations += 1;
        }
        Value::MultiPoint(_) => skip(index, "MultiPoint", summary),
        Value::MultiLineString(_) => skip(index, "MultiLineString", summary),
        Value::GeometryCollection(_) => skip(index, "GeometryCollection", summary),
    }
    Ok(())
}

fn skip(index: usize, kind: &str, summary: &mut ImportSummary) {
    warn!("skipping feature {index}: {kind} geometries are not supported");
    summary.skipped += 1;
}

/// Convert scalar feature properties to OSM tags.
///
/// Strings are kept as-is, numbers and booleans use their JSON text, and
/// nulls, arrays and objects are dropped.
pub(crate) fn properties_to_tags(properties: Option<&JsonObject>) -> Tags {
    properties
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| tag_value(value).map(|value| (key.clone(), value)))
        .collect()
}

fn tag_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
