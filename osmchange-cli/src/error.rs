//! Error types emitted by the osmchange CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmchange_api::{ClientError, HttpTransportBuildError};
use osmchange_core::{InvalidGeometry, XmlError};
use thiserror::Error;

/// Errors emitted by the osmchange CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the GeoJSON input failed.
    #[error("failed to open GeoJSON at {path:?}: {source}")]
    OpenGeoJson {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The GeoJSON input could not be decoded.
    #[error("failed to parse GeoJSON at {path:?}: {source}")]
    ParseGeoJson {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A feature's geometry could not be turned into OSM elements.
    #[error("feature {index} has an invalid geometry: {source}")]
    InvalidFeature {
        index: usize,
        #[source]
        source: InvalidGeometry,
    },
    /// Rendering the osmChange document failed.
    #[error("failed to render osmChange: {0}")]
    RenderChange(#[from] XmlError),
    /// Constructing the HTTP transport failed.
    #[error("failed to build HTTP transport: {0}")]
    BuildTransport(#[from] HttpTransportBuildError),
    /// A changeset API call failed.
    #[error("OSM API request failed: {0}")]
    Api(#[from] ClientError),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
