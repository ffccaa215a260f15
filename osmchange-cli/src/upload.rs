//! Upload command implementation for the osmchange CLI.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmchange_api::{
    DEFAULT_API_URL, HttpTransport, HttpTransportConfig, OsmApiClient, SignedTransport,
};
use osmchange_core::changeset::{DEFAULT_COMMENT, DEFAULT_CREATED_BY};
use osmchange_core::{ChangesetMetadata, OsmChange};
use serde::{Deserialize, Serialize};

use crate::features::{ImportSummary, import_geojson, load_geojson};
use crate::{
    ARG_ACCESS_TOKEN, ARG_API_URL, ARG_COMMENT, ARG_CREATED_BY, ARG_DRY_RUN, ARG_GEOJSON,
    ARG_TIMEOUT_SECS, CliError, ENV_ACCESS_TOKEN, ENV_GEOJSON,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI arguments for the `upload` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Open a changeset, upload every Point, LineString, Polygon \
                 and MultiPolygon feature of a GeoJSON file as new nodes, \
                 ways and multipolygon relations, then close the changeset. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Upload GeoJSON features as a new changeset"
)]
#[ortho_config(prefix = "OSMCHANGE")]
pub(crate) struct UploadArgs {
    /// Path to a GeoJSON FeatureCollection, Feature or Geometry.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) geojson: Option<Utf8PathBuf>,
    /// Changeset comment.
    #[arg(long = ARG_COMMENT, value_name = "text")]
    #[serde(default)]
    pub(crate) comment: Option<String>,
    /// Changeset `created_by` tag.
    #[arg(long = ARG_CREATED_BY, value_name = "text")]
    #[serde(default)]
    pub(crate) created_by: Option<String>,
    /// Base URL of the OSM API (defaults to the development server).
    #[arg(long = ARG_API_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) api_url: Option<String>,
    /// OAuth 2 access token used as a bearer credential.
    #[arg(long = ARG_ACCESS_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Print the osmChange document instead of uploading it.
    #[arg(long = ARG_DRY_RUN)]
    #[serde(default)]
    pub(crate) dry_run: bool,
}

impl UploadArgs {
    pub(crate) fn into_config(self) -> Result<UploadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        UploadConfig::try_from(merged)
    }
}

/// Resolved `upload` command configuration.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct UploadConfig {
    /// Path to the GeoJSON input.
    pub(crate) geojson: Utf8PathBuf,
    /// Changeset comment.
    pub(crate) comment: String,
    /// Changeset `created_by` tag.
    pub(crate) created_by: String,
    /// Base URL of the OSM API.
    pub(crate) api_url: String,
    /// Bearer token; absent only for dry runs.
    pub(crate) access_token: Option<String>,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Whether to stop after rendering.
    pub(crate) dry_run: bool,
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("geojson", &self.geojson)
            .field("comment", &self.comment)
            .field("created_by", &self.created_by)
            .field("api_url", &self.api_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl UploadConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.geojson, ARG_GEOJSON)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match crate::fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn changeset(&self) -> ChangesetMetadata {
        ChangesetMetadata::new(self.created_by.as_str(), self.comment.as_str())
    }
}

impl TryFrom<UploadArgs> for UploadConfig {
    type Error = CliError;

    fn try_from(args: UploadArgs) -> Result<Self, Self::Error> {
        let geojson = args.geojson.ok_or(CliError::MissingArgument {
            field: ARG_GEOJSON,
            env: ENV_GEOJSON,
        })?;
        let access_token = match args.access_token {
            Some(token) => Some(token),
            None if args.dry_run => None,
            None => {
                return Err(CliError::MissingArgument {
                    field: ARG_ACCESS_TOKEN,
                    env: ENV_ACCESS_TOKEN,
                });
            }
        };

        Ok(Self {
            geojson,
            comment: args.comment.unwrap_or_else(|| DEFAULT_COMMENT.to_owned()),
            created_by: args
                .created_by
                .unwrap_or_else(|| DEFAULT_CREATED_BY.to_owned()),
            api_url: args.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            access_token,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            dry_run: args.dry_run,
        })
    }
}

/// Builds the transport used for one upload invocation.
pub(super) trait UploadTransportBuilder {
    fn build<'a>(
        &'a self,
        config: &UploadConfig,
    ) -> Result<Box<dyn SignedTransport + 'a>, CliError>;
}

pub(super) struct DefaultUploadTransportBuilder;

impl UploadTransportBuilder for DefaultUploadTransportBuilder {
    fn build<'a>(
        &'a self,
        config: &UploadConfig,
    ) -> Result<Box<dyn SignedTransport + 'a>, CliError> {
        let mut transport_config = HttpTransportConfig::new().with_timeout(config.timeout);
        if let Some(token) = &config.access_token {
            transport_config = transport_config.with_access_token(token.as_str());
        }
        Ok(Box::new(HttpTransport::with_config(transport_config)?))
    }
}

pub(super) fn run_upload(args: UploadArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultUploadTransportBuilder;
    run_upload_with(args, &builder, &mut stdout)
}

pub(super) fn run_upload_with(
    args: UploadArgs,
    builder: &dyn UploadTransportBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_upload_config(args)?;
    let geojson = load_geojson(&config.geojson)?;

    // Reject bad input before a changeset is opened on the server.
    let mut changeset = config.changeset();
    let preview = build_change(&changeset, &geojson)?;
    if config.dry_run {
        let xml = preview.to_xml()?;
        return write_output(writer, &xml);
    }

    let transport = builder.build(&config)?;
    let client = OsmApiClient::from_base_url(&config.api_url, &*transport)?;
    let id = client.open_changeset(&mut changeset)?;
    let change = build_change(&changeset, &geojson)?;
    let diff_result = client.diff_upload(&change)?;
    client.close_changeset(&changeset)?;
    debug!("uploaded {} elements in changeset {id}", change.len());
    write_output(writer, &diff_result)
}

fn build_change<'a>(
    changeset: &'a ChangesetMetadata,
    geojson: &geojson::GeoJson,
) -> Result<OsmChange<'a>, CliError> {
    let mut change = OsmChange::new(changeset);
    let ImportSummary { skipped, .. } = import_geojson(&mut change, geojson)?;
    if skipped > 0 {
        debug!("{skipped} features were not converted");
    }
    Ok(change)
}

fn resolve_upload_config(args: UploadArgs) -> Result<UploadConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_output(writer: &mut dyn Write, payload: &str) -> Result<(), CliError> {
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<UploadConfig, CliError> {
    let merged = UploadArgs::merge_from_layers(layers).map_err(CliError::from)?;
    UploadConfig::try_from(merged)
}
