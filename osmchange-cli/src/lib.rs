//! Command-line interface for uploading GeoJSON to OpenStreetMap.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod features;
mod fs;
mod upload;

pub use error::CliError;
use upload::{UploadArgs, run_upload};

pub(crate) const ARG_GEOJSON: &str = "geojson";
pub(crate) const ARG_COMMENT: &str = "comment";
pub(crate) const ARG_CREATED_BY: &str = "created-by";
pub(crate) const ARG_API_URL: &str = "api-url";
pub(crate) const ARG_ACCESS_TOKEN: &str = "access-token";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_DRY_RUN: &str = "dry-run";
pub(crate) const ENV_GEOJSON: &str = "OSMCHANGE_CMDS_UPLOAD_GEOJSON";
pub(crate) const ENV_ACCESS_TOKEN: &str = "OSMCHANGE_CMDS_UPLOAD_ACCESS_TOKEN";

/// Run the osmchange CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Upload(args) => run_upload(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmchange",
    about = "Upload GeoJSON features to OpenStreetMap as a changeset",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a changeset from a GeoJSON file and upload it.
    Upload(UploadArgs),
}

#[cfg(test)]
mod tests;
