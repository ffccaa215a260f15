//! Test helpers for writing GeoJSON inputs and scripting the API.

use super::*;
use crate::upload::{UploadConfig, UploadTransportBuilder};
use camino::Utf8Path;
use osmchange_api::SignedTransport;
use osmchange_api::test_support::StubTransport;

pub(super) const FEATURE_COLLECTION: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": {"type": "Point", "coordinates": [13.4, 52.5]},
      "properties": {"amenity": "bench", "backrest": true, "seats": 3, "note": null}
    },
    {
      "type": "Feature",
      "geometry": {"type": "LineString", "coordinates": [[13.4, 52.5], [13.41, 52.51]]},
      "properties": {"highway": "footway"}
    }
  ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test input");
}

/// Hands out a shared [`StubTransport`] instead of a network client.
#[derive(Debug, Default)]
pub(super) struct StubTransportBuilder {
    pub(super) transport: StubTransport,
}

impl UploadTransportBuilder for StubTransportBuilder {
    fn build<'a>(
        &'a self,
        _config: &UploadConfig,
    ) -> Result<Box<dyn SignedTransport + 'a>, CliError> {
        Ok(Box::new(&self.transport))
    }
}

pub(super) fn parse_upload(argv: &[&str]) -> Result<crate::upload::UploadArgs, CliError> {
    let mut invocation = vec!["osmchange", "upload"];
    invocation.extend_from_slice(argv);
    let cli = Cli::try_parse_from(invocation)?;
    let Command::Upload(args) = cli.command;
    Ok(args)
}
