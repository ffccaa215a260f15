//! Behaviour-driven step definitions driving the upload CLI scenarios.

use super::helpers::{FEATURE_COLLECTION, StubTransportBuilder, write_utf8};
use super::*;
use crate::upload::run_upload_with;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

const DIFF_RESULT: &str = r#"<diffResult version="0.6"/>"#;

#[derive(Debug)]
struct UploadWorld {
    _tmp: TempDir,
    input_path: Utf8PathBuf,
    dry_run: RefCell<bool>,
    include_token: RefCell<bool>,
    builder: StubTransportBuilder,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl UploadWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _tmp: tmp,
            input_path: root.join("features.geojson"),
            dry_run: RefCell::new(false),
            include_token: RefCell::new(true),
            builder: StubTransportBuilder::default(),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec![
            "osmchange".to_owned(),
            "upload".to_owned(),
            self.input_path.as_str().to_owned(),
            format!("--{ARG_API_URL}"),
            "https://osm.test/".to_owned(),
        ];
        if *self.include_token.borrow() {
            argv.extend([format!("--{ARG_ACCESS_TOKEN}"), "token".to_owned()]);
        }
        if *self.dry_run.borrow() {
            argv.push(format!("--{ARG_DRY_RUN}"));
        }
        argv
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }
}

#[fixture]
fn world() -> UploadWorld {
    UploadWorld::new()
}

#[given("a GeoJSON file with a bench and a footway")]
fn geojson_file_exists(#[from(world)] world: &UploadWorld) {
    write_utf8(&world.input_path, FEATURE_COLLECTION.as_bytes());
}

#[given("I request a dry run")]
fn request_dry_run(#[from(world)] world: &UploadWorld) {
    *world.dry_run.borrow_mut() = true;
}

#[given("I omit the access token")]
fn omit_access_token(#[from(world)] world: &UploadWorld) {
    *world.include_token.borrow_mut() = false;
}

#[given("an API that accepts the upload")]
fn api_accepts_upload(#[from(world)] world: &UploadWorld) {
    let transport = &world.builder.transport;
    transport.push_response(200, "12345");
    transport.push_response(200, DIFF_RESULT);
    transport.push_response(200, "");
}

#[when("I run the upload command")]
fn run_upload_command(#[from(world)] world: &UploadWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Upload(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_upload_with(args, &world.builder, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command prints an osmChange document")]
fn prints_osm_change(#[from(world)] world: &UploadWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = world.stdout();
    assert!(stdout.contains("<osmChange><create>"));
    assert_eq!(stdout.matches("<node ").count(), 3);
    assert_eq!(stdout.matches("<way ").count(), 1);
}

#[then("no API requests were sent")]
fn no_requests(#[from(world)] world: &UploadWorld) {
    assert!(world.builder.transport.requests().is_empty());
}

#[then("the command prints the diff result")]
fn prints_diff_result(#[from(world)] world: &UploadWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");
    assert_eq!(world.stdout(), format!("{DIFF_RESULT}\n"));
}

#[then("the changeset was created, uploaded and closed")]
fn changeset_lifecycle(#[from(world)] world: &UploadWorld) {
    let paths: Vec<String> = world
        .builder
        .transport
        .requests()
        .iter()
        .map(|request| request.url.path().to_owned())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/api/0.6/changeset/create",
            "/api/0.6/changeset/12345/upload",
            "/api/0.6/changeset/12345/close",
        ]
    );
}

#[then("the command fails because the access token is missing")]
fn fails_missing_token(#[from(world)] world: &UploadWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_ACCESS_TOKEN),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_upload_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/upload_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: UploadWorld) {
            let _ = world;
        }
    };
}

register_upload_scenario!(upload_dry_run, "previewing an upload");
register_upload_scenario!(upload_happy_path, "uploading to the API");
register_upload_scenario!(upload_missing_token, "rejecting a missing access token");
