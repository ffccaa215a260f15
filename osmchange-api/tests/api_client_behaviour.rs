//! Behavioural tests for [`OsmApiClient`] against a scripted transport.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

use osmchange_api::test_support::StubTransport;
use osmchange_api::{ClientError, Method, OsmApiClient};
use osmchange_core::{ChangesetMetadata, OsmChange, Tags};

const BASE_URL: &str = "https://osm.test/";
const DIFF_RESULT: &str =
    r#"<diffResult version="0.6"><node old_id="-1" new_id="4242" new_version="1"/></diffResult>"#;

/// What the client produced during a scenario.
#[derive(Debug, Default)]
struct Session {
    changeset: Option<ChangesetMetadata>,
    diff_result: Option<String>,
    error: Option<ClientError>,
}

#[fixture]
fn transport() -> StubTransport {
    StubTransport::new()
}

#[fixture]
fn session() -> RefCell<Session> {
    RefCell::new(Session::default())
}

fn client(transport: &StubTransport) -> OsmApiClient<&StubTransport> {
    OsmApiClient::from_base_url(BASE_URL, transport).expect("base url should parse")
}

// --- Given steps ---

#[given("a server that assigns changeset 12345")]
fn server_assigns_id(#[from(transport)] transport: &StubTransport) {
    transport.push_response(200, "12345");
}

#[given("a server that rejects requests with status 409")]
fn server_conflicts(#[from(transport)] transport: &StubTransport) {
    transport.push_response(409, "Changeset conflict");
}

#[given("the server accepts the next two requests")]
fn server_accepts(#[from(transport)] transport: &StubTransport) {
    transport.push_response(200, DIFF_RESULT);
    transport.push_response(200, "");
}

// --- When steps ---

#[when("I create a changeset")]
fn create_changeset(
    #[from(transport)] transport: &StubTransport,
    #[from(session)] session: &RefCell<Session>,
) {
    let mut session = session.borrow_mut();
    match client(transport).create_changeset("behaviour", "Add a bench") {
        Ok(changeset) => session.changeset = Some(changeset),
        Err(err) => session.error = Some(err),
    }
}

#[when("I upload one node and close the changeset")]
fn upload_and_close(
    #[from(transport)] transport: &StubTransport,
    #[from(session)] session: &RefCell<Session>,
) {
    let mut session = session.borrow_mut();
    let changeset = session.changeset.clone().expect("changeset was created");
    let api = client(transport);
    let mut change = OsmChange::new(&changeset);
    change
        .create_node(
            Coord { x: 13.4, y: 52.5 },
            Tags::from([("amenity".to_owned(), "bench".to_owned())]),
        )
        .expect("node should register");
    let diff_result = api.diff_upload(&change).expect("upload should succeed");
    api.close_changeset(&changeset)
        .expect("close should succeed");
    session.diff_result = Some(diff_result);
}

// --- Then steps ---

#[then("the changeset id is 12345")]
fn changeset_id_assigned(#[from(session)] session: &RefCell<Session>) {
    let session = session.borrow();
    let changeset = session.changeset.as_ref().expect("changeset was created");
    assert_eq!(changeset.id(), Some(12345));
}

#[then("one PUT request was sent to the create endpoint")]
fn single_create_request(#[from(transport)] transport: &StubTransport) {
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Put);
    assert_eq!(
        requests[0].url.as_str(),
        "https://osm.test/api/0.6/changeset/create"
    );
}

#[then("an API error with status 409 is returned")]
fn api_error_returned(#[from(session)] session: &RefCell<Session>) {
    let session = session.borrow();
    assert!(
        matches!(session.error, Some(ClientError::Api { status: 409, .. })),
        "unexpected outcome {:?}",
        session.error
    );
}

#[then("no changeset id was assigned")]
fn no_changeset(#[from(session)] session: &RefCell<Session>) {
    assert!(session.borrow().changeset.is_none());
}

#[then("the diff result is returned verbatim")]
fn diff_result_returned(#[from(session)] session: &RefCell<Session>) {
    assert_eq!(session.borrow().diff_result.as_deref(), Some(DIFF_RESULT));
}

#[then("the requests were create, upload and close in order")]
fn requests_in_order(#[from(transport)] transport: &StubTransport) {
    let calls: Vec<(Method, String)> = transport
        .requests()
        .into_iter()
        .map(|request| (request.method, request.url.path().to_owned()))
        .collect();
    assert_eq!(
        calls,
        vec![
            (Method::Put, "/api/0.6/changeset/create".to_owned()),
            (Method::Post, "/api/0.6/changeset/12345/upload".to_owned()),
            (Method::Put, "/api/0.6/changeset/12345/close".to_owned()),
        ]
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/api_client.feature", name = $title)]
        fn $fn_name(transport: StubTransport, session: RefCell<Session>) {
            let _ = (transport, session);
        }
    };
}

register_scenario!(opening_a_changeset, "opening a changeset");
register_scenario!(conflicting_changeset, "a conflicting changeset request");
register_scenario!(upload_and_close_flow, "uploading and closing a changeset");
