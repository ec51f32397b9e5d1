//! BDD step definitions for status normalization

use std::sync::Arc;

use cucumber::{given, then, when};

use ulr_console::gateway::{Gateway, HttpGateway, Source};
use ulr_console::io::HttpResponse;
use ulr_console::status::describe_error;

use crate::world::{ConsoleWorld, FixedHttpClient};

#[given(regex = r"^the client status endpoint answers (\d+) with '(.*)'$")]
fn status_endpoint_answers(world: &mut ConsoleWorld, status: u16, body: String) {
    world.status_response = Some(HttpResponse { status, body });
}

#[when("the client status is fetched")]
async fn fetch_client_status(world: &mut ConsoleWorld) {
    let response = world
        .status_response
        .clone()
        .expect("status response not set");
    let gateway = HttpGateway::new(
        "http://localhost:8080",
        Arc::new(FixedHttpClient { response }),
    );
    world.status_result = Some(gateway.fetch_status(Source::Client).await);
}

#[then(regex = r#"^the status should be (running|stopped) with message "(.*)"$"#)]
fn status_should_be(world: &mut ConsoleWorld, state: String, message: String) {
    let result = world.status_result.as_ref().expect("no fetch result");
    let status = result.as_ref().expect("fetch failed");
    assert_eq!(status.is_running, state == "running");
    assert_eq!(status.message, message);
}

#[then(expr = "the status details should be {string}")]
fn status_details_should_be(world: &mut ConsoleWorld, details: String) {
    let result = world.status_result.as_ref().expect("no fetch result");
    let status = result.as_ref().expect("fetch failed");
    assert_eq!(status.details.as_deref(), Some(details.as_str()));
}

#[then("the status should have no details")]
fn status_has_no_details(world: &mut ConsoleWorld) {
    let result = world.status_result.as_ref().expect("no fetch result");
    let status = result.as_ref().expect("fetch failed");
    assert_eq!(status.details, None);
}

#[then(expr = "the fetch should fail with {string}")]
fn fetch_should_fail_with(world: &mut ConsoleWorld, message: String) {
    let result = world.status_result.as_ref().expect("no fetch result");
    let err = result.as_ref().expect_err("fetch unexpectedly succeeded");
    assert_eq!(describe_error(err), message);
}
