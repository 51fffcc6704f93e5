//! BDD step definitions for response validation

use cucumber::{given, then, when};

use homework_watcher::validator::validate;
use homework_watcher::WatcherError;

use crate::world::WatcherWorld;

#[given(regex = r"^an API response '(.*)'$")]
fn api_response(world: &mut WatcherWorld, body: String) {
    world.response = Some(serde_json::from_str(&body).expect("scenario JSON is invalid"));
}

#[when("the response is validated")]
fn validate_response(world: &mut WatcherWorld) {
    let response = world.response.take().expect("response not set");
    world.validation_result = Some(validate(response));
}

#[then(expr = "validation should succeed with {int} homework(s)")]
fn validation_succeeds(world: &mut WatcherWorld, count: usize) {
    let result = world.validation_result.as_ref().expect("no result");
    let validated = result.as_ref().unwrap();
    assert_eq!(validated.homeworks().len(), count);
}

#[then(expr = "validation should fail with a schema error mentioning {string}")]
fn validation_fails(world: &mut WatcherWorld, detail: String) {
    let result = world.validation_result.as_ref().expect("no result");
    match result {
        Err(WatcherError::Schema(msg)) => assert!(msg.contains(&detail), "{msg}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}
