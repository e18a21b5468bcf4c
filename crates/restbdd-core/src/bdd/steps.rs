//! Step vocabulary registered with cucumber

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use crate::bdd::world::ApiWorld;
use crate::error::{HarnessError, HarnessResult};

#[given("I have a base URI")]
fn base_uri(world: &mut ApiWorld) -> HarnessResult<()> {
    world.executor.base_uri(&mut world.context)
}

#[when(expr = "I send a {word} request to {string}")]
async fn send_request(world: &mut ApiWorld, method: String, path: String) -> HarnessResult<()> {
    world
        .executor
        .send_request(&mut world.context, &method, &path)
        .await
}

#[given("I have the following request body:")]
fn request_body(world: &mut ApiWorld, step: &Step) -> HarnessResult<()> {
    let body = match step.docstring.as_deref() {
        Some(docstring) => docstring_text(docstring),
        None => {
            let err = HarnessError::InvalidArgument(
                "Step expects the request body as a doc string".to_string(),
            );
            return Err(world.context.log_mut().fail("Failed to set request body", err));
        }
    };
    world.executor.set_body(&mut world.context, body)
}

#[then(expr = "the response status code should be {int}")]
fn status_code(world: &mut ApiWorld, expected: u16) -> HarnessResult<()> {
    world.executor.assert_status(&mut world.context, expected)
}

#[then(expr = "the response should have field {string} with value {string}")]
fn field_value(world: &mut ApiWorld, field: String, expected: String) -> HarnessResult<()> {
    world
        .executor
        .assert_field(&mut world.context, &field, &expected)
}

#[then(expr = "the response should contain {string}")]
fn body_contains(world: &mut ApiWorld, text: String) -> HarnessResult<()> {
    world.executor.assert_contains(&mut world.context, &text)
}

#[then(expr = "the response should have field {string} at index {int} with value {string}")]
fn field_at_index(
    world: &mut ApiWorld,
    field: String,
    index: i64,
    expected: String,
) -> HarnessResult<()> {
    world
        .executor
        .assert_field_at_index(&mut world.context, &field, index, &expected)
}

#[then(expr = "the response should have {int} items in data array")]
fn data_items(world: &mut ApiWorld, expected: usize) -> HarnessResult<()> {
    world.executor.assert_item_count(&mut world.context, expected)
}

/// Doc strings keep the newlines around their content; the body does not
fn docstring_text(docstring: &str) -> &str {
    docstring.trim_matches(|c| c == '\n' || c == '\r')
}
