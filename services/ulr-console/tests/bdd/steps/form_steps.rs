//! BDD step definitions for request form validation

use cucumber::{given, then, when};

use ulr_console::form::{Field, FormController, Submission};

use crate::world::ConsoleWorld;

fn parse_field(name: &str) -> Field {
    name.parse()
        .unwrap_or_else(|_| panic!("Unknown field: {}", name))
}

#[given("a fresh request form")]
fn fresh_form(world: &mut ConsoleWorld) {
    world.form = Some(FormController::new());
}

#[given("a simulator that accepts requests")]
fn simulator_accepting(world: &mut ConsoleWorld) {
    world.simulator().reject_submissions(None);
}

#[when(expr = "the {string} field is set to {string}")]
fn set_field(world: &mut ConsoleWorld, field: String, value: String) {
    let form = world.form.as_mut().expect("form not set");
    form.edit(parse_field(&field), &value);
}

#[when("the form is validated")]
fn validate_form(world: &mut ConsoleWorld) {
    let form = world.form.as_mut().expect("form not set");
    form.validate();
}

#[when("the form is submitted")]
async fn submit_form(world: &mut ConsoleWorld) {
    let simulator = world.simulator();
    let form = world.form.as_mut().expect("form not set");
    world.submission = Some(form.submit(simulator.as_ref()).await);
}

#[then("the form should have no errors")]
fn form_has_no_errors(world: &mut ConsoleWorld) {
    let form = world.form.as_ref().expect("form not set");
    assert!(form.errors().is_empty(), "{:?}", form.errors());
}

#[then(regex = r#"^the "(\w+)" field should be (accepted|rejected)$"#)]
fn field_verdict(world: &mut ConsoleWorld, field: String, verdict: String) {
    let form = world.form.as_ref().expect("form not set");
    let error = form.errors().get(parse_field(&field));
    match verdict.as_str() {
        "accepted" => assert_eq!(error, None),
        _ => assert!(error.is_some(), "expected an error on {}", field),
    }
}

#[then(expr = "the {string} value should be {int}")]
fn field_value(world: &mut ConsoleWorld, field: String, expected: i64) {
    let form = world.form.as_ref().expect("form not set");
    let values = form.values();
    let actual = match parse_field(&field) {
        Field::RatType => values.rat_type,
        Field::UlrFlags => values.ulr_flags,
        other => panic!("{} is not an integer field", other),
    };
    assert_eq!(actual, expected);
}

#[then(expr = "the submission should be rejected for exactly {string}")]
fn rejected_for_exactly(world: &mut ConsoleWorld, field: String) {
    match world.submission.as_ref().expect("no submission") {
        Submission::Rejected(errors) => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![parse_field(&field)]);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}
