//! Behavioural steps for listener configuration policy.
#![allow(
    clippy::expect_used,
    clippy::needless_pass_by_value,
    reason = "simplify test failure output"
)]

use cucumber::{World, given, then, when};
use junitfork_lib::{
    ListenerDefinition, ListenerType, PropertyConditions, SingleTestClass, TestClasses,
    TestDefinition,
};

#[derive(Debug, Default, World)]
pub struct ListenerWorld {
    listener: ListenerDefinition,
    named_test: Option<SingleTestClass>,
    batch: Option<TestClasses>,
    properties: PropertyConditions,
    resolved: Option<String>,
}

impl ListenerWorld {
    fn test(&self) -> Option<&dyn TestDefinition> {
        match (&self.named_test, &self.batch) {
            (Some(named), _) => Some(named),
            (None, Some(batch)) => Some(batch),
            (None, None) => None,
        }
    }
}

#[given(regex = r#"^a listener with implementation id "(.+)"$"#)]
fn listener_with_id(world: &mut ListenerWorld, id: String) {
    world.listener.set_implementation_id(id);
}

#[given(regex = r#"^a listener of type "(.+)"$"#)]
fn listener_of_type(world: &mut ListenerWorld, alias: String) {
    let listener_type: ListenerType = alias.parse().expect("known alias");
    world.listener.set_type(listener_type);
}

#[given(regex = r#"^a test named "(.+)"$"#)]
fn test_named(world: &mut ListenerWorld, name: String) {
    world.named_test = Some(SingleTestClass::new(name));
}

#[given("a batch of tests without a name")]
fn unnamed_batch(world: &mut ListenerWorld) {
    world.batch = Some(TestClasses::new(["a.ATest", "b.BTest"]));
}

#[given(regex = r#"^the explicit result file "(.+)"$"#)]
fn explicit_result_file(world: &mut ListenerWorld, file: String) {
    world.listener.set_result_file(file);
}

#[given(regex = r#"^the if condition "(.+)"$"#)]
fn if_condition(world: &mut ListenerWorld, name: String) {
    world.listener.set_if(name);
}

#[given(regex = r#"^the unless condition "(.+)"$"#)]
fn unless_condition(world: &mut ListenerWorld, name: String) {
    world.listener.set_unless(name);
}

#[given(regex = r#"^the property "(.+)" is defined$"#)]
fn property_defined(world: &mut ListenerWorld, name: String) {
    world.properties.set(name, "");
}

#[when(regex = r#"^the type "(.+)" is applied$"#)]
fn type_applied(world: &mut ListenerWorld, alias: String) {
    listener_of_type(world, alias);
}

#[when("the result file is resolved")]
fn resolve_result_file(world: &mut ListenerWorld) {
    world.resolved = Some(world.listener.require_result_file(world.test()));
}

#[then(regex = r#"^the implementation id is "(.+)"$"#)]
fn implementation_id_is(world: &mut ListenerWorld, expected: String) {
    assert_eq!(world.listener.implementation_id(), Some(expected.as_str()));
}

#[then(regex = r#"^the result file is "(.+)"$"#)]
fn result_file_is(world: &mut ListenerWorld, expected: String) {
    match world.resolved.take() {
        Some(actual) => assert_eq!(actual, expected),
        None => panic!("result file was not resolved - test setup error"),
    }
}

#[then("the listener is active")]
fn listener_active(world: &mut ListenerWorld) {
    assert!(world.listener.should_use(&world.properties));
}

#[then("the listener is inactive")]
fn listener_inactive(world: &mut ListenerWorld) {
    assert!(!world.listener.should_use(&world.properties));
}
