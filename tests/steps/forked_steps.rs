//! Behavioural steps for the forked wire element.
#![allow(
    clippy::expect_used,
    clippy::needless_pass_by_value,
    reason = "simplify test failure output"
)]

use cucumber::{World, given, then, when};
use junitfork_lib::{ForkedError, ListenerDefinition};
use quick_xml::{Reader, Writer};

#[derive(Debug, Default, World)]
pub struct ForkedWorld {
    listener: ListenerDefinition,
    xml: Option<String>,
    written: Option<Result<String, ForkedError>>,
    read: Option<Result<ListenerDefinition, ForkedError>>,
}

fn write(listener: &ListenerDefinition) -> Result<String, ForkedError> {
    let mut writer = Writer::new(Vec::new());
    listener.to_forked_representation(&mut writer)?;
    Ok(String::from_utf8(writer.into_inner()).expect("writer emits UTF-8"))
}

fn read(xml: &str) -> Result<ListenerDefinition, ForkedError> {
    let mut reader = Reader::from_str(xml);
    let current = reader.read_event()?;
    ListenerDefinition::from_forked_representation(&mut reader, &current)
}

fn read_back(world: &ForkedWorld) -> &ListenerDefinition {
    match world.read.as_ref() {
        Some(Ok(listener)) => listener,
        other => panic!("expected a listener, got {other:?}"),
    }
}

#[given(regex = r#"^a listener with implementation id "(.+)"$"#)]
fn listener_with_id(world: &mut ForkedWorld, id: String) {
    world.listener.set_implementation_id(id);
}

#[given("a listener without an implementation id")]
fn listener_without_id(world: &mut ForkedWorld) {
    world.listener = ListenerDefinition::new();
}

#[given("sysout is sent")]
fn sysout_sent(world: &mut ForkedWorld) {
    world.listener.set_send_sys_out(true);
}

#[given(regex = r#"^the result file "(.+)"$"#)]
fn result_file(world: &mut ForkedWorld, file: String) {
    world.listener.set_result_file(file);
}

#[given(regex = r#"^the if condition "(.+)"$"#)]
fn if_condition(world: &mut ForkedWorld, name: String) {
    world.listener.set_if(name);
}

#[given(regex = r#"^the output directory "(.+)"$"#)]
fn output_dir(world: &mut ForkedWorld, dir: String) {
    world.listener.set_output_dir(dir);
}

#[given(regex = r"^the forked element '(.+)'$")]
fn forked_element(world: &mut ForkedWorld, xml: String) {
    world.xml = Some(xml);
}

#[when("it is written and read back")]
fn written_and_read_back(world: &mut ForkedWorld) {
    let xml = write(&world.listener).expect("write succeeds");
    world.read = Some(read(&xml));
}

#[when("it is written")]
fn written(world: &mut ForkedWorld) {
    world.written = Some(write(&world.listener));
}

#[when("the element is read")]
fn element_read(world: &mut ForkedWorld) {
    let xml = world.xml.clone().expect("element set by a given step");
    world.read = Some(read(&xml));
}

#[then(regex = r#"^the implementation id is "(.+)"$"#)]
fn implementation_id_is(world: &mut ForkedWorld, expected: String) {
    assert_eq!(read_back(world).implementation_id(), Some(expected.as_str()));
}

#[then(regex = r"^the sysout flag is (true|false)$")]
fn sysout_flag(world: &mut ForkedWorld, expected: String) {
    let expected: bool = expected.parse().expect("boolean literal");
    assert_eq!(read_back(world).should_send_sys_out(), expected);
}

#[then(regex = r"^the syserr flag is (true|false)$")]
fn syserr_flag(world: &mut ForkedWorld, expected: String) {
    let expected: bool = expected.parse().expect("boolean literal");
    assert_eq!(read_back(world).should_send_sys_err(), expected);
}

#[then(regex = r#"^the result file is "(.+)"$"#)]
fn result_file_is(world: &mut ForkedWorld, expected: String) {
    assert_eq!(read_back(world).result_file(), Some(expected.as_str()));
}

#[then("no controller-only field is carried")]
fn no_controller_fields(world: &mut ForkedWorld) {
    let listener = read_back(world);
    assert_eq!(listener.if_condition(), None);
    assert_eq!(listener.unless_condition(), None);
    assert_eq!(listener.output_dir(), None);
}

#[then("writing fails with a missing implementation id error")]
fn writing_fails(world: &mut ForkedWorld) {
    match world.written.take() {
        Some(Err(ForkedError::MissingImplementationId)) => {}
        other => panic!("expected missing implementation id, got {other:?}"),
    }
}

#[then("reading fails with a missing attribute error")]
fn reading_fails_missing_attribute(world: &mut ForkedWorld) {
    match world.read.take() {
        Some(Err(ForkedError::MissingAttribute { attribute, .. })) => {
            assert_eq!(attribute, "classname");
        }
        other => panic!("expected missing attribute, got {other:?}"),
    }
}

#[then("reading fails with a structural error")]
fn reading_fails_structure(world: &mut ForkedWorld) {
    match world.read.take() {
        Some(Err(ForkedError::UnexpectedEvent { .. })) => {}
        other => panic!("expected structural error, got {other:?}"),
    }
}
