//! Behavioural steps for the controller to worker handoff.
#![allow(
    clippy::expect_used,
    clippy::needless_pass_by_value,
    reason = "simplify test failure output"
)]

use cucumber::{World, given, then, when};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use junitfork::config::Config;
use junitfork_lib::ListenerDefinition;
use junitfork_worker::{WorkerError, load_listeners};
use test_support::fixtures::{MISSING_CLASSNAME_DOCUMENT, SAMPLE_CONFIG};
use test_support::write_config;

#[derive(Debug, Default, World)]
pub struct HandoffWorld {
    dir: Option<TempDir>,
    config: Option<Config>,
    handoff: Option<PathBuf>,
    written: Option<usize>,
    loaded: Option<Result<Vec<ListenerDefinition>, WorkerError>>,
}

impl HandoffWorld {
    fn handoff_path(&mut self) -> PathBuf {
        let dir = self
            .dir
            .get_or_insert_with(|| TempDir::new().expect("create temp dir"));
        let path = dir.path().join("handoff").join("listeners.xml");
        self.handoff = Some(path.clone());
        path
    }

    fn listeners(&self) -> &[ListenerDefinition] {
        match self.loaded.as_ref() {
            Some(Ok(listeners)) => listeners,
            other => panic!("expected loaded listeners, got {other:?}"),
        }
    }
}

#[given("the sample controller configuration")]
fn sample_configuration(world: &mut HandoffWorld) {
    let handoff = world.handoff_path();
    let dir = world.dir.as_ref().expect("temp dir created");
    let path = write_config(dir, SAMPLE_CONFIG).expect("write config");
    let mut config = Config::from_file(&path).expect("sample config loads");
    config.handoff_path = handoff;
    world.config = Some(config);
}

#[given("a handoff document missing a classname")]
fn document_missing_classname(world: &mut HandoffWorld) {
    let handoff = world.handoff_path();
    let parent = handoff.parent().expect("handoff has a parent");
    fs::create_dir_all(parent).expect("create handoff dir");
    fs::write(&handoff, MISSING_CLASSNAME_DOCUMENT).expect("write handoff");
}

#[when("the controller runs")]
fn controller_runs(world: &mut HandoffWorld) {
    let config = world.config.as_ref().expect("config loaded");
    world.written = Some(junitfork::run(config).expect("controller run succeeds"));
}

#[when("the worker loads the handoff document")]
fn worker_loads(world: &mut HandoffWorld) {
    let handoff = world.handoff.as_ref().expect("handoff path set");
    world.loaded = Some(load_listeners(handoff));
}

#[then(regex = r"^the controller wrote (\d+) listeners$")]
fn controller_wrote(world: &mut HandoffWorld, expected: usize) {
    assert_eq!(world.written, Some(expected));
}

#[then(regex = r"^the worker has (\d+) listeners$")]
fn worker_has(world: &mut HandoffWorld, expected: usize) {
    assert_eq!(world.listeners().len(), expected);
}

#[then(regex = r#"^worker listener (\d+) has implementation id "(.+)"$"#)]
fn worker_listener_id(world: &mut HandoffWorld, index: usize, expected: String) {
    let listener = world
        .listeners()
        .get(index - 1)
        .expect("listener index in range");
    assert_eq!(listener.implementation_id(), Some(expected.as_str()));
}

#[then(regex = r#"^worker listener (\d+) has result file "(.+)"$"#)]
fn worker_listener_file(world: &mut HandoffWorld, index: usize, expected: String) {
    let listener = world
        .listeners()
        .get(index - 1)
        .expect("listener index in range");
    assert_eq!(listener.result_file(), Some(expected.as_str()));
}

#[then("the worker reports an invalid document")]
fn worker_reports_invalid(world: &mut HandoffWorld) {
    match world.loaded.take() {
        Some(Err(WorkerError::Invalid { .. })) => {}
        other => panic!("expected invalid document, got {other:?}"),
    }
}
