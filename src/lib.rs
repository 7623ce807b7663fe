//! Shared types for the junitfork project.
//!
//! This library defines the listener configuration a test launch carries and
//! the forked representation exchanged between the controller and a forked
//! worker.

pub mod condition;
pub mod forked;
pub mod listener;
pub mod test_definition;

pub use condition::{ConditionEvaluator, PropertyConditions};
pub use forked::{ForkedError, ForkedListener};
pub use listener::{
    LEGACY_BRIEF_FORMATTER, LEGACY_PLAIN_FORMATTER, LEGACY_XML_FORMATTER, ListenerDefinition,
    ListenerType, ParseListenerTypeError,
};
pub use test_definition::{NamedTest, SingleTestClass, TestClasses, TestDefinition};

/// Default location of the handoff document written for the worker.
///
/// Shared by the controller and worker to avoid configuration drift.
pub const DEFAULT_HANDOFF_PATH: &str = "/run/junitfork/listeners.xml";
