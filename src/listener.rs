//! The `listener` entry of a test launch.
//!
//! A [`ListenerDefinition`] is populated while configuration is loaded and
//! only read afterwards: to decide whether it is active, to work out where its
//! report goes, and to serialise it for a forked worker.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::condition::ConditionEvaluator;
use crate::test_definition::TestDefinition;

/// Implementation id of the legacy plain-text formatter.
pub const LEGACY_PLAIN_FORMATTER: &str =
    "org.apache.tools.ant.taskdefs.optional.junitlauncher.LegacyPlainResultFormatter";
/// Implementation id of the legacy brief formatter.
pub const LEGACY_BRIEF_FORMATTER: &str =
    "org.apache.tools.ant.taskdefs.optional.junitlauncher.LegacyBriefResultFormatter";
/// Implementation id of the legacy XML formatter.
///
/// Default result files only get an `.xml` suffix for this exact id.
pub const LEGACY_XML_FORMATTER: &str =
    "org.apache.tools.ant.taskdefs.optional.junitlauncher.LegacyXmlResultFormatter";

/// Name used in default result files when the test has no name of its own.
const UNKNOWN_TEST_NAME: &str = "unknown";

/// Built-in listener aliases selectable by `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListenerType {
    /// `legacy-plain`
    LegacyPlain,
    /// `legacy-brief`
    LegacyBrief,
    /// `legacy-xml`
    LegacyXml,
}

impl ListenerType {
    /// Every alias, in declaration order.
    pub const ALL: [Self; 3] = [Self::LegacyPlain, Self::LegacyBrief, Self::LegacyXml];

    /// The alias as written in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LegacyPlain => "legacy-plain",
            Self::LegacyBrief => "legacy-brief",
            Self::LegacyXml => "legacy-xml",
        }
    }

    /// The formatter implementation this alias stands for.
    #[must_use]
    pub const fn implementation_id(self) -> &'static str {
        match self {
            Self::LegacyPlain => LEGACY_PLAIN_FORMATTER,
            Self::LegacyBrief => LEGACY_BRIEF_FORMATTER,
            Self::LegacyXml => LEGACY_XML_FORMATTER,
        }
    }
}

impl fmt::Display for ListenerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`ListenerType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown listener type '{0}', expected one of legacy-plain, legacy-brief, legacy-xml")]
pub struct ParseListenerTypeError(pub String);

impl FromStr for ListenerType {
    type Err = ParseListenerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ParseListenerTypeError(s.to_owned()))
    }
}

/// A configured observer of test execution results.
///
/// # Examples
///
/// ```
/// use junitfork_lib::{ListenerDefinition, ListenerType, SingleTestClass};
///
/// let mut listener = ListenerDefinition::new();
/// listener.set_type(ListenerType::LegacyXml);
/// let test = SingleTestClass::new("FooTest");
/// assert_eq!(listener.require_result_file(Some(&test)), "TEST-FooTest.xml");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerDefinition {
    if_condition: Option<String>,
    unless_condition: Option<String>,
    implementation_id: Option<String>,
    result_file: Option<String>,
    send_sys_out: bool,
    send_sys_err: bool,
    output_dir: Option<PathBuf>,
}

impl ListenerDefinition {
    /// Create a definition with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the formatter implementation id.
    pub fn set_implementation_id(&mut self, id: impl Into<String>) {
        self.implementation_id = Some(id.into());
    }

    /// The formatter implementation id, if one has been configured.
    #[must_use]
    pub fn implementation_id(&self) -> Option<&str> {
        self.implementation_id.as_deref()
    }

    /// Select a built-in formatter, replacing any implementation id set before.
    pub fn set_type(&mut self, listener_type: ListenerType) {
        self.set_implementation_id(listener_type.implementation_id());
    }

    /// Name of the condition that must hold for this listener to be used.
    pub fn set_if(&mut self, condition: impl Into<String>) {
        self.if_condition = Some(condition.into());
    }

    #[must_use]
    pub fn if_condition(&self) -> Option<&str> {
        self.if_condition.as_deref()
    }

    /// Name of the condition that disables this listener when it holds.
    pub fn set_unless(&mut self, condition: impl Into<String>) {
        self.unless_condition = Some(condition.into());
    }

    #[must_use]
    pub fn unless_condition(&self) -> Option<&str> {
        self.unless_condition.as_deref()
    }

    /// Set an explicit result file. It is never recomputed afterwards.
    pub fn set_result_file(&mut self, file: impl Into<String>) {
        self.result_file = Some(file.into());
    }

    /// The explicitly configured result file.
    #[must_use]
    pub fn result_file(&self) -> Option<&str> {
        self.result_file.as_deref()
    }

    pub fn set_send_sys_out(&mut self, send: bool) {
        self.send_sys_out = send;
    }

    #[must_use]
    pub const fn should_send_sys_out(&self) -> bool {
        self.send_sys_out
    }

    pub fn set_send_sys_err(&mut self, send: bool) {
        self.send_sys_err = send;
    }

    #[must_use]
    pub const fn should_send_sys_err(&self) -> bool {
        self.send_sys_err
    }

    /// Directory the result file is resolved against.
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = Some(dir.into());
    }

    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Return the result file name, deriving `TEST-<name>.<suffix>` when none
    /// was configured.
    ///
    /// `<name>` comes from the test when it exposes one and is `unknown`
    /// otherwise. `<suffix>` is `xml` only for [`LEGACY_XML_FORMATTER`].
    #[must_use]
    pub fn require_result_file(&self, test: Option<&dyn TestDefinition>) -> String {
        if let Some(file) = &self.result_file {
            return file.clone();
        }
        let name = test
            .and_then(TestDefinition::as_named)
            .map_or(UNKNOWN_TEST_NAME, |named| named.name());
        let suffix = if self.implementation_id() == Some(LEGACY_XML_FORMATTER) {
            "xml"
        } else {
            "txt"
        };
        format!("TEST-{name}.{suffix}")
    }

    /// Resolve the result file against the output directory, if any.
    #[must_use]
    pub fn result_path(&self, test: Option<&dyn TestDefinition>) -> PathBuf {
        let file = self.require_result_file(test);
        self.output_dir
            .as_ref()
            .map_or_else(|| PathBuf::from(&file), |dir| dir.join(&file))
    }

    /// Whether the `if` condition holds and the `unless` condition does not.
    pub fn should_use<E>(&self, conditions: &E) -> bool
    where
        E: ConditionEvaluator + ?Sized,
    {
        conditions.if_condition_holds(self.if_condition())
            && !conditions.unless_condition_holds(self.unless_condition())
    }
}
