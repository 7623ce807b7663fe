//! Configuration loading for the junitfork controller.
//!
//! The configuration is stored in `/etc/junitfork/config.toml`. Values may be
//! overridden by environment variables using the `JUNITFORK_` prefix and by
//! command-line flags.
//!
//! ```toml
//! handoff_path = "/tmp/junitfork/listeners.xml"
//! test = "com.example.FooTest"
//!
//! [properties]
//! ci = "true"
//!
//! [[listeners]]
//! type = "legacy-xml"
//! output_dir = "/tmp/reports"
//! if = "ci"
//! ```

use clap::Parser;
use figment::providers::Env;
use junitfork_lib::{
    DEFAULT_HANDOFF_PATH, ListenerDefinition, ListenerType, PropertyConditions, SingleTestClass,
    TestClasses, TestDefinition,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Runtime configuration for the controller.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Config {
    /// Where the handoff document for the worker is written.
    #[serde(default = "default_handoff_path")]
    pub handoff_path: PathBuf,
    /// A single test class. Takes precedence over `test_classes`.
    #[serde(default)]
    pub test: Option<String>,
    /// A batch of test classes.
    #[serde(default)]
    pub test_classes: Vec<String>,
    /// Build properties consulted by listener conditions.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Configured listeners, in declaration order.
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
}

/// One `[[listeners]]` entry.
///
/// When both `classname` and `type` are present, `type` is applied last and
/// wins.
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    #[serde(default)]
    pub classname: Option<String>,
    #[serde(default, rename = "type")]
    pub listener_type: Option<ListenerType>,
    #[serde(default)]
    pub result_file: Option<String>,
    #[serde(default)]
    pub send_sys_out: bool,
    #[serde(default)]
    pub send_sys_err: bool,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default, rename = "if")]
    pub if_condition: Option<String>,
    #[serde(default, rename = "unless")]
    pub unless_condition: Option<String>,
}

impl ListenerConfig {
    /// Build the listener definition this entry describes.
    #[must_use]
    pub fn to_definition(&self) -> ListenerDefinition {
        let mut listener = ListenerDefinition::new();
        if let Some(classname) = &self.classname {
            listener.set_implementation_id(classname.as_str());
        }
        if let Some(listener_type) = self.listener_type {
            listener.set_type(listener_type);
        }
        if let Some(file) = &self.result_file {
            listener.set_result_file(file.as_str());
        }
        listener.set_send_sys_out(self.send_sys_out);
        listener.set_send_sys_err(self.send_sys_err);
        if let Some(dir) = &self.output_dir {
            listener.set_output_dir(dir.as_path());
        }
        if let Some(condition) = &self.if_condition {
            listener.set_if(condition.as_str());
        }
        if let Some(condition) = &self.unless_condition {
            listener.set_unless(condition.as_str());
        }
        listener
    }
}

/// Command-line overrides for configuration values.
#[derive(Debug, Default, Parser, Serialize)]
#[command(name = "junitfork", about = "Hand listener configuration to a forked test worker")]
struct CliArgs {
    /// Path to the configuration file.
    #[arg(short, long, value_name = "FILE", default_value = Config::DEFAULT_PATH)]
    config: PathBuf,
    /// Override where the handoff document is written.
    #[arg(long)]
    handoff_path: Option<PathBuf>,
    /// Override the test class used to name default result files.
    #[arg(long)]
    test: Option<String>,
}

fn default_handoff_path() -> PathBuf {
    PathBuf::from(DEFAULT_HANDOFF_PATH)
}

impl Config {
    /// Default location of the controller configuration file.
    pub const DEFAULT_PATH: &'static str = "/etc/junitfork/config.toml";

    /// Load the configuration using command-line overrides and environment
    /// variables.
    #[expect(clippy::result_large_err, reason = "propagate figment errors")]
    pub fn load() -> Result<Self, ortho_config::OrthoError> {
        let args = CliArgs::parse();
        Self::from_file_with_cli(&args.config, &args)
    }

    /// Load the configuration from `path`, merging `JUNITFORK_*` environment
    /// variables over file values.
    #[expect(clippy::result_large_err, reason = "propagate figment errors")]
    pub fn from_file(path: &Path) -> Result<Self, ortho_config::OrthoError> {
        Self::from_file_with_cli(path, &CliArgs::default())
    }

    #[expect(clippy::result_large_err, reason = "propagate figment errors")]
    fn from_file_with_cli(path: &Path, cli: &CliArgs) -> Result<Self, ortho_config::OrthoError> {
        let mut fig = ortho_config::load_config_file(path)?.ok_or_else(|| {
            ortho_config::OrthoError::File {
                path: path.to_path_buf(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::NotFound,
                    "Configuration file not found",
                )),
            }
        })?;

        fig = fig.merge(Env::prefixed("JUNITFORK_").split("__"));
        let mut cfg: Self = fig.extract().map_err(ortho_config::OrthoError::from)?;

        if let Some(path) = &cli.handoff_path {
            cfg.handoff_path = path.clone();
        }
        if let Some(test) = &cli.test {
            cfg.test = Some(test.clone());
        }
        Ok(cfg)
    }

    /// The conditions listeners are evaluated against.
    #[must_use]
    pub fn conditions(&self) -> PropertyConditions {
        PropertyConditions::new(self.properties.clone())
    }

    /// The tests being launched, if any were configured.
    #[must_use]
    pub fn test_definition(&self) -> Option<Box<dyn TestDefinition>> {
        if let Some(name) = &self.test {
            return Some(Box::new(SingleTestClass::new(name.as_str())));
        }
        if self.test_classes.is_empty() {
            None
        } else {
            Some(Box::new(TestClasses::new(self.test_classes.iter().cloned())))
        }
    }
}
