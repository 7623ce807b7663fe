//! Controller side of junitfork.
//!
//! # Overview
//! This crate exposes:
//! - [`config::Config`]: typed controller configuration loaded from
//!   `/etc/junitfork/config.toml` with environment and CLI overrides.
//! - [`prepare`] and [`run`]: activation, default result-file resolution and
//!   writing the handoff document read by `junitfork-worker`.
//!
//! # Examples
//! ```rust,no_run
//! use junitfork::config::Config;
//!
//! let cfg = Config::load().expect("configuration must be valid");
//! let count = junitfork::run(&cfg).expect("handoff must be written");
//! tracing::info!(count, "listeners handed off");
//! ```

pub mod config;
pub mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use junitfork_lib::forked::{self, ForkedError};
use junitfork_lib::ListenerDefinition;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Errors that can occur while handing listeners to the worker.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A listener could not be serialised.
    #[error("failed to serialise listeners: {0}")]
    Forked(#[from] ForkedError),
    /// Writing the handoff document failed.
    #[error("failed to write handoff document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An active listener together with the report location it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedListener {
    pub definition: ListenerDefinition,
    pub result_path: PathBuf,
}

/// Build the configured listeners and keep the ones whose conditions allow
/// them.
#[must_use]
pub fn prepare(config: &Config) -> Vec<PreparedListener> {
    let conditions = config.conditions();
    let test = config.test_definition();
    config
        .listeners
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let definition = entry.to_definition();
            if !definition.should_use(&conditions) {
                debug!(
                    index,
                    if_condition = ?definition.if_condition(),
                    unless_condition = ?definition.unless_condition(),
                    "listener disabled by its conditions"
                );
                return None;
            }
            let result_path = definition.result_path(test.as_deref());
            info!(
                index,
                implementation_id = ?definition.implementation_id(),
                result_path = %result_path.display(),
                "listener enabled"
            );
            Some(PreparedListener {
                definition,
                result_path,
            })
        })
        .collect()
}

/// Write `listeners` to `path` as a handoff document.
///
/// Missing parent directories are created. Nothing is written if any listener
/// lacks an implementation id.
///
/// # Errors
///
/// Returns [`LaunchError::Forked`] if a listener cannot be serialised and
/// [`LaunchError::Write`] if the file cannot be written.
pub fn write_handoff(path: &Path, listeners: &[ListenerDefinition]) -> Result<(), LaunchError> {
    let bytes = forked::to_bytes(listeners)?;
    let write_err = |source| LaunchError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, bytes).map_err(write_err)
}

/// Prepare the configured listeners and hand the active ones off.
///
/// Returns the number of listeners written.
///
/// # Errors
///
/// See [`write_handoff`].
pub fn run(config: &Config) -> Result<usize, LaunchError> {
    let listeners: Vec<ListenerDefinition> = prepare(config)
        .into_iter()
        .map(|prepared| prepared.definition)
        .collect();
    write_handoff(&config.handoff_path, &listeners)?;
    info!(
        count = listeners.len(),
        path = %config.handoff_path.display(),
        "handoff document written"
    );
    Ok(listeners.len())
}
