//! Worker side of junitfork.
//!
//! Reads the handoff document written by the controller and rebuilds the
//! listener definitions it carries.

use clap::Parser;
use junitfork_lib::forked::{ForkedError, read_document};
use junitfork_lib::{DEFAULT_HANDOFF_PATH, ListenerDefinition, SingleTestClass, TestDefinition};
use quick_xml::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Command line arguments for the `junitfork-worker` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "junitfork-worker",
    about = "Rebuild listeners handed off by the junitfork controller"
)]
pub struct Args {
    /// Path to the handoff document.
    #[arg(default_value = DEFAULT_HANDOFF_PATH)]
    pub handoff: PathBuf,

    /// Class name of the test being run, used to name default result files.
    #[arg(long)]
    pub test: Option<String>,
}

/// Errors that can occur while reading a handoff document.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The handoff document could not be opened.
    #[error("failed to open handoff document {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The handoff document is not a valid listener document.
    #[error("invalid handoff document {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ForkedError,
    },
}

/// Read every listener from the handoff document at `path`.
///
/// # Errors
///
/// Returns [`WorkerError::Open`] if the file cannot be opened and
/// [`WorkerError::Invalid`] if its contents do not form a listener document.
pub fn load_listeners(path: &Path) -> Result<Vec<ListenerDefinition>, WorkerError> {
    let file = File::open(path).map_err(|source| WorkerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let forked = read_document(&mut reader).map_err(|source| WorkerError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(forked.into_iter().map(ListenerDefinition::from).collect())
}

/// Load the listeners named by `args` and log where each one reports.
///
/// # Examples
///
/// ```no_run
/// # use junitfork_worker::{Args, run};
/// # use std::path::PathBuf;
/// # fn try_run() -> Result<(), junitfork_worker::WorkerError> {
/// let args = Args {
///     handoff: PathBuf::from("/run/junitfork/listeners.xml"),
///     test: Some(String::from("com.example.FooTest")),
/// };
/// let listeners = run(&args)?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`load_listeners`].
pub fn run(args: &Args) -> Result<Vec<ListenerDefinition>, WorkerError> {
    let listeners = load_listeners(&args.handoff)?;
    let test = args.test.as_deref().map(SingleTestClass::new);
    let test = test.as_ref().map(|t| t as &dyn TestDefinition);
    for listener in &listeners {
        info!(
            implementation_id = listener.implementation_id().unwrap_or_default(),
            result_file = %listener.require_result_file(test),
            send_sys_out = listener.should_send_sys_out(),
            send_sys_err = listener.should_send_sys_err(),
            "listener ready"
        );
    }
    info!(count = listeners.len(), "listeners reconstructed");
    Ok(listeners)
}
