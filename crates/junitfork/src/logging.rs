//! Logging utilities for the controller.
//!
//! Initializes structured logging using `tracing` and `tracing-subscriber`,
//! reading filter settings from the `RUST_LOG` environment variable. Output
//! goes to standard error so standard output stays free for the build that
//! invoked the controller.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber.
///
/// Call `init` before any logging statements to avoid missing logs.
///
/// # Examples
///
/// ```rust,no_run
/// use junitfork::logging::init;
///
/// init();
/// tracing::info!("controller starting");
/// ```
pub fn init() {
    init_with_writer(fmt::writer::BoxMakeWriter::new(std::io::stderr));
}

/// Initialize logging with a custom writer.
///
/// # Examples
///
/// ```rust,no_run
/// use junitfork::logging::init_with_writer;
/// use tracing_subscriber::fmt;
///
/// init_with_writer(fmt::writer::BoxMakeWriter::new(std::io::stderr));
/// ```
pub fn init_with_writer<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(writer)
        .init();
}
