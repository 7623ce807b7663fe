//! Logging utilities for tests.
//!
//! Provides an in-memory log sink and test-safe logging initialisation that
//! avoids reading from the environment.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Collects formatted log output in memory.
///
/// Clones share the same buffer, so one clone can be handed to the
/// subscriber while the test keeps another to inspect the output.
#[derive(Clone, Debug, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Initialise logging with a custom writer and explicit filter.
///
/// This avoids reading from the environment, making it suitable for tests
/// where environment mutation is forbidden.
///
/// # Examples
///
/// ```rust,no_run
/// use test_support::logging::{CapturedLogs, init_with_writer_and_filter};
///
/// let logs = CapturedLogs::default();
/// init_with_writer_and_filter(logs.clone(), "debug");
/// ```
pub fn init_with_writer_and_filter<W>(writer: W, filter: &str)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();
}
