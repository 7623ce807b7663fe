//! Scoped environment variable changes for tests.
//!
//! [`EnvVarGuard`] sets or removes a variable and puts the previous state back
//! when dropped. Tests using it must run serially.

#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    original: Option<String>,
}

impl EnvVarGuard {
    /// Set `key` to `value` until the guard is dropped.
    #[must_use]
    pub fn set(key: &str, value: &str) -> Self {
        let guard = Self::capture(key);
        // SAFETY: callers run serially, so no other thread reads the
        // environment concurrently.
        unsafe { std::env::set_var(key, value) };
        guard
    }

    /// Unset `key` until the guard is dropped.
    #[must_use]
    pub fn remove(key: &str) -> Self {
        let guard = Self::capture(key);
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(key) };
        guard
    }

    fn capture(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            original: std::env::var(key).ok(),
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: see `set`.
        match &self.original {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}
