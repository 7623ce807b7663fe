//! Test support utilities.
//!
//! Shared by the unit tests of the workspace crates and the behavioural
//! tests at the repository root.

pub mod env_guard;
pub mod fixtures;
pub mod logging;

pub use fixtures::write_config;
