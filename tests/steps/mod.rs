//! Step definitions for the behavioural test suite.

mod forked_steps;
mod handoff_steps;
mod listener_steps;

pub use forked_steps::ForkedWorld;
pub use handoff_steps::HandoffWorld;
pub use listener_steps::ListenerWorld;
