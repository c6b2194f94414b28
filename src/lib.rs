//! E2E harness - interactive end-to-end test sessions
//!
//! This library records manual test runs against a remote development
//! environment: remote checks through a shell bridge, operator answers,
//! and a Markdown report at the end.

pub mod bridge;
pub mod cli;
pub mod commands;
pub mod common;
pub mod recorder;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use recorder::{Recorder, RecorderConfig};
