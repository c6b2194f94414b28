//! E2E scenario runner
//!
//! Reads YAML test scenarios and plays them through a
//! [`Recorder`](crate::recorder::Recorder): remote checks go over the
//! bridge, questions go to the operator, and the run ends with a report.

mod config;
mod runner;

pub use config::*;
pub use runner::{run_scenario, RunOutcome};
