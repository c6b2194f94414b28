//! Remote command execution
//!
//! The recorder never spawns processes itself. It hands a command string
//! and a timeout to a [`CommandBridge`] and gets back a [`BridgeOutcome`].
//! [`ShellBridge`] is the production implementation; tests substitute
//! their own.

mod shell;
mod wp;

pub use shell::ShellBridge;
pub use wp::WpCli;

use async_trait::async_trait;
use std::time::Duration;

/// Captured result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// What happened to a bridged command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// The command ran and exited (successfully or not)
    Completed(CommandOutput),
    /// The command did not finish before the deadline and was killed
    TimedOut,
    /// The command could not be run at all
    Failed(String),
}

/// Executes a command in the remote environment
#[async_trait]
pub trait CommandBridge: Send + Sync {
    /// Run `command`, giving up after `timeout`
    async fn execute(&self, command: &str, timeout: Duration) -> BridgeOutcome;
}
