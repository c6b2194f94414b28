//! Shell bridge
//!
//! Runs commands through a local shell invocation such as `sh -c` or
//! `wsl -d Ubuntu bash -c`, capturing stdout and stderr.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::{BridgeOutcome, CommandBridge, CommandOutput};
use crate::common::{Error, Result};

/// Bridge that appends the command to a shell invocation prefix
#[derive(Debug, Clone)]
pub struct ShellBridge {
    program: PathBuf,
    args: Vec<String>,
}

impl ShellBridge {
    /// Build a bridge from a prefix like `["sh", "-c"]`
    ///
    /// The program is resolved through PATH so a misconfigured shell fails
    /// before the session starts, not on the first check.
    pub fn new(prefix: &[String]) -> Result<Self> {
        let (program, args) = prefix
            .split_first()
            .ok_or_else(|| Error::Config("Remote shell prefix is empty".to_string()))?;

        let program = which::which(program).map_err(|_| Error::ShellNotFound(program.clone()))?;

        Ok(Self {
            program,
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl CommandBridge for ShellBridge {
    async fn execute(&self, command: &str, limit: Duration) -> BridgeOutcome {
        tracing::debug!(program = %self.program.display(), command, "Executing remote command");

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to spawn shell: {}", e);
                return BridgeOutcome::Failed(format!("Failed to spawn shell: {}", e));
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it
        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let output = CommandOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                tracing::debug!(exit_code = ?output.exit_code, "Remote command finished");
                BridgeOutcome::Completed(output)
            }
            Ok(Err(e)) => BridgeOutcome::Failed(format!("Failed to collect command output: {}", e)),
            Err(_) => {
                tracing::debug!(timeout_secs = limit.as_secs(), "Remote command timed out");
                BridgeOutcome::TimedOut
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> ShellBridge {
        ShellBridge::new(&["sh".to_string(), "-c".to_string()]).unwrap()
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let outcome = sh().execute("echo hello", Duration::from_secs(5)).await;
        match outcome {
            BridgeOutcome::Completed(out) => {
                assert!(out.success());
                assert_eq!(out.stdout.trim(), "hello");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_zero_exit_keeps_stderr() {
        let outcome = sh().execute("echo boom >&2; exit 3", Duration::from_secs(5)).await;
        match outcome {
            BridgeOutcome::Completed(out) => {
                assert_eq!(out.exit_code, Some(3));
                assert_eq!(out.stderr.trim(), "boom");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let outcome = sh().execute("sleep 5", Duration::from_millis(100)).await;
        assert_eq!(outcome, BridgeOutcome::TimedOut);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(matches!(ShellBridge::new(&[]), Err(Error::Config(_))));
    }

    #[test]
    fn unknown_shell_is_rejected() {
        let err = ShellBridge::new(&["definitely-not-a-shell-xyz".to_string()]).unwrap_err();
        assert!(matches!(err, Error::ShellNotFound(_)));
    }
}
