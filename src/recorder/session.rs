//! Recorded entities
//!
//! Everything here is append-only: the recorder pushes values and only
//! hands out shared references afterwards.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity and metadata of one test run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Human estimate such as "10 min"
    pub estimated_duration: Option<String>,
    /// Plugin modules this run exercises
    pub modules_tested: Vec<String>,
}

impl SessionInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            estimated_duration: None,
            modules_tested: Vec::new(),
        }
    }
}

/// A named milestone of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    pub name: String,
    pub started_at: DateTime<Local>,
}

/// Kind of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Success,
    Error,
    Info,
    Warning,
}

impl LogKind {
    /// Upper-case label used in the report transcript
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Success => "SUCCESS",
            LogKind::Error => "ERROR",
            LogKind::Info => "INFO",
            LogKind::Warning => "WARNING",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    pub at: DateTime<Local>,
}

/// An operator's answer to a question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub question: String,
    pub response: String,
    pub at: DateTime<Local>,
}

/// Result of a remote check, as seen by the scenario
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteCheckResult {
    pub success: bool,
    /// Trimmed stdout; empty on timeout or bridge failure
    pub output: String,
    /// Trimmed stderr, `"Timeout"`, or the bridge failure message
    pub error: String,
}

/// Percentage of success entries among success and error entries
///
/// Info and warning entries do not count. Zero when there is nothing to count.
pub fn success_rate(logs: &[LogEntry]) -> f64 {
    let (successes, errors) = count_outcomes(logs);
    let total = successes + errors;
    if total == 0 {
        0.0
    } else {
        successes as f64 / total as f64 * 100.0
    }
}

/// `(successes, errors)`
pub fn count_outcomes(logs: &[LogEntry]) -> (usize, usize) {
    logs.iter().fold((0, 0), |(s, e), entry| match entry.kind {
        LogKind::Success => (s + 1, e),
        LogKind::Error => (s, e + 1),
        LogKind::Info | LogKind::Warning => (s, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: LogKind) -> LogEntry {
        LogEntry {
            kind,
            message: String::new(),
            at: Local::now(),
        }
    }

    #[test]
    fn rate_is_zero_without_outcomes() {
        assert_eq!(success_rate(&[]), 0.0);
        assert_eq!(
            success_rate(&[entry(LogKind::Info), entry(LogKind::Warning)]),
            0.0
        );
    }

    #[test]
    fn rate_ignores_info_and_warning() {
        let logs = [
            entry(LogKind::Success),
            entry(LogKind::Info),
            entry(LogKind::Success),
            entry(LogKind::Warning),
            entry(LogKind::Success),
            entry(LogKind::Error),
        ];
        assert_eq!(success_rate(&logs), 75.0);
        assert_eq!(count_outcomes(&logs), (3, 1));
    }

    #[test]
    fn rate_stays_within_bounds() {
        let mut logs = Vec::new();
        for i in 0..50 {
            logs.push(entry(if i % 3 == 0 { LogKind::Error } else { LogKind::Success }));
            let rate = success_rate(&logs);
            assert!((0.0..=100.0).contains(&rate), "rate {} out of range", rate);
        }
    }
}
