//! Test session recorder
//!
//! A [`Recorder`] accumulates the evidence of one interactive run: phases,
//! log entries, operator observations and timing. It talks to the outside
//! world through three seams:
//!
//! - an [`InputProvider`] for operator answers,
//! - a [`CommandBridge`] for remote checks,
//! - zero or more [`EventSink`]s that display what happens.
//!
//! The session is open from [`Recorder::begin`] until [`Recorder::finish`].
//! Nothing recorded before `finish` is ever lost: interruption and fatal
//! errors go through the same report path as a normal completion.

mod events;
mod input;
mod report;
mod session;

pub use events::{ConsoleSink, EventSink, SessionEvent, Summary};
pub use input::{InputProvider, ScriptedInput, StdinInput};
pub use report::{Report, Verdict};
pub use session::{
    count_outcomes, success_rate, LogEntry, LogKind, Observation, Phase, RemoteCheckResult,
    SessionInfo,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};

use crate::bridge::{BridgeOutcome, CommandBridge, WpCli};
use crate::common::config::Config;
use crate::common::{paths, Result};

const ANSWER_PROMPT: &str = "Answer (yes/no/comment):";
const CONTINUE_PROMPT: &str = "Press Enter to continue...";

/// Settings a recorder is constructed with
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Where reports and debug snapshots are written
    pub report_dir: PathBuf,
    /// Hard limit for each remote check
    pub timeout: Duration,
    /// Enables debug snapshots
    pub debug: bool,
    /// DDEV project directory for WP-CLI commands
    pub project_dir: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RecorderConfig {
    fn from(config: &Config) -> Self {
        Self {
            report_dir: config.report.dir.clone(),
            timeout: Duration::from_secs(config.remote.timeout_secs),
            debug: config.report.debug,
            project_dir: config.remote.project_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Closed,
}

/// Records one interactive test session
pub struct Recorder {
    config: RecorderConfig,
    info: SessionInfo,
    started_at: DateTime<Local>,
    started: Instant,
    state: SessionState,

    phases: Vec<Phase>,
    logs: Vec<LogEntry>,
    observations: Vec<Observation>,
    events: Vec<SessionEvent>,

    sinks: Vec<Box<dyn EventSink>>,
    input: Box<dyn InputProvider>,
    bridge: Arc<dyn CommandBridge>,
    wp: WpCli,
}

impl Recorder {
    /// Open a session that prints to the console
    pub fn begin(
        config: RecorderConfig,
        info: SessionInfo,
        input: Box<dyn InputProvider>,
        bridge: Arc<dyn CommandBridge>,
    ) -> Self {
        Self::begin_with_sinks(config, info, input, bridge, vec![Box::new(ConsoleSink)])
    }

    /// Open a session with explicit sinks (none for a silent recorder)
    pub fn begin_with_sinks(
        config: RecorderConfig,
        info: SessionInfo,
        input: Box<dyn InputProvider>,
        bridge: Arc<dyn CommandBridge>,
        sinks: Vec<Box<dyn EventSink>>,
    ) -> Self {
        tracing::info!(session = %info.id, "Session started");

        let wp = WpCli::new(config.project_dir.clone());
        let mut recorder = Self {
            config,
            info: info.clone(),
            started_at: Local::now(),
            started: Instant::now(),
            state: SessionState::Open,
            phases: Vec::new(),
            logs: Vec::new(),
            observations: Vec::new(),
            events: Vec::new(),
            sinks,
            input,
            bridge,
            wp,
        };
        recorder.emit(SessionEvent::SessionStarted(info));
        recorder
    }

    fn emit(&mut self, event: SessionEvent) {
        for sink in &mut self.sinks {
            sink.emit(&event);
        }
        self.events.push(event);
    }

    /// False (with a warning) once the session is closed
    fn accepts(&self, operation: &str) -> bool {
        if self.state == SessionState::Closed {
            tracing::warn!(session = %self.info.id, operation, "Ignored: session already closed");
            return false;
        }
        true
    }

    // === Accessors ===

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Every event emitted so far, in order
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Command builder bound to the configured project directory
    pub fn wp(&self) -> &WpCli {
        &self.wp
    }

    /// Seconds since `begin`, from a monotonic clock
    pub fn duration(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(&self.logs)
    }

    // === Recording ===

    pub fn start_phase(&mut self, name: impl Into<String>) {
        if !self.accepts("start_phase") {
            return;
        }
        let name = name.into();
        tracing::debug!(phase = %name, "Phase started");
        self.phases.push(Phase {
            name: name.clone(),
            started_at: Local::now(),
        });
        self.emit(SessionEvent::PhaseStarted { name });
    }

    pub fn substep(&mut self, number: impl Into<String>, title: impl Into<String>) {
        if !self.accepts("substep") {
            return;
        }
        self.emit(SessionEvent::Substep {
            number: number.into(),
            title: title.into(),
        });
    }

    /// Show browser instructions to the operator
    pub fn instruct<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.accepts("instruct") {
            return;
        }
        let lines = lines.into_iter().map(Into::into).collect();
        self.emit(SessionEvent::Instructions(lines));
    }

    /// Show a snippet for the operator to paste into the browser console
    pub fn show_javascript(&mut self, code: impl Into<String>) {
        if !self.accepts("show_javascript") {
            return;
        }
        self.emit(SessionEvent::JavaScript(code.into()));
    }

    pub fn log(&mut self, kind: LogKind, message: impl Into<String>) {
        if !self.accepts("log") {
            return;
        }
        let entry = LogEntry {
            kind,
            message: message.into(),
            at: Local::now(),
        };
        tracing::debug!(kind = %entry.kind, message = %entry.message, "Logged");
        self.logs.push(entry.clone());
        self.emit(SessionEvent::Logged(entry));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogKind::Error, message);
    }

    pub fn info_log(&mut self, message: impl Into<String>) {
        self.log(LogKind::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogKind::Warning, message);
    }

    /// Ask each question in turn and record the answers
    ///
    /// Returns this batch only, in question order. Fails if the input
    /// provider can no longer answer; answers collected before that are kept.
    pub async fn record_observations<S: AsRef<str>>(
        &mut self,
        questions: &[S],
    ) -> Result<Vec<Observation>> {
        if !self.accepts("record_observations") {
            return Ok(Vec::new());
        }

        let mut batch = Vec::with_capacity(questions.len());
        for question in questions {
            let question = question.as_ref().to_string();
            self.emit(SessionEvent::Question(question.clone()));

            let response = self.input.read_line(ANSWER_PROMPT).await?;
            let observation = Observation {
                question,
                response,
                at: Local::now(),
            };
            self.observations.push(observation.clone());
            self.emit(SessionEvent::Observed(observation.clone()));
            batch.push(observation);
        }
        Ok(batch)
    }

    /// Block until the operator presses Enter
    pub async fn confirm(&mut self, message: impl Into<String>) -> Result<()> {
        if !self.accepts("confirm") {
            return Ok(());
        }
        self.emit(SessionEvent::ConfirmationRequested(message.into()));
        self.input.read_line(CONTINUE_PROMPT).await?;
        Ok(())
    }

    /// Run a command through the bridge and log the outcome
    ///
    /// Every failure mode ends up in the returned result and in exactly one
    /// error entry; nothing is propagated.
    pub async fn run_remote_check(&mut self, description: &str, command: &str) -> RemoteCheckResult {
        if !self.accepts("run_remote_check") {
            return RemoteCheckResult {
                success: false,
                output: String::new(),
                error: "Session closed".to_string(),
            };
        }

        let outcome = self.bridge.execute(command, self.config.timeout).await;

        match outcome {
            BridgeOutcome::Completed(out) if out.success() => {
                self.success(format!("{} → OK", description));
                RemoteCheckResult {
                    success: true,
                    output: out.stdout.trim().to_string(),
                    error: out.stderr.trim().to_string(),
                }
            }
            BridgeOutcome::Completed(out) => {
                self.error(format!("{} → ERROR: {}", description, out.stderr.trim()));
                RemoteCheckResult {
                    success: false,
                    output: out.stdout.trim().to_string(),
                    error: out.stderr.trim().to_string(),
                }
            }
            BridgeOutcome::TimedOut => {
                self.error(format!("{} → TIMEOUT", description));
                RemoteCheckResult {
                    success: false,
                    output: String::new(),
                    error: "Timeout".to_string(),
                }
            }
            BridgeOutcome::Failed(message) => {
                self.error(format!("{} → EXCEPTION: {}", description, message));
                RemoteCheckResult {
                    success: false,
                    output: String::new(),
                    error: message,
                }
            }
        }
    }

    /// Announce and run a remote check, keeping only the verdict
    ///
    /// Non-empty stdout is shown to the operator before the verdict.
    pub async fn verify(&mut self, description: &str, command: &str) -> bool {
        if !self.is_open() {
            return self.run_remote_check(description, command).await.success;
        }
        self.emit(SessionEvent::Verifying {
            description: description.to_string(),
        });
        let result = self.run_remote_check(description, command).await;
        if !result.output.is_empty() {
            self.emit(SessionEvent::CommandOutput {
                description: description.to_string(),
                output: result.output,
            });
        }
        result.success
    }

    /// Fetch a WordPress option, JSON-decoded when possible
    pub async fn wp_option(&mut self, name: &str) -> Option<serde_json::Value> {
        let command = self.wp.option_get(name);
        let result = self
            .run_remote_check(&format!("Get option {}", name), &command)
            .await;
        if !result.success {
            return None;
        }
        Some(
            serde_json::from_str(&result.output)
                .unwrap_or(serde_json::Value::String(result.output)),
        )
    }

    /// Dump `payload` to `debug_<id>_<unix-time>.json` when debug is enabled
    pub fn save_debug_snapshot(&mut self, payload: &serde_json::Value) -> Option<PathBuf> {
        if !self.config.debug || !self.accepts("save_debug_snapshot") {
            return None;
        }
        let path = paths::snapshot_path(&self.config.report_dir, &self.info.id, Utc::now().timestamp());
        match write_snapshot(&path, payload) {
            Ok(()) => {
                self.info_log(format!("Debug snapshot saved: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.error(format!("Failed to save debug snapshot: {}", e));
                None
            }
        }
    }

    // === Reporting ===

    /// Snapshot of everything recorded so far
    pub fn report(&self) -> Report {
        Report {
            session: self.info.clone(),
            started_at: self.started_at,
            completed_at: Local::now(),
            duration_secs: self.duration(),
            success_rate: self.success_rate(),
            phases: self.phases.clone(),
            observations: self.observations.clone(),
            logs: self.logs.clone(),
        }
    }

    /// Write `report` into the configured report directory
    pub fn render(&mut self, report: &Report) -> Result<PathBuf> {
        let path = report.write_to(&self.config.report_dir)?;
        tracing::info!(path = %path.display(), "Report saved");
        self.emit(SessionEvent::ReportWritten(path.clone()));
        Ok(path)
    }

    pub fn summarize(&mut self) {
        let (successes, errors) = count_outcomes(&self.logs);
        let summary = Summary {
            name: self.info.name.clone(),
            duration_secs: self.duration(),
            success_rate: self.success_rate(),
            phases: self.phases.len(),
            observations: self.observations.len(),
            successes,
            errors,
        };
        self.emit(SessionEvent::Summary(summary));
    }

    /// Write the report, print the summary and close the session
    ///
    /// A failed write is logged, not returned. Calling this on a closed
    /// session does nothing and returns `None`.
    pub fn finish(&mut self) -> Option<PathBuf> {
        if !self.accepts("finish") {
            return None;
        }

        let report = self.report();
        let path = match self.render(&report) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("Failed to write report: {}", e);
                self.error(format!("Failed to write report: {}", e));
                None
            }
        };
        self.summarize();

        self.state = SessionState::Closed;
        tracing::info!(session = %self.info.id, "Session closed");
        path
    }
}

fn write_snapshot(path: &Path, payload: &serde_json::Value) -> Result<()> {
    if let Some(dir) = path.parent() {
        paths::ensure_dir(dir)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(payload)?)?;
    Ok(())
}
