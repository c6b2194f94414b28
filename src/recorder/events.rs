//! Session events and their sinks
//!
//! Every operator-visible effect of the recorder is a [`SessionEvent`].
//! The recorder keeps the full journal; sinks decide how to show it.

use std::path::PathBuf;

use colored::Colorize;

use super::session::{LogEntry, LogKind, Observation, SessionInfo};

/// Figures printed at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub name: String,
    pub duration_secs: f64,
    pub success_rate: f64,
    pub phases: usize,
    pub observations: usize,
    pub successes: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SessionStarted(SessionInfo),
    PhaseStarted { name: String },
    Substep { number: String, title: String },
    Instructions(Vec<String>),
    JavaScript(String),
    /// A remote check is about to run
    Verifying { description: String },
    /// Trimmed stdout of a remote check, when there was any
    CommandOutput { description: String, output: String },
    Logged(LogEntry),
    Question(String),
    Observed(Observation),
    ConfirmationRequested(String),
    ReportWritten(PathBuf),
    Summary(Summary),
}

/// Receives events as they are recorded
pub trait EventSink: Send {
    fn emit(&mut self, event: &SessionEvent);
}

/// Prints events to stdout with emoji markers
#[derive(Debug, Default)]
pub struct ConsoleSink;

const RULE: &str = "============================================================";

impl EventSink for ConsoleSink {
    fn emit(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::SessionStarted(info) => {
                println!("\n🚀 {} {}\n", "Starting test:".blue().bold(), info.name.white().bold());
                println!("📝 {}\n", info.description.dimmed());
            }
            SessionEvent::PhaseStarted { name } => {
                println!("\n{}", RULE);
                println!("  {}", name.cyan().bold());
                println!("{}\n", RULE);
            }
            SessionEvent::Substep { number, title } => {
                println!("\n  {} {}", number.cyan(), title);
            }
            SessionEvent::Instructions(lines) => {
                println!("📋 INSTRUCTIONS:");
                for line in lines {
                    println!("   {}", line);
                }
                println!();
            }
            SessionEvent::JavaScript(code) => {
                println!("🔧 JAVASCRIPT (browser console):");
                println!("```javascript");
                println!("{}", code.trim_end());
                println!("```\n");
            }
            SessionEvent::Verifying { description } => {
                println!("🔍 Checking: {}", description);
            }
            SessionEvent::CommandOutput { output, .. } => {
                for line in output.lines() {
                    println!("   {}", line.dimmed());
                }
            }
            SessionEvent::Logged(entry) => print_log(entry),
            SessionEvent::Question(question) => {
                println!("\n❓ {}", question);
            }
            SessionEvent::Observed(_) => {}
            SessionEvent::ConfirmationRequested(message) => {
                println!("\n⏸️  {}", message);
            }
            SessionEvent::ReportWritten(path) => {
                println!("\n📄 Report saved: {}", path.display());
            }
            SessionEvent::Summary(summary) => print_summary(summary),
        }
    }
}

fn print_log(entry: &LogEntry) {
    match entry.kind {
        LogKind::Success => println!("✅ {}", entry.message.green()),
        LogKind::Error => println!("❌ {}", entry.message.red()),
        LogKind::Info => println!("ℹ️  {}", entry.message),
        LogKind::Warning => println!("⚠️  {}", entry.message.yellow()),
    }
}

fn print_summary(summary: &Summary) {
    println!("\n{}", RULE);
    println!("  SUMMARY: {}", summary.name.bold());
    println!("{}", RULE);
    println!(
        "Duration: {:.2}s ({:.1} min)",
        summary.duration_secs,
        summary.duration_secs / 60.0
    );
    println!("Success rate: {:.1}%", summary.success_rate);
    println!("Phases: {}", summary.phases);
    println!("Observations: {}", summary.observations);
    println!("Successes: {}", summary.successes.to_string().green());
    println!("Errors: {}", summary.errors.to_string().red());
    println!("{}\n", RULE);
}
