//! CLI command handling
//!
//! Builds the recorder and bridge from configuration and dispatches
//! subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;

use crate::bridge::ShellBridge;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::recorder::{Recorder, RecorderConfig, StdinInput};
use crate::testing::{run_scenario, RunOutcome, TestScenario};

/// How a successful dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    Interrupted,
}

/// Overrides collected from `run` flags
#[derive(Debug, Default)]
pub struct Overrides {
    pub report_dir: Option<PathBuf>,
    pub debug: bool,
    pub timeout: Option<u64>,
    pub project_dir: Option<String>,
    pub shell: Vec<String>,
}

impl Overrides {
    /// Fold CLI flags into the loaded configuration
    pub fn apply(self, config: &mut Config) {
        if let Some(dir) = self.report_dir {
            config.report.dir = dir;
        }
        if self.debug {
            config.report.debug = true;
        }
        if let Some(secs) = self.timeout {
            config.remote.timeout_secs = secs;
        }
        if let Some(project_dir) = self.project_dir {
            config.remote.project_dir = project_dir;
        }
        if !self.shell.is_empty() {
            config.remote.shell = self.shell;
        }
    }
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<Completion> {
    match command {
        Commands::Run {
            scenario,
            report_dir,
            debug,
            timeout,
            project_dir,
            shell,
            config,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            Overrides {
                report_dir,
                debug,
                timeout,
                project_dir,
                shell,
            }
            .apply(&mut cfg);

            run(&scenario, &cfg).await
        }

        Commands::Validate { scenario } => {
            validate(&scenario)?;
            Ok(Completion::Done)
        }
    }
}

async fn run(path: &Path, config: &Config) -> Result<Completion> {
    let scenario = TestScenario::load(path)?;
    let bridge = ShellBridge::new(&config.remote.shell)?;

    let recorder_config = RecorderConfig::from(config);
    tracing::debug!(
        report_dir = %recorder_config.report_dir.display(),
        timeout_secs = recorder_config.timeout.as_secs(),
        "Recorder configured"
    );

    let mut recorder = Recorder::begin(
        recorder_config,
        scenario.session_info(),
        Box::new(StdinInput::new()),
        Arc::new(bridge),
    );

    let outcome = run_scenario(&scenario, &mut recorder, ctrl_c()).await?;
    print_outcome(&outcome);

    Ok(if outcome.interrupted {
        Completion::Interrupted
    } else {
        Completion::Done
    })
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_outcome(outcome: &RunOutcome) {
    if outcome.interrupted {
        println!(
            "\n{} {} ({}/{} steps)",
            "⚠️ ".yellow(),
            "Test interrupted by operator".yellow().bold(),
            outcome.steps_run,
            outcome.steps_total
        );
    } else {
        println!(
            "\n{} {} ({:.1}% success)",
            "✅".green(),
            "Test completed".green().bold(),
            outcome.success_rate
        );
    }
    if outcome.report_path.is_none() {
        println!("{}", "No report was written, see the log above".red());
    }
}

fn validate(path: &Path) -> Result<()> {
    let scenario = TestScenario::load(path)?;

    println!(
        "{} {} ({})",
        "Scenario:".blue().bold(),
        scenario.name.white().bold(),
        scenario.id
    );
    if !scenario.description.is_empty() {
        println!("  {}", scenario.description.dimmed());
    }
    if let Some(estimate) = &scenario.estimated_duration {
        println!("  Estimated duration: {}", estimate);
    }

    for phase in &scenario.phases {
        println!("\n{}", phase.name.cyan());
        for (i, step) in phase.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step.label().dimmed());
        }
    }

    println!(
        "\n{} {} phases, {} steps",
        "✓".green(),
        scenario.phases.len(),
        scenario.step_count()
    );
    Ok(())
}
