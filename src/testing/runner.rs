//! Test runner implementation
//!
//! Executes a scenario's phases against a [`Recorder`]. Every step races
//! an interrupt future so an operator cancel still produces a report with
//! everything recorded up to that point.

use std::future::Future;
use std::path::PathBuf;

use crate::common::Result;
use crate::recorder::{LogKind, Recorder};

use super::config::{TestScenario, TestStep};

/// Result of a scenario run that reached the report stage normally
#[derive(Debug)]
pub struct RunOutcome {
    pub name: String,
    /// `None` when the report could not be written (the failure is in the logs)
    pub report_path: Option<PathBuf>,
    pub success_rate: f64,
    /// The operator cancelled the run
    pub interrupted: bool,
    pub steps_run: usize,
    pub steps_total: usize,
}

/// Run `scenario` on an open recorder
///
/// Step failures that the recorder handles itself (remote errors,
/// timeouts) never stop the run. Anything else, such as operator input
/// closing, is logged, the report is written, and the error is returned.
/// When `interrupt` completes the current step is abandoned and the run is
/// finalized as interrupted.
pub async fn run_scenario<F>(
    scenario: &TestScenario,
    recorder: &mut Recorder,
    interrupt: F,
) -> Result<RunOutcome>
where
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    let steps_total = scenario.step_count();
    let mut steps_run = 0;
    let mut interrupted = false;
    let mut failure = None;

    'phases: for phase in &scenario.phases {
        recorder.start_phase(phase.name.as_str());

        for step in &phase.steps {
            let step_result = tokio::select! {
                result = execute_step(recorder, step) => Some(result),
                _ = &mut interrupt => None,
            };

            match step_result {
                Some(Ok(())) => steps_run += 1,
                Some(Err(e)) => {
                    tracing::error!(step = %step.label(), "Step failed: {}", e);
                    failure = Some(e);
                    break 'phases;
                }
                None => {
                    tracing::info!(step = %step.label(), "Interrupted");
                    interrupted = true;
                    break 'phases;
                }
            }
        }
    }

    if interrupted {
        recorder.warning("Test interrupted by operator");
    }
    if let Some(e) = &failure {
        recorder.error(format!("Exception: {}", e));
    }

    let report_path = recorder.finish();

    if let Some(e) = failure {
        return Err(e);
    }

    Ok(RunOutcome {
        name: scenario.name.clone(),
        report_path,
        success_rate: recorder.success_rate(),
        interrupted,
        steps_run,
        steps_total,
    })
}

/// Execute a single test step
async fn execute_step(recorder: &mut Recorder, step: &TestStep) -> Result<()> {
    match step {
        TestStep::Instruction { lines } => recorder.instruct(lines.iter().cloned()),
        TestStep::Substep { number, title } => recorder.substep(number.as_str(), title.as_str()),
        TestStep::Javascript { code } => recorder.show_javascript(code.as_str()),
        TestStep::Check {
            description,
            command,
        } => {
            recorder.verify(description, command).await;
        }
        TestStep::Wp { description, args } => {
            let command = recorder.wp().raw(args);
            recorder.verify(description, &command).await;
        }
        TestStep::PluginActive { slug } => {
            let command = recorder.wp().plugin_is_active(slug);
            recorder.verify(&format!("Plugin {} active", slug), &command).await;
        }
        TestStep::Eval { description, php } => {
            let command = recorder.wp().eval(php);
            recorder.verify(description, &command).await;
        }
        TestStep::DbQuery { description, sql } => {
            let command = recorder.wp().db_query(sql);
            recorder.verify(description, &command).await;
        }
        TestStep::GetOption {
            name,
            expect_contains,
        } => execute_option_step(recorder, name, expect_contains.as_deref()).await,
        TestStep::Observe { questions } => {
            recorder.record_observations(questions.as_slice()).await?;
        }
        TestStep::Confirm { message } => recorder.confirm(message.as_str()).await?,
        TestStep::Log { kind, message } => recorder.log(*kind, message.as_str()),
        TestStep::Snapshot { payload } => {
            let payload = if payload.is_null() {
                serde_json::json!({
                    "session": recorder.info(),
                    "phases": recorder.phases(),
                    "logs": recorder.logs(),
                    "observations": recorder.observations(),
                })
            } else {
                payload.clone()
            };
            recorder.save_debug_snapshot(&payload);
        }
    }
    Ok(())
}

async fn execute_option_step(recorder: &mut Recorder, name: &str, expected: Option<&str>) {
    let value = recorder.wp_option(name).await;
    let shown = match &value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "none".to_string(),
    };
    recorder.info_log(format!("Option {}: {}", name, shown));

    if let Some(expected) = expected {
        let (kind, message) = if value.is_some() && shown.contains(expected) {
            (LogKind::Success, format!("Option {} contains '{}'", name, expected))
        } else {
            (
                LogKind::Warning,
                format!("Option {} does not contain '{}' - the test may fail", name, expected),
            )
        };
        recorder.log(kind, message);
    }
}
