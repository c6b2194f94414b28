//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};
use crate::recorder::{LogKind, SessionInfo};

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TestScenario {
    /// Identifier used in report file names (e.g. "E2E_001")
    pub id: String,
    /// Display name of the scenario
    pub name: String,
    /// What the scenario verifies
    #[serde(default)]
    pub description: String,
    /// Rough duration estimate shown in the report header
    pub estimated_duration: Option<String>,
    /// Modules this scenario exercises
    #[serde(default)]
    pub modules_tested: Vec<String>,
    /// Phases, executed in order
    pub phases: Vec<PhaseSpec>,
}

/// A named group of steps
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct PhaseSpec {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

/// A single test step in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Print numbered instructions for the operator
    Instruction {
        lines: Vec<String>,
    },
    /// Print a sub-step heading
    Substep {
        number: String,
        title: String,
    },
    /// Print a JavaScript snippet to run in the browser console
    Javascript {
        code: String,
    },
    /// Run a raw shell command as a remote check
    Check {
        description: String,
        command: String,
    },
    /// Run `ddev wp <args>` from the project directory
    Wp {
        description: String,
        args: String,
    },
    /// `ddev wp plugin is-active <slug>`
    PluginActive {
        slug: String,
    },
    /// Run a PHP snippet through `ddev wp eval`
    Eval {
        description: String,
        php: String,
    },
    /// Run SQL through `ddev wp db query`
    DbQuery {
        description: String,
        sql: String,
    },
    /// Fetch an option and optionally look for a substring in it
    #[serde(rename = "option")]
    GetOption {
        name: String,
        /// Logged as success when found, warning otherwise
        expect_contains: Option<String>,
    },
    /// Ask the operator questions
    Observe {
        questions: Vec<String>,
    },
    /// Wait for the operator to press Enter
    Confirm {
        message: String,
    },
    /// Record a log entry directly
    Log {
        kind: LogKind,
        message: String,
    },
    /// Dump a payload when debug snapshots are enabled
    Snapshot {
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl TestScenario {
    /// Load and parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        let scenario: TestScenario =
            serde_yaml::from_str(&content).map_err(|e| Error::scenario_parse(path, e))?;
        scenario.validate().map_err(|reason| Error::scenario_parse(path, reason))?;
        Ok(scenario)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("'id' must not be empty".to_string());
        }
        if self.id.contains(['/', '\\']) {
            return Err(format!("'id' must be usable as a file name, got '{}'", self.id));
        }
        if self.phases.is_empty() {
            return Err("scenario has no phases".to_string());
        }
        Ok(())
    }

    /// Session metadata for the recorder
    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            estimated_duration: self.estimated_duration.clone(),
            modules_tested: self.modules_tested.clone(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }
}

impl TestStep {
    /// Short label for listings
    pub fn label(&self) -> String {
        match self {
            TestStep::Instruction { lines } => format!("instruction ({} lines)", lines.len()),
            TestStep::Substep { number, title } => format!("substep {} {}", number, title),
            TestStep::Javascript { .. } => "javascript".to_string(),
            TestStep::Check { description, .. } => format!("check: {}", description),
            TestStep::Wp { description, .. } => format!("wp: {}", description),
            TestStep::PluginActive { slug } => format!("plugin active: {}", slug),
            TestStep::Eval { description, .. } => format!("eval: {}", description),
            TestStep::DbQuery { description, .. } => format!("db query: {}", description),
            TestStep::GetOption { name, .. } => format!("option: {}", name),
            TestStep::Observe { questions } => format!("observe ({} questions)", questions.len()),
            TestStep::Confirm { message } => format!("confirm: {}", message),
            TestStep::Log { kind, message } => format!("log {}: {}", kind, message),
            TestStep::Snapshot { .. } => "snapshot".to_string(),
        }
    }
}
