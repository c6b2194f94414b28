//! Error types for the E2E harness
//!
//! Most failures during a session (remote command errors, timeouts, report
//! write errors) are recorded as log entries and never reach this type.
//! What remains here is what stops a run: bad configuration, unreadable
//! scenarios, a closed operator input.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Scenario Errors ===
    #[error("Invalid scenario '{path}': {reason}")]
    ScenarioParse { path: String, reason: String },

    // === Operator Input Errors ===
    #[error("Operator input closed while waiting for: {0}")]
    InputClosed(String),

    // === Bridge Errors ===
    #[error("Shell '{0}' not found in PATH. Set [remote].shell in the config file or pass --shell")]
    ShellNotFound(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a scenario parse error for the given file
    pub fn scenario_parse(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
