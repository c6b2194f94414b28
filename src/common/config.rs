//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Remote environment settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// How remote checks reach the development environment
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Shell invocation prefix; the command string is appended as the last argument
    #[serde(default = "default_shell")]
    pub shell: Vec<String>,

    /// Project directory that `ddev wp` commands run from
    #[serde(default = "default_project_dir")]
    pub project_dir: String,

    /// Hard timeout for a single remote check
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            project_dir: default_project_dir(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_shell() -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string()]
}
fn default_project_dir() -> String {
    "~/projects/tb-wp-dev".to_string()
}
fn default_timeout() -> u64 {
    30
}

/// Report output settings
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Directory receiving Markdown reports and debug snapshots
    #[serde(default = "default_report_dir")]
    pub dir: PathBuf,

    /// Write debug snapshots
    #[serde(default)]
    pub debug: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
            debug: false,
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, &e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.remote.shell, vec!["sh", "-c"]);
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.report.dir, PathBuf::from("reports"));
        assert!(!config.report.debug);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [remote]
            shell = ["wsl", "-d", "Ubuntu", "bash", "-c"]

            [report]
            debug = true
            "#,
        )
        .unwrap();
        assert_eq!(config.remote.shell[0], "wsl");
        assert_eq!(config.remote.project_dir, "~/projects/tb-wp-dev");
        assert_eq!(config.remote.timeout_secs, 30);
        assert!(config.report.debug);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse("[remote\nshell = 3").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }
}
