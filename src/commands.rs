//! CLI command definitions
//!
//! Defines the clap commands for the e2e CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interactive test scenario and write its report
    Run {
        /// Path to the YAML test scenario file
        scenario: PathBuf,

        /// Directory for the Markdown report (overrides [report].dir)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Write debug snapshots next to the report
        #[arg(long)]
        debug: bool,

        /// Timeout for each remote check, in seconds (overrides [remote].timeout_secs)
        #[arg(long)]
        timeout: Option<u64>,

        /// DDEV project directory for WP-CLI commands (overrides [remote].project_dir)
        #[arg(long)]
        project_dir: Option<String>,

        /// Shell invocation prefix, taking every remaining argument (e.g. --shell wsl -d Ubuntu bash -c)
        #[arg(long, num_args = 1.., allow_hyphen_values = true)]
        shell: Vec<String>,

        /// Configuration file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse a scenario and list its phases without running anything
    Validate {
        /// Path to the YAML test scenario file
        scenario: PathBuf,
    },
}
