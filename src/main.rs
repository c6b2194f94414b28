//! e2e - interactive end-to-end test sessions
//!
//! Runs YAML scenarios that mix remote WP-CLI checks with operator
//! observations, and writes a Markdown report for each run.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use e2e_harness::cli::{self, Completion};
use e2e_harness::commands;
use e2e_harness::common::logging;

#[derive(Parser)]
#[command(name = "e2e", about = "Interactive E2E test sessions with Markdown reports")]
#[command(version, long_about = None)]
struct Cli {
    /// Also write diagnostics to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Flushes the log file on drop
    let guard = match &cli.log_file {
        Some(path) => match logging::init_with_file(path) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Error: cannot open log file '{}': {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            logging::init_cli();
            None
        }
    };

    let code = match cli::dispatch(cli.command).await {
        Ok(Completion::Done) => 0,
        Ok(Completion::Interrupted) => 130,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    drop(guard);
    // A pending stdin read would otherwise keep the runtime alive
    std::process::exit(code);
}
