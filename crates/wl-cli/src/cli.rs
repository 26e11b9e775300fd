//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::report::ReportArgs;

/// Work-log clock reporter.
///
/// Reads clock intervals from an outline work log and prints chronological
/// reports with worked-hour totals.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a chronological clock report.
    Report(ReportArgs),

    /// Resolve a day spec (today, yesterday, tomorrow, -3d, +5d, YYYY-MM-DD).
    Day {
        /// The day spec; defaults to today.
        #[arg(allow_hyphen_values = true)]
        spec: Option<String>,

        /// Extra days to add after resolving the spec.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },

    /// List lines that could not be parsed cleanly.
    Check {
        /// Work log to check; defaults to the configured `worklog_path`.
        file: Option<PathBuf>,
    },
}
