//! Report command for printing clock reports.
//!
//! This module implements `wl report` with period options
//! (--today, --week, --month, --after/--before) and output formats
//! (chronological text, per-project summary, JSON).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{ArgGroup, Args};
use wl_core::{ClockRecords, format_project_summary, format_report, format_report_json};

use crate::Config;
use crate::commands::util::load_worklog;
use crate::config::InvertedPolicy;

#[derive(Debug, Default, Args)]
#[command(group(ArgGroup::new("period").args(["today", "week", "month", "after"])))]
pub struct ReportArgs {
    /// Work log to read; defaults to the configured `worklog_path`.
    pub file: Option<PathBuf>,

    /// Only clocks started today.
    #[arg(long)]
    pub today: bool,

    /// Only clocks started this week (Monday to Sunday).
    #[arg(long)]
    pub week: bool,

    /// Only clocks started this calendar month.
    #[arg(long)]
    pub month: bool,

    /// First day of an explicit range (any day spec).
    #[arg(long, requires = "before", allow_hyphen_values = true)]
    pub after: Option<String>,

    /// Last day of an explicit range (any day spec).
    #[arg(long, requires = "after", allow_hyphen_values = true)]
    pub before: Option<String>,

    /// Restrict to a project tag; repeat for several.
    #[arg(long = "project", short = 'p')]
    pub projects: Vec<String>,

    /// Print hours per project instead of the chronological listing.
    #[arg(long, conflicts_with = "json")]
    pub summary: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Report period resolved from the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    All,
    Today,
    Week,
    Month,
    Range { after: String, before: String },
}

impl ReportArgs {
    pub fn period(&self) -> Period {
        if self.today {
            Period::Today
        } else if self.week {
            Period::Week
        } else if self.month {
            Period::Month
        } else if let (Some(after), Some(before)) = (&self.after, &self.before) {
            Period::Range {
                after: after.clone(),
                before: before.clone(),
            }
        } else {
            Period::All
        }
    }
}

/// Applies the configured end-before-start policy.
pub fn apply_inverted_policy(records: ClockRecords, policy: InvertedPolicy) -> Result<ClockRecords> {
    match policy {
        InvertedPolicy::Keep => Ok(records),
        InvertedPolicy::Drop => {
            let dropped = records.inverted().len();
            if dropped > 0 {
                tracing::info!(dropped, "dropping clocks that end before they start");
            }
            Ok(records.valid_only())
        }
        InvertedPolicy::Error => {
            if let Some(first) = records.inverted().iter().next() {
                first
                    .validate()
                    .with_context(|| format!("{}: {}", first.project, first.description))?;
            }
            Ok(records)
        }
    }
}

/// Narrows records to the requested period and projects.
pub fn select_records(
    records: &ClockRecords,
    period: &Period,
    projects: &[String],
    now: NaiveDateTime,
) -> Result<ClockRecords> {
    let windowed = match period {
        Period::All => records.clone(),
        Period::Today => records.today_at(now),
        Period::Week => records.this_week_at(now),
        Period::Month => records.this_month_at(now),
        Period::Range { after, before } => {
            let today = now.date();
            let after = wl_core::resolve_day(Some(after), 0, today)?;
            let before = wl_core::resolve_day(Some(before), 0, today)?;
            let projects = (!projects.is_empty()).then_some(projects);
            return Ok(records.select(
                &after.format("%Y-%m-%d").to_string(),
                &before.format("%Y-%m-%d").to_string(),
                projects,
            )?);
        }
    };

    if projects.is_empty() {
        Ok(windowed)
    } else {
        Ok(windowed.with_projects(projects))
    }
}

/// Renders the selected records in the requested format.
pub fn render(args: &ReportArgs, records: &ClockRecords) -> Result<String> {
    if args.json {
        let mut output = format_report_json(records)?;
        output.push('\n');
        Ok(output)
    } else if args.summary {
        Ok(format_project_summary(records))
    } else {
        Ok(format_report(records))
    }
}

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let parsed = load_worklog(args.file.as_deref(), config)?;
    let records = apply_inverted_policy(parsed.records, config.inverted)?;
    let now = Local::now().naive_local();
    let selected = select_records(&records, &args.period(), &args.projects, now)?;
    tracing::debug!(
        total = records.len(),
        selected = selected.len(),
        "selected clocks"
    );

    write!(writer, "{}", render(args, &selected)?)?;
    Ok(())
}
