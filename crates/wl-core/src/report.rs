//! Chronological clock reports.
//!
//! The text report lists records in start order. Runs of back-to-back
//! records share one start header; every record is followed by its end
//! timestamp. The report closes with the total worked hours.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::{ClockRecord, TIMESTAMP_FORMAT};
use crate::records::ClockRecords;

/// Width of the centered timestamp rules.
const RULE_WIDTH: usize = 72;

/// Label used for records with no project tag in summaries.
const UNTAGGED: &str = "(untagged)";

/// Records sorted by start; ties keep their collection order.
fn chronological(records: &ClockRecords) -> Vec<&ClockRecord> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by_key(|c| c.start);
    sorted
}

/// Formats hours the way a float literal reads: `3.0`, `1.5`, `0.1`.
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent form with a
/// signed, two-digit exponent: `5.551115123125783e-17`, `1e+16`.
#[allow(clippy::float_cmp)]
pub fn format_hours(hours: f64) -> String {
    let magnitude = hours.abs();
    if hours.is_finite() && hours != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{hours:e}");
        let Some((mantissa, exponent)) = formatted.split_once('e') else {
            return formatted;
        };
        match exponent.parse::<i32>() {
            Ok(exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
            }
            Err(_) => formatted,
        }
    } else if hours.is_finite() && hours.fract() == 0.0 {
        format!("{hours:.1}")
    } else {
        format!("{hours}")
    }
}

/// A timestamp centered in a rule of dashes.
fn rule(timestamp: NaiveDateTime) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
    format!("{stamp:-^width$}", width = RULE_WIDTH)
}

// ========== Text Report ==========

/// Renders the chronological text report.
pub fn format_report(records: &ClockRecords) -> String {
    let mut output = String::new();
    let mut last_end = None;

    for clock in chronological(records) {
        if last_end != Some(clock.start) {
            writeln!(output).unwrap();
            writeln!(output, "{}", rule(clock.start)).unwrap();
        }
        writeln!(output, "{}: {}", clock.project, clock.description).unwrap();
        writeln!(output, "{}", rule(clock.end)).unwrap();
        last_end = Some(clock.end);
    }

    if output.starts_with('\n') {
        output.remove(0);
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Worked hours: {}",
        format_hours(records.total_hours())
    )
    .unwrap();
    output
}

/// Renders hours per project, one line each, followed by the total.
pub fn format_project_summary(records: &ClockRecords) -> String {
    let mut output = String::new();
    for (project, hours) in records.by_project() {
        let label = if project.is_empty() {
            UNTAGGED
        } else {
            project.as_str()
        };
        writeln!(output, "{label}: {}", format_hours(hours)).unwrap();
    }
    writeln!(output, "Total: {}", format_hours(records.total_hours())).unwrap();
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub records: Vec<&'a ClockRecord>,
    pub by_project: BTreeMap<String, f64>,
    pub total_hours: f64,
}

/// Formats the records, per-project hours and total as pretty JSON.
pub fn format_report_json(records: &ClockRecords) -> serde_json::Result<String> {
    let report = JsonReport {
        records: chronological(records),
        by_project: records.by_project(),
        total_hours: records.total_hours(),
    };
    serde_json::to_string_pretty(&report)
}
