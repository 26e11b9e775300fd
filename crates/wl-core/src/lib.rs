//! Core domain logic for the work-log clock reporter.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing: extracting clock intervals from outline work logs
//! - Selection: calendar and project views over parsed records
//! - Reporting: chronological text, per-project and JSON reports
//! - Day specs: resolving "yesterday", "-3d" and friends into dates

pub mod clock;
pub mod dayspec;
pub mod parser;
mod records;
pub mod report;

pub use clock::{ClockRecord, ValidationError};
pub use dayspec::{DaySpecError, resolve_day, tellday};
pub use parser::{IssueKind, ParseIssue, Parsed, ReadError, parse_lines, parse_str, read_file};
pub use records::{ClockRecords, SelectError};
pub use report::{format_project_summary, format_report, format_report_json};
