//! Line-oriented parser for outline work logs.
//!
//! A work log is an org-style outline where headings name tasks, `:PJN:`
//! properties name projects and `:CLOCK:` lines record worked intervals:
//!
//! ```text
//! * Write spec
//!   :PROPERTIES:
//!   :PJN: xxxxProjA
//!   :END:
//!   :LOGBOOK:
//!   :CLOCK: [2024-01-01 Mon 09:00]--[2024-01-01 Mon 10:30] =>  1:30
//!   :END:
//! ```
//!
//! Parsing is a single forward pass. The most recent heading and project tag
//! apply to every clock line that follows until they are superseded.
//! Malformed lines are reported as [`ParseIssue`]s and skipped; they never
//! abort the parse.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::clock::ClockRecord;
use crate::records::ClockRecords;

const HEADING_MARKER: char = '*';
const PROJECT_MARKER: &str = ":PJN:";
const CLOCK_MARKER: &str = ":CLOCK:";

/// Width of the fixed label that precedes the project tag value.
const PROJECT_LABEL_WIDTH: usize = 4;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*+ (.*)$").expect("valid regex"));

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CLOCK:\s\[(.*)\]--\[(.*)\].*").expect("valid regex"));

/// What went wrong on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// A `:CLOCK:` line that does not have the `[start]--[end]` shape.
    MalformedClock,
    /// A clock line whose bracketed timestamps cannot be decoded.
    BadTimestamp,
    /// A `:PJN:` line whose value is empty after the label is removed.
    EmptyProject,
    /// A line starting with `*` that is not a `* Title` heading.
    MalformedHeading,
    /// A clock interval that ends before it starts. The record is kept.
    EndBeforeStart,
}

impl IssueKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedClock => "malformed_clock",
            Self::BadTimestamp => "bad_timestamp",
            Self::EmptyProject => "empty_project",
            Self::MalformedHeading => "malformed_heading",
            Self::EndBeforeStart => "end_before_start",
        }
    }

    /// Whether the offending line was dropped.
    pub const fn skips_line(&self) -> bool {
        matches!(self, Self::MalformedClock | Self::BadTimestamp)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line number.
    pub line_no: usize,
    /// The offending line, without its line terminator.
    pub line: String,
    pub kind: IssueKind,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.line_no, self.kind, self.line)
    }
}

/// Output of a parse: the records plus everything that was skipped or suspicious.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub records: ClockRecords,
    pub issues: Vec<ParseIssue>,
}

/// Errors reading a work log from disk.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parses a sequence of lines.
pub fn parse_lines<I>(lines: I) -> Parsed
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut description = String::new();
    let mut project = String::new();

    let mut report = |line_no: usize, line: &str, kind: IssueKind| {
        tracing::warn!(line_no, line, %kind, "work log parse issue");
        issues.push(ParseIssue {
            line_no,
            line: line.to_string(),
            kind,
        });
    };

    for (idx, raw) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        let line = raw.as_ref().trim_end_matches(['\r', '\n']);

        if line.starts_with(HEADING_MARKER) {
            match HEADING_RE.captures(line) {
                Some(caps) => description = caps[1].trim().to_string(),
                None => report(line_no, line, IssueKind::MalformedHeading),
            }
        } else if let Some(value) = line.split(PROJECT_MARKER).nth(1) {
            // Only the text between the first marker and the next one counts.
            project = project_tag(value);
            if project.is_empty() {
                report(line_no, line, IssueKind::EmptyProject);
            }
        } else if line.contains(CLOCK_MARKER) {
            let Some(caps) = CLOCK_RE.captures(line) else {
                report(line_no, line, IssueKind::MalformedClock);
                continue;
            };
            let (Some(start), Some(end)) = (parse_timestamp(&caps[1]), parse_timestamp(&caps[2]))
            else {
                report(line_no, line, IssueKind::BadTimestamp);
                continue;
            };
            if end < start {
                report(line_no, line, IssueKind::EndBeforeStart);
            }
            records.push(ClockRecord::new(
                start,
                end,
                project.clone(),
                description.clone(),
            ));
        }
    }

    tracing::debug!(
        records = records.len(),
        issues = issues.len(),
        "parsed work log"
    );

    Parsed {
        records: ClockRecords::new(records),
        issues,
    }
}

/// Parses an in-memory buffer.
pub fn parse_str(text: &str) -> Parsed {
    parse_lines(text.lines())
}

/// Reads and parses a work log file.
pub fn read_file(path: &Path) -> Result<Parsed, ReadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&text))
}

/// Extracts the tag from the text following `:PJN:`.
fn project_tag(value: &str) -> String {
    let value = value.trim();
    let rest = value
        .char_indices()
        .nth(PROJECT_LABEL_WIDTH)
        .map_or("", |(i, _)| &value[i..]);
    rest.trim().to_string()
}

/// Decodes `YYYY-MM-DD <weekday> HH:MM`; the weekday token is ignored.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let mut tokens = s.split(' ');
    let date = NaiveDate::parse_from_str(tokens.next()?, "%Y-%m-%d").ok()?;
    let _weekday = tokens.next()?;
    let time = NaiveTime::parse_from_str(tokens.next()?, "%H:%M").ok()?;
    Some(date.and_time(time))
}
