//! Resolution of human day specifications into calendar dates.

use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use thiserror::Error;

/// Relative day offsets: "+5d", "-3d".
static RELATIVE_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]\d+)d$").expect("valid regex"));

/// Literal ISO dates: "2024-01-31".
static ISO_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Errors from day specification resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DaySpecError {
    #[error(
        "unrecognized day spec '{0}': use today, yesterday, tomorrow, +Nd, -Nd or YYYY-MM-DD"
    )]
    Unrecognized(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("day offset out of range for '{0}'")]
    OutOfRange(String),
}

/// Resolves `spec` relative to `today`, then shifts the result by `offset_days`.
///
/// Supports:
/// - absent or "today"
/// - "yesterday", "tomorrow"
/// - signed day offsets: "-3d", "+5d"
/// - literal dates: "2024-01-31"
pub fn resolve_day(
    spec: Option<&str>,
    offset_days: i64,
    today: NaiveDate,
) -> Result<NaiveDate, DaySpecError> {
    let spec = spec.map(str::trim);
    let label = spec.unwrap_or("today");

    let day = match spec {
        None | Some("today") => today,
        Some("yesterday") => shift(today, -1, label)?,
        Some("tomorrow") => shift(today, 1, label)?,
        Some(s) => {
            if let Some(caps) = RELATIVE_DAY_RE.captures(s) {
                let n: i64 = caps[1]
                    .parse()
                    .map_err(|_| DaySpecError::OutOfRange(s.to_string()))?;
                shift(today, n, s)?
            } else if ISO_DAY_RE.is_match(s) {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| DaySpecError::InvalidDate(s.to_string()))?
            } else {
                return Err(DaySpecError::Unrecognized(s.to_string()));
            }
        }
    };

    shift(day, offset_days, label)
}

/// Resolves `spec` against the local current date and returns it as `YYYY-MM-DD`.
pub fn tellday(spec: Option<&str>, offset_days: i64) -> Result<String, DaySpecError> {
    let today = Local::now().date_naive();
    let day = resolve_day(spec, offset_days, today)?;
    Ok(day.format("%Y-%m-%d").to_string())
}

fn shift(day: NaiveDate, days: i64, spec: &str) -> Result<NaiveDate, DaySpecError> {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        day.checked_add_days(magnitude)
    } else {
        day.checked_sub_days(magnitude)
    };
    shifted.ok_or_else(|| DaySpecError::OutOfRange(spec.to_string()))
}
