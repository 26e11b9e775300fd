//! Clock records extracted from a work log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display format for clock timestamps in reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validation errors for clock records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The interval ends before it starts.
    #[error("clock ends before it starts: {start} > {end}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// A single clocked interval together with the context it was recorded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockRecord {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Project tag in effect when the clock line was read (may be empty).
    pub project: String,
    /// Heading text in effect when the clock line was read (may be empty).
    pub description: String,
}

impl ClockRecord {
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        project: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            project: project.into(),
            description: description.into(),
        }
    }

    /// Length of the interval in fractional hours.
    ///
    /// Negative when `end < start`; no clamping is applied.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }

    /// Checks that the interval does not run backwards.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn duration_is_fractional_hours() {
        let record = ClockRecord::new(at(1, 9, 0), at(1, 10, 30), "ProjA", "Write spec");
        assert!((record.duration_hours() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_spans_midnight() {
        let record = ClockRecord::new(at(1, 23, 0), at(2, 1, 15), "ProjA", "Late");
        assert!((record.duration_hours() - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn inverted_interval_has_negative_duration() {
        let record = ClockRecord::new(at(1, 10, 0), at(1, 9, 0), "ProjA", "Oops");
        assert!((record.duration_hours() + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let record = ClockRecord::new(at(1, 10, 0), at(1, 9, 0), "ProjA", "Oops");
        let err = record.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::EndBeforeStart {
                start: at(1, 10, 0),
                end: at(1, 9, 0),
            }
        );
        assert_eq!(
            err.to_string(),
            "clock ends before it starts: 2024-01-01 10:00:00 > 2024-01-01 09:00:00"
        );
    }

    #[test]
    fn validate_accepts_zero_length() {
        let record = ClockRecord::new(at(1, 9, 0), at(1, 9, 0), "ProjA", "Blip");
        assert!(record.validate().is_ok());
    }
}
