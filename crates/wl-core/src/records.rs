//! Record collections and their calendar selection views.
//!
//! Every view returns a fresh [`ClockRecords`]; the source collection is
//! never mutated. Windows are inclusive on both ends and compare the
//! record's start timestamp only.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::clock::ClockRecord;

/// Errors from explicit date-range selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// An ordered collection of clock records.
///
/// Order is the order records were parsed in; sorting only happens when a
/// report is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClockRecords(Vec<ClockRecord>);

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last instant of a day at minute resolution.
const END_OF_DAY: NaiveTime = NaiveTime::from_hms_opt(23, 59, 0).unwrap();

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_time(END_OF_DAY)
}

impl ClockRecords {
    pub const fn new(records: Vec<ClockRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClockRecord> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ClockRecord] {
        &self.0
    }

    fn filtered(&self, keep: impl Fn(&ClockRecord) -> bool) -> Self {
        self.0.iter().filter(|c| keep(c)).cloned().collect()
    }

    /// Records whose start lies in `[lo, hi]`.
    pub fn between(&self, lo: NaiveDateTime, hi: NaiveDateTime) -> Self {
        self.filtered(|c| lo <= c.start && c.start <= hi)
    }

    /// Records started on the calendar day of `now`.
    pub fn today_at(&self, now: NaiveDateTime) -> Self {
        let date = now.date();
        self.between(day_start(date), day_end(date))
    }

    /// Records started in the Monday-to-Sunday week containing `now`.
    pub fn this_week_at(&self, now: NaiveDateTime) -> Self {
        let date = now.date();
        let days_since_monday = u64::from(date.weekday().num_days_from_monday());
        let monday = date - Days::new(days_since_monday);
        let sunday = monday + Days::new(6);
        self.between(day_start(monday), day_end(sunday))
    }

    /// Records started in the calendar month containing `now`.
    pub fn this_month_at(&self, now: NaiveDateTime) -> Self {
        let date = now.date();
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        self.between(day_start(first), day_end(last))
    }

    pub fn today(&self) -> Self {
        self.today_at(Local::now().naive_local())
    }

    pub fn this_week(&self) -> Self {
        self.this_week_at(Local::now().naive_local())
    }

    pub fn this_month(&self) -> Self {
        self.this_month_at(Local::now().naive_local())
    }

    /// Records started between `after` 00:00 and `before` 23:59, both given as
    /// `YYYY-MM-DD`, optionally restricted to a set of project tags.
    pub fn select<S: AsRef<str>>(
        &self,
        after: &str,
        before: &str,
        projects: Option<&[S]>,
    ) -> Result<Self, SelectError> {
        let lo = day_start(parse_date(after)?);
        let hi = day_end(parse_date(before)?);
        let windowed = self.between(lo, hi);
        Ok(match projects {
            Some(projects) => windowed.with_projects(projects),
            None => windowed,
        })
    }

    /// Records whose project tag is one of `projects`.
    pub fn with_projects<S: AsRef<str>>(&self, projects: &[S]) -> Self {
        self.filtered(|c| projects.iter().any(|p| p.as_ref() == c.project))
    }

    /// Sum of all durations in fractional hours.
    ///
    /// Durations are added in start order (ties in collection order), so the
    /// unrounded total does not depend on how the collection was assembled.
    /// An empty collection totals `0.0`, never `-0.0`.
    pub fn total_hours(&self) -> f64 {
        let mut sorted: Vec<_> = self.0.iter().collect();
        sorted.sort_by_key(|c| c.start);
        sorted
            .into_iter()
            .map(ClockRecord::duration_hours)
            .fold(0.0, |acc, h| acc + h)
    }

    /// Hours per project tag, ordered by tag.
    pub fn by_project(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for record in &self.0 {
            *totals.entry(record.project.clone()).or_insert(0.0) += record.duration_hours();
        }
        totals
    }

    /// Records that end before they start.
    pub fn inverted(&self) -> Self {
        self.filtered(|c| c.validate().is_err())
    }

    /// Records that pass validation.
    pub fn valid_only(&self) -> Self {
        self.filtered(|c| c.validate().is_ok())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, SelectError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SelectError::InvalidDate(s.to_string()))
}

impl FromIterator<ClockRecord> for ClockRecords {
    fn from_iter<I: IntoIterator<Item = ClockRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<ClockRecord>> for ClockRecords {
    fn from(records: Vec<ClockRecord>) -> Self {
        Self(records)
    }
}

impl IntoIterator for ClockRecords {
    type Item = ClockRecord;
    type IntoIter = std::vec::IntoIter<ClockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClockRecords {
    type Item = &'a ClockRecord;
    type IntoIter = std::slice::Iter<'a, ClockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(start: NaiveDateTime, hours: i64, project: &str) -> ClockRecord {
        ClockRecord::new(
            start,
            start + chrono::Duration::hours(hours),
            project,
            "task",
        )
    }

    fn starts(records: &ClockRecords) -> Vec<NaiveDateTime> {
        records.iter().map(|c| c.start).collect()
    }

    #[test]
    fn this_week_keeps_monday_and_drops_eight_days_earlier() {
        // Jan 31, 2024 is a Wednesday; Monday is Jan 29.
        let now = at(2024, 1, 31, 15, 0);
        let monday = record(at(2024, 1, 29, 9, 0), 1, "A");
        let earlier = record(at(2024, 1, 21, 9, 0), 1, "A");
        let records = ClockRecords::new(vec![monday.clone(), earlier]);

        let week = records.this_week_at(now);
        assert_eq!(week, ClockRecords::new(vec![monday]));
    }

    #[test]
    fn this_week_runs_monday_midnight_to_sunday_2359() {
        // Sunday Feb 4, 2024 belongs to the week starting Monday Jan 29.
        let now = at(2024, 2, 4, 8, 0);
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 28, 23, 59), 1, "A"),
            record(at(2024, 1, 29, 0, 0), 1, "A"),
            record(at(2024, 2, 4, 23, 59), 1, "A"),
            record(at(2024, 2, 5, 0, 0), 1, "A"),
        ]);

        assert_eq!(
            starts(&records.this_week_at(now)),
            vec![at(2024, 1, 29, 0, 0), at(2024, 2, 4, 23, 59)]
        );
    }

    #[test]
    fn this_month_in_leap_february() {
        let now = at(2024, 2, 10, 12, 0);
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 31, 23, 59), 1, "A"),
            record(at(2024, 2, 1, 0, 0), 1, "A"),
            record(at(2024, 2, 29, 23, 59), 1, "A"),
            record(at(2024, 3, 1, 0, 0), 1, "A"),
        ]);

        assert_eq!(
            starts(&records.this_month_at(now)),
            vec![at(2024, 2, 1, 0, 0), at(2024, 2, 29, 23, 59)]
        );
    }

    #[test]
    fn this_month_in_december_rolls_year() {
        let now = at(2023, 12, 5, 12, 0);
        let records = ClockRecords::new(vec![
            record(at(2023, 12, 31, 18, 0), 1, "A"),
            record(at(2024, 1, 1, 0, 0), 1, "A"),
        ]);

        assert_eq!(
            starts(&records.this_month_at(now)),
            vec![at(2023, 12, 31, 18, 0)]
        );
    }

    #[test]
    fn today_is_whole_calendar_day() {
        let now = at(2024, 1, 31, 0, 1);
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 30, 23, 0), 2, "A"),
            record(at(2024, 1, 31, 0, 0), 1, "A"),
            record(at(2024, 1, 31, 23, 59), 1, "A"),
        ]);

        assert_eq!(
            starts(&records.today_at(now)),
            vec![at(2024, 1, 31, 0, 0), at(2024, 1, 31, 23, 59)]
        );
    }

    #[test]
    fn select_is_inclusive_and_preserves_order() {
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 3, 23, 59), 1, "A"),
            record(at(2024, 1, 1, 0, 0), 1, "B"),
            record(at(2024, 1, 4, 0, 0), 1, "A"),
            record(at(2023, 12, 31, 23, 59), 1, "A"),
        ]);

        let selected = records.select::<&str>("2024-01-01", "2024-01-03", None).unwrap();
        assert_eq!(
            starts(&selected),
            vec![at(2024, 1, 3, 23, 59), at(2024, 1, 1, 0, 0)]
        );
    }

    #[test]
    fn select_filters_by_project_set() {
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 1, 9, 0), 1, "A"),
            record(at(2024, 1, 1, 11, 0), 1, "B"),
            record(at(2024, 1, 1, 13, 0), 1, "C"),
        ]);

        let selected = records
            .select("2024-01-01", "2024-01-01", Some(&["A", "C"][..]))
            .unwrap();
        let projects: Vec<_> = selected.iter().map(|c| c.project.as_str()).collect();
        assert_eq!(projects, vec!["A", "C"]);
    }

    #[test]
    fn select_with_empty_project_set_selects_nothing() {
        let records = ClockRecords::new(vec![record(at(2024, 1, 1, 9, 0), 1, "A")]);
        let none: [&str; 0] = [];
        let selected = records
            .select("2024-01-01", "2024-01-01", Some(&none[..]))
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn select_rejects_bad_dates() {
        let records = ClockRecords::default();
        assert_eq!(
            records.select::<&str>("2024-13-01", "2024-12-01", None),
            Err(SelectError::InvalidDate("2024-13-01".to_string()))
        );
        assert_eq!(
            records.select::<&str>("2024-01-01", "tomorrow", None),
            Err(SelectError::InvalidDate("tomorrow".to_string()))
        );
    }

    #[test]
    fn views_do_not_mutate_source() {
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 1, 9, 0), 1, "A"),
            record(at(2024, 2, 1, 9, 0), 1, "B"),
        ]);
        let before = records.clone();
        let _ = records.this_month_at(at(2024, 1, 15, 0, 0));
        let _ = records.select::<&str>("2024-01-01", "2024-01-01", None);
        assert_eq!(records, before);
    }

    #[test]
    fn totals_and_per_project_hours() {
        let records = ClockRecords::new(vec![
            record(at(2024, 1, 1, 9, 0), 2, "B"),
            record(at(2024, 1, 1, 11, 0), 1, "A"),
            record(at(2024, 1, 1, 13, 0), 3, "B"),
        ]);

        assert!((records.total_hours() - 6.0).abs() < f64::EPSILON);
        let by_project: Vec<_> = records.by_project().into_iter().collect();
        assert_eq!(
            by_project,
            vec![("A".to_string(), 1.0), ("B".to_string(), 5.0)]
        );
    }

    #[test]
    fn total_hours_adds_in_start_order() {
        let minutes = |start: NaiveDateTime, m: i64| {
            ClockRecord::new(start, start + chrono::Duration::minutes(m), "A", "task")
        };
        let records = ClockRecords::new(vec![
            minutes(at(2024, 1, 1, 12, 0), 18),
            minutes(at(2024, 1, 1, 10, 0), 12),
            minutes(at(2024, 1, 1, 9, 0), 6),
        ]);

        // 0.1 + 0.2 + 0.3, not 0.3 + 0.2 + 0.1
        assert_eq!(records.total_hours().to_string(), "0.6000000000000001");
    }

    #[test]
    fn inverted_and_valid_partition() {
        let good = record(at(2024, 1, 1, 9, 0), 1, "A");
        let bad = record(at(2024, 1, 1, 12, 0), -1, "A");
        let records = ClockRecords::new(vec![good.clone(), bad.clone()]);

        assert_eq!(records.inverted(), ClockRecords::new(vec![bad]));
        assert_eq!(records.valid_only(), ClockRecords::new(vec![good]));
    }
}
