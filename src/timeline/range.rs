//! Visible date range derivation.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

use super::date::{floor_to_hour, same_day, whole_hours_between, DateFormat};
use super::record::{first_valid, JobRunRecord, END_OR_SCHEDULED_FIELDS, START_FIELDS};

const HOURS_PER_DAY: i64 = 24;

/// The window of time the timeline shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    /// Start of the window, on an hour boundary.
    pub first_day: NaiveDateTime,
    /// The last day bucket; at least `total_span_hours` after `first_day`.
    pub last_day: NaiveDateTime,
    pub total_span_hours: i64,
    /// Header marks, one day apart from `first_day`.
    pub day_buckets: Vec<NaiveDateTime>,
    /// `first_day` falls on the current calendar day.
    pub contains_today: bool,
}

impl Range {
    /// Whole days covered, rounding a partial day up.
    pub fn day_count(&self) -> i64 {
        day_count(self.total_span_hours)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.first_day <= instant && instant <= self.last_day
    }
}

fn lead_in() -> TimeDelta {
    TimeDelta::hours(1)
}

fn day_count(span_hours: i64) -> i64 {
    (span_hours.max(0) + HOURS_PER_DAY - 1) / HOURS_PER_DAY
}

/// Earliest start minus an hour, never later than an hour before `now`.
///
/// Dates that cannot be shifted without leaving chrono's range are skipped.
pub fn first_day(
    format: &DateFormat,
    records: &[JobRunRecord],
    now: NaiveDateTime,
) -> NaiveDateTime {
    let earliest = records
        .iter()
        .filter_map(|r| first_valid(format, r, START_FIELDS))
        .filter_map(|start| start.checked_sub_signed(lead_in()))
        .min();

    let today = now.checked_sub_signed(lead_in()).unwrap_or(now);
    let first = match earliest {
        Some(first) if first <= today => first,
        _ => today,
    };

    floor_to_hour(first)
}

/// Latest start or end plus an hour. With no usable dates at all the window
/// closes an hour after `now`.
pub fn last_day(
    format: &DateFormat,
    records: &[JobRunRecord],
    now: NaiveDateTime,
) -> NaiveDateTime {
    let latest = records
        .iter()
        .flat_map(|r| {
            [
                first_valid(format, r, START_FIELDS),
                first_valid(format, r, END_OR_SCHEDULED_FIELDS),
            ]
        })
        .flatten()
        .filter_map(|date| date.checked_add_signed(lead_in()))
        .max();

    let last = latest.unwrap_or_else(|| now.checked_add_signed(lead_in()).unwrap_or(now));
    floor_to_hour(last)
}

/// Derive the full range, padding the span forward to `min_hours`.
///
/// `last_day` is the final day bucket, so it never falls before the padded
/// span end.
pub fn derive(
    format: &DateFormat,
    records: &[JobRunRecord],
    now: NaiveDateTime,
    min_hours: i64,
) -> Range {
    let first = first_day(format, records, now);
    let last = last_day(format, records, now);

    let mut total_span_hours = whole_hours_between(last, first);
    if total_span_hours < min_hours {
        total_span_hours = min_hours;
    }

    let day_buckets = day_buckets(first, total_span_hours);
    let range = Range {
        first_day: first,
        last_day: day_buckets.last().copied().unwrap_or(first),
        total_span_hours,
        day_buckets,
        contains_today: same_day(first, now),
    };

    debug!(
        records = records.len(),
        first_day = %range.first_day,
        last_day = %range.last_day,
        span_hours = range.total_span_hours,
        "derived timeline range"
    );

    range
}

/// One bucket per day of span plus the starting one. Stops early rather than
/// step past chrono's last representable instant.
fn day_buckets(first: NaiveDateTime, span_hours: i64) -> Vec<NaiveDateTime> {
    (0..=day_count(span_hours))
        .map_while(|i| first.checked_add_signed(TimeDelta::days(i)))
        .collect()
}
