//! Display helpers: header labels, detail timestamps and week counts.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::date::DateFormat;

pub const DEFAULT_HEADER_FORMAT: &str = "ddd MM/DD hh:mm";
pub const DEFAULT_DETAILS_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

const WORK_WEEK_DAYS: f64 = 5.0;

/// Rendered in place of a timestamp that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid date";

pub fn format_header(header: &DateFormat, instant: NaiveDateTime) -> String {
    header.format(instant)
}

/// Re-render a stored timestamp string for the details popup.
pub fn format_details(input: &DateFormat, details: &DateFormat, raw: &str) -> String {
    match input.parse(raw) {
        Some(instant) => details.format(instant),
        None => INVALID_DATE.to_string(),
    }
}

/// A number of work weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeekCount {
    Whole(i64),
    /// Rounded to one decimal place.
    Fractional(String),
}

impl fmt::Display for WeekCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(weeks) => write!(f, "{weeks}"),
            Self::Fractional(weeks) => f.write_str(weeks),
        }
    }
}

/// Convert days into five-day work weeks.
pub fn days_to_weeks(days: f64) -> WeekCount {
    let weeks = days / WORK_WEEK_DAYS;
    if weeks.fract() != 0.0 {
        WeekCount::Fractional(format!("{weeks:.1}"))
    } else {
        WeekCount::Whole(weeks as i64)
    }
}
