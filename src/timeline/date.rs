//! Date parsing and hour arithmetic for the timeline.
//!
//! Job runs carry their timestamps as strings in a single configured format.
//! Formats are written with the moment-style tokens the timeline settings use
//! (`YYYY-MM-DD HH:mm:ss`) and compiled once into a chrono strftime pattern.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A compiled timestamp format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    pattern: String,
    has_time: bool,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl DateFormat {
    pub fn new(source: &str) -> Self {
        let (pattern, has_time) = compile(source);
        Self {
            source: source.to_string(),
            pattern,
            has_time,
        }
    }

    /// The format as configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The equivalent chrono strftime pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse `raw`, returning `None` for empty or unparseable input.
    ///
    /// Formats without any time-of-day token parse to midnight.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if self.has_time {
            NaiveDateTime::parse_from_str(raw, &self.pattern).ok()
        } else {
            NaiveDate::parse_from_str(raw, &self.pattern)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }

    pub fn format(&self, instant: NaiveDateTime) -> String {
        instant.format(&self.pattern).to_string()
    }
}

fn compile(source: &str) -> (String, bool) {
    let mut pattern = String::with_capacity(source.len() * 2);
    let mut has_time = false;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        // [text] is copied verbatim
        if c == '[' {
            for literal in chars.by_ref() {
                if literal == ']' {
                    break;
                }
                push_literal(&mut pattern, literal);
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut pattern, c);
            continue;
        }

        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        match token(c, run) {
            Some((spec, is_time)) => {
                pattern.push_str(spec);
                has_time |= is_time;
            }
            None => {
                for _ in 0..run {
                    push_literal(&mut pattern, c);
                }
            }
        }
    }

    (pattern, has_time)
}

/// Maps a run of one token letter to its strftime specifier and whether it
/// carries time-of-day information.
fn token(letter: char, run: usize) -> Option<(&'static str, bool)> {
    let mapped = match (letter, run) {
        ('Y', 4) => ("%Y", false),
        ('Y', 2) => ("%y", false),
        ('M', 4) => ("%B", false),
        ('M', 3) => ("%b", false),
        ('M', 2) => ("%m", false),
        ('M', 1) => ("%-m", false),
        ('D', 2) => ("%d", false),
        ('D', 1) => ("%-d", false),
        ('d', 4) => ("%A", false),
        ('d', 3) => ("%a", false),
        ('H', 2) => ("%H", true),
        ('H', 1) => ("%-H", true),
        ('h', 2) => ("%I", true),
        ('h', 1) => ("%-I", true),
        ('m', 2) => ("%M", true),
        ('m', 1) => ("%-M", true),
        ('s', 2) => ("%S", true),
        ('s', 1) => ("%-S", true),
        ('A', 1) => ("%p", false),
        ('a', 1) => ("%P", false),
        _ => return None,
    };
    Some(mapped)
}

fn push_literal(pattern: &mut String, c: char) {
    if c == '%' {
        pattern.push_str("%%");
    } else {
        pattern.push(c);
    }
}

/// Truncate to the start of the hour.
pub fn floor_to_hour(instant: NaiveDateTime) -> NaiveDateTime {
    let into_hour = TimeDelta::seconds(i64::from(instant.minute() * 60 + instant.second()))
        + TimeDelta::nanoseconds(i64::from(instant.nanosecond()));
    instant - into_hour
}

/// Fractional hours from `earlier` to `later`, at millisecond precision.
pub fn hours_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Whole hours from `earlier` to `later`, truncated toward zero.
pub fn whole_hours_between(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (later - earlier).num_hours()
}

pub fn same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}
