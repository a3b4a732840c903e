//! Horizontal position and width of a run within a [`Range`].

use serde::Serialize;

use super::date::{hours_between, DateFormat};
use super::range::Range;
use super::record::{effective_end, effective_start, JobRunRecord};

/// How long a run occupies the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "hours", rename_all = "snake_case")]
pub enum Extent {
    /// Finish minus start. Negative when the stored finish precedes the start.
    Hours(f64),
    /// The run has no finish time.
    Unbounded,
    /// The finish is known but the start is not, so the run has no width.
    Unplaced,
}

impl Extent {
    /// Width used to draw an unbounded run.
    pub const UNBOUNDED_WIDTH_HOURS: f64 = 1.0;

    pub fn as_hours(&self) -> f64 {
        match self {
            Self::Hours(h) => *h,
            Self::Unbounded => Self::UNBOUNDED_WIDTH_HOURS,
            Self::Unplaced => 0.0,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Hours(h) if *h < 0.0)
    }
}

/// Where one run sits in the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Hours from the range start to the run's effective start. `None` when
    /// the run has no parseable start.
    pub start_offset_hours: Option<f64>,
    pub extent: Extent,
}

pub fn start_offset_hours(
    format: &DateFormat,
    range: &Range,
    record: &JobRunRecord,
) -> Option<f64> {
    effective_start(format, record).map(|start| hours_between(start, range.first_day))
}

pub fn extent(format: &DateFormat, record: &JobRunRecord) -> Extent {
    match (effective_start(format, record), effective_end(format, record)) {
        (Some(start), Some(end)) => Extent::Hours(hours_between(end, start)),
        (None, Some(_)) => Extent::Unplaced,
        (_, None) => Extent::Unbounded,
    }
}

pub fn place(format: &DateFormat, range: &Range, record: &JobRunRecord) -> Placement {
    Placement {
        start_offset_hours: start_offset_hours(format, range, record),
        extent: extent(format, record),
    }
}

/// Convert an hour offset into a percentage of one display unit of `scale`
/// hours.
pub fn to_percent(offset_hours: f64, scale: f64) -> f64 {
    offset_hours * (100.0 / scale)
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent}%")
}
