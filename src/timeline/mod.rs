//! Timeline layout engine: visible range, per-run placement and status.
//!
//! Everything in here is synchronous and pure apart from reading the current
//! instant through a [`Clock`]. Unparseable dates are never errors; they are
//! carried as `None` and resolved by fallback chains.

pub mod calculator;
pub mod clock;
pub mod date;
pub mod format;
pub mod placement;
pub mod range;
pub mod record;
pub mod scale;
pub mod status;

pub use self::calculator::RangeCalculator;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::date::DateFormat;
pub use self::format::{days_to_weeks, WeekCount};
pub use self::placement::{Extent, Placement};
pub use self::range::Range;
pub use self::record::{DateField, JobRunRecord};
pub use self::scale::ScaleConfig;
pub use self::status::{JobStatus, Status};

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("date format must not be empty ({field})")]
    InvalidDateFormat { field: &'static str },

    #[error("scale bounds must be positive (min {min}, max {max})")]
    InvalidScale { min: f64, max: f64 },

    #[error("minimum visible span must be at least one hour")]
    InvalidMinHours,

    #[error("run finished at {end} before it started at {start}")]
    MalformedInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}
