//! Job run records and their timestamp accessors.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::date::DateFormat;

/// One execution of a scheduled job, as stored in `cron_schedule`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRunRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
    pub scheduled_at: String,
    #[serde(default)]
    pub executed_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl JobRunRecord {
    /// A run that has only been scheduled so far.
    pub fn scheduled(at: impl Into<String>) -> Self {
        Self {
            scheduled_at: at.into(),
            ..Self::default()
        }
    }

    pub fn with_executed_at(mut self, at: impl Into<String>) -> Self {
        self.executed_at = Some(at.into());
        self
    }

    pub fn with_finished_at(mut self, at: impl Into<String>) -> Self {
        self.finished_at = Some(at.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_job_code(mut self, job_code: impl Into<String>) -> Self {
        self.job_code = Some(job_code.into());
        self
    }
}

/// The timestamp columns of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    ScheduledAt,
    ExecutedAt,
    FinishedAt,
}

impl DateField {
    pub fn raw(self, record: &JobRunRecord) -> Option<&str> {
        match self {
            Self::ScheduledAt => Some(record.scheduled_at.as_str()),
            Self::ExecutedAt => record.executed_at.as_deref(),
            Self::FinishedAt => record.finished_at.as_deref(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ScheduledAt => "scheduled_at",
            Self::ExecutedAt => "executed_at",
            Self::FinishedAt => "finished_at",
        }
    }
}

/// Actual start, else the scheduled time.
pub const START_FIELDS: &[DateField] = &[DateField::ExecutedAt, DateField::ScheduledAt];

/// Actual finish only; a missing finish makes the run permanent.
pub const END_FIELDS: &[DateField] = &[DateField::FinishedAt];

/// Actual finish, else the scheduled time. Used when bounding the range so
/// an unfinished run still counts.
pub const END_OR_SCHEDULED_FIELDS: &[DateField] = &[DateField::FinishedAt, DateField::ScheduledAt];

/// The first field in `fields` that holds a parseable timestamp.
pub fn first_valid(
    format: &DateFormat,
    record: &JobRunRecord,
    fields: &[DateField],
) -> Option<NaiveDateTime> {
    fields.iter().find_map(|&field| {
        let raw = field.raw(record)?;
        let parsed = format.parse(raw);
        if parsed.is_none() {
            trace!(field = field.name(), %raw, "skipping unparseable timestamp");
        }
        parsed
    })
}

pub fn effective_start(format: &DateFormat, record: &JobRunRecord) -> Option<NaiveDateTime> {
    first_valid(format, record, START_FIELDS)
}

pub fn effective_end(format: &DateFormat, record: &JobRunRecord) -> Option<NaiveDateTime> {
    first_valid(format, record, END_FIELDS)
}
