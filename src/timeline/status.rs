//! Status classification of job runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::JobRunRecord;

/// Outcome or progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
    Missed,
    Pending,
    Running,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Missed => "missed",
            Self::Pending => "pending",
            Self::Running => "running",
        }
    }

    /// Classify a record. Absent records and unknown strings have no status.
    pub fn of(record: Option<&JobRunRecord>) -> Option<Self> {
        record?.status.as_deref()?.parse().ok()
    }

    /// Queued or in progress.
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "missed" => Ok(Self::Missed),
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            _ => Err(()),
        }
    }
}

pub fn is_success(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record) == Some(JobStatus::Success)
}

pub fn is_error(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record) == Some(JobStatus::Error)
}

pub fn is_missed(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record) == Some(JobStatus::Missed)
}

pub fn is_pending(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record) == Some(JobStatus::Pending)
}

pub fn is_running(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record) == Some(JobStatus::Running)
}

pub fn is_active(record: Option<&JobRunRecord>) -> bool {
    JobStatus::of(record).is_some_and(|s| s.is_active())
}

/// Everything the renderer needs to style a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: Option<JobStatus>,
    pub active: bool,
    /// No parseable finish time.
    pub permanent: bool,
}

impl Status {
    pub fn new(record: &JobRunRecord, permanent: bool) -> Self {
        let kind = JobStatus::of(Some(record));
        Self {
            kind,
            active: kind.is_some_and(|s| s.is_active()),
            permanent,
        }
    }
}
