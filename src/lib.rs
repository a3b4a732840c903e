//! cron-timeline -- layout engine for cron job execution timelines.
//!
//! This crate computes which window of time a timeline of job runs should
//! show, where each run sits inside it and how each run should be styled.
//! Runs come from a `cron_schedule` table or a JSON export of one.

pub mod config;
pub mod storage;
pub mod timeline;

pub use config::TimelineConfig;
pub use timeline::{JobRunRecord, Range, RangeCalculator};
