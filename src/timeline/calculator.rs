//! The range calculator: one entry point over range, placement and status.

use chrono::NaiveDateTime;

use super::clock::{Clock, SystemClock};
use super::date::{hours_between, DateFormat};
use super::format;
use super::placement::{self, Placement};
use super::range::{self, Range};
use super::record::{effective_end, effective_start, JobRunRecord};
use super::scale::ScaleConfig;
use super::status::Status;
use super::TimelineError;
use crate::config::TimelineConfig;

/// Computes timeline layout from job runs.
///
/// Holds only configuration and a clock. Every call reads "now" afresh and
/// returns owned values, so one calculator can serve repeated re-renders.
#[derive(Debug, Clone)]
pub struct RangeCalculator<C = SystemClock> {
    date_format: DateFormat,
    header_format: DateFormat,
    details_format: DateFormat,
    min_hours: i64,
    scale: ScaleConfig,
    clock: C,
}

impl RangeCalculator<SystemClock> {
    pub fn new(config: &TimelineConfig) -> Result<Self, TimelineError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RangeCalculator<C> {
    pub fn with_clock(config: &TimelineConfig, clock: C) -> Result<Self, TimelineError> {
        config.validate()?;
        Ok(Self {
            date_format: DateFormat::new(&config.date_format),
            header_format: DateFormat::new(&config.header_format),
            details_format: DateFormat::new(&config.details_format),
            min_hours: i64::from(config.min_hours),
            scale: config.scale.normalized()?,
            clock,
        })
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    pub fn scale(&self) -> &ScaleConfig {
        &self.scale
    }

    pub fn scale_mut(&mut self) -> &mut ScaleConfig {
        &mut self.scale
    }

    pub fn range(&self, records: &[JobRunRecord]) -> Range {
        range::derive(&self.date_format, records, self.now(), self.min_hours)
    }

    pub fn effective_start(&self, record: &JobRunRecord) -> Option<NaiveDateTime> {
        effective_start(&self.date_format, record)
    }

    pub fn effective_end(&self, record: &JobRunRecord) -> Option<NaiveDateTime> {
        effective_end(&self.date_format, record)
    }

    /// The run has no parseable finish time.
    pub fn is_permanent(&self, record: &JobRunRecord) -> bool {
        self.effective_end(record).is_none()
    }

    pub fn placement(&self, range: &Range, record: &JobRunRecord) -> Placement {
        placement::place(&self.date_format, range, record)
    }

    pub fn status(&self, record: &JobRunRecord) -> Status {
        Status::new(record, self.is_permanent(record))
    }

    pub fn layout(&self, range: &Range, record: &JobRunRecord) -> (Placement, Status) {
        (self.placement(range, record), self.status(record))
    }

    /// Hours from the range start to now, measured through a synthetic run
    /// scheduled at the current instant.
    pub fn now_offset_hours(&self, range: &Range) -> f64 {
        let now = self.now();
        let marker = JobRunRecord::scheduled(self.date_format.format(now));
        // formats that drop fields (no year, no time) do not round-trip
        placement::start_offset_hours(&self.date_format, range, &marker)
            .unwrap_or_else(|| hours_between(now, range.first_day))
    }

    /// Position of the "now" marker as a percentage of one scale unit.
    pub fn now_offset_percent(&self, range: &Range) -> f64 {
        placement::to_percent(self.now_offset_hours(range), self.scale.value)
    }

    /// Report a run whose finish precedes its start.
    pub fn check_interval(&self, record: &JobRunRecord) -> Result<(), TimelineError> {
        match (self.effective_start(record), self.effective_end(record)) {
            (Some(start), Some(end)) if end < start => {
                Err(TimelineError::MalformedInterval { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn format_header(&self, instant: NaiveDateTime) -> String {
        format::format_header(&self.header_format, instant)
    }

    pub fn format_details(&self, raw: &str) -> String {
        format::format_details(&self.date_format, &self.details_format, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::clock::FixedClock;
    use crate::timeline::placement::Extent;
    use crate::timeline::status::JobStatus;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn calculator(now: NaiveDateTime) -> RangeCalculator<FixedClock> {
        RangeCalculator::with_clock(&TimelineConfig::default(), FixedClock(now)).unwrap()
    }

    #[test]
    fn test_layout_of_finished_run() {
        let calc = calculator(at(1, 18, 0));
        let record = JobRunRecord::scheduled("2024-01-01 10:00:00")
            .with_executed_at("2024-01-01 10:05:00")
            .with_finished_at("2024-01-01 10:20:00")
            .with_status("success");
        let range = calc.range(std::slice::from_ref(&record));
        assert_eq!(range.first_day, at(1, 9, 0));

        let (placement, status) = calc.layout(&range, &record);
        assert!((placement.start_offset_hours.unwrap() - 13.0 / 12.0).abs() < 1e-9);
        assert_eq!(placement.extent, Extent::Hours(0.25));
        assert_eq!(status.kind, Some(JobStatus::Success));
        assert!(!status.permanent);
        assert!(!calc.is_permanent(&record));
    }

    #[test]
    fn test_now_offset_percent() {
        let calc = calculator(at(1, 12, 30));
        let range = calc.range(&[]);
        assert_eq!(range.first_day, at(1, 11, 0));
        // 1.5h at 5h per unit
        assert_eq!(calc.now_offset_hours(&range), 1.5);
        assert_eq!(calc.now_offset_percent(&range), 30.0);
    }

    #[test]
    fn test_now_offset_without_round_trippable_format() {
        let config = TimelineConfig {
            date_format: "HH:mm".to_string(),
            ..TimelineConfig::default()
        };
        let calc = RangeCalculator::with_clock(&config, FixedClock(at(1, 12, 30))).unwrap();
        let range = calc.range(&[]);
        assert_eq!(calc.now_offset_hours(&range), 1.5);
    }

    #[test]
    fn test_check_interval() {
        let calc = calculator(at(1, 18, 0));
        let good =
            JobRunRecord::scheduled("2024-01-01 10:00:00").with_finished_at("2024-01-01 10:01:00");
        let open = JobRunRecord::scheduled("2024-01-01 10:00:00");
        let bad =
            JobRunRecord::scheduled("2024-01-01 10:00:00").with_finished_at("2024-01-01 09:00:00");

        assert!(calc.check_interval(&good).is_ok());
        assert!(calc.check_interval(&open).is_ok());
        assert_eq!(
            calc.check_interval(&bad),
            Err(TimelineError::MalformedInterval {
                start: at(1, 10, 0),
                end: at(1, 9, 0),
            })
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TimelineConfig {
            min_hours: 0,
            ..TimelineConfig::default()
        };
        assert!(RangeCalculator::new(&config).is_err());
    }

    #[test]
    fn test_formatting_helpers() {
        let calc = calculator(at(1, 18, 0));
        assert_eq!(calc.format_header(at(1, 9, 0)), "Mon 01/01 09:00");
        assert_eq!(calc.format_details("2024-01-01 10:00:00"), "2024-01-01 10:00:00");
        assert_eq!(calc.format_details("bogus"), "Invalid date");
    }
}
