//! Calendar-aware event durations
//!
//! A [`CalendarDuration`] is applied in two steps: years, months, weeks and
//! days move the calendar date (in the start instant's own offset, clamping
//! to the last day of shorter months), then hours, minutes, seconds and
//! milliseconds are added as elapsed time.

use crate::error::{SchedulerError, SchedulerResult};
use chrono::{DateTime, Days, FixedOffset, Months, TimeDelta};
use serde::{Deserialize, Serialize};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const DAYS_PER_WEEK: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarDuration {
    pub years: i32,
    pub months: i32,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

impl CalendarDuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years(mut self, years: i32) -> Self {
        self.years = years;
        self
    }

    pub fn months(mut self, months: i32) -> Self {
        self.months = months;
        self
    }

    pub fn weeks(mut self, weeks: i64) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn hours(mut self, hours: i64) -> Self {
        self.hours = hours;
        self
    }

    pub fn minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn seconds(mut self, seconds: i64) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn milliseconds(mut self, milliseconds: i64) -> Self {
        self.milliseconds = milliseconds;
        self
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// The instant reached by applying this duration to `start`
    pub fn apply_to(&self, start: DateTime<FixedOffset>) -> SchedulerResult<DateTime<FixedOffset>> {
        let dated = self.shift_date(start)?;
        let elapsed = self
            .elapsed_millis()
            .and_then(TimeDelta::try_milliseconds)
            .ok_or_else(|| SchedulerError::out_of_range("time-of-day part of duration overflows"))?;

        dated
            .checked_add_signed(elapsed)
            .ok_or_else(|| SchedulerError::out_of_range("end instant is not representable"))
    }

    fn shift_date(&self, start: DateTime<FixedOffset>) -> SchedulerResult<DateTime<FixedOffset>> {
        let months = i64::from(self.years)
            .checked_mul(12)
            .and_then(|m| m.checked_add(i64::from(self.months)))
            .and_then(|m| i32::try_from(m).ok())
            .ok_or_else(|| SchedulerError::out_of_range("month count overflows"))?;
        let days = self
            .weeks
            .checked_mul(DAYS_PER_WEEK)
            .and_then(|d| d.checked_add(self.days))
            .ok_or_else(|| SchedulerError::out_of_range("day count overflows"))?;

        let shifted = if months >= 0 {
            start.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            start.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        let shifted = shifted.and_then(|date| {
            if days >= 0 {
                date.checked_add_days(Days::new(days.unsigned_abs()))
            } else {
                date.checked_sub_days(Days::new(days.unsigned_abs()))
            }
        });

        shifted.ok_or_else(|| SchedulerError::out_of_range("calendar part of duration leaves the supported dates"))
    }

    fn elapsed_millis(&self) -> Option<i64> {
        self.hours
            .checked_mul(MILLIS_PER_HOUR)?
            .checked_add(self.minutes.checked_mul(MILLIS_PER_MINUTE)?)?
            .checked_add(self.seconds.checked_mul(MILLIS_PER_SECOND)?)?
            .checked_add(self.milliseconds)
    }
}
