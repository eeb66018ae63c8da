use chrono::{DateTime, Datelike, Months, NaiveDate, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// Calendar units used to walk time for tick generation (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    /// Sunday-based weeks.
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Start of the unit containing `time`.
    #[must_use]
    pub fn floor(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let date = time.date_naive();
        let naive = match self {
            Self::Second => date.and_hms_opt(time.hour(), time.minute(), time.second())?,
            Self::Minute => date.and_hms_opt(time.hour(), time.minute(), 0)?,
            Self::Hour => date.and_hms_opt(time.hour(), 0, 0)?,
            Self::Day => date.and_hms_opt(0, 0, 0)?,
            Self::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                date.checked_sub_signed(TimeDelta::days(back))?
                    .and_hms_opt(0, 0, 0)?
            }
            Self::Month => date.with_day(1)?.and_hms_opt(0, 0, 0)?,
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        };
        Some(naive.and_utc())
    }

    /// Moves `time` forward by `count` whole units.
    #[must_use]
    pub fn offset(self, time: DateTime<Utc>, count: u32) -> Option<DateTime<Utc>> {
        let count_i64 = i64::from(count);
        match self {
            Self::Second => time.checked_add_signed(TimeDelta::try_seconds(count_i64)?),
            Self::Minute => time.checked_add_signed(TimeDelta::try_minutes(count_i64)?),
            Self::Hour => time.checked_add_signed(TimeDelta::try_hours(count_i64)?),
            Self::Day => time.checked_add_signed(TimeDelta::try_days(count_i64)?),
            Self::Week => time.checked_add_signed(TimeDelta::try_weeks(count_i64)?),
            Self::Month => time.checked_add_months(Months::new(count)),
            Self::Year => time.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }

    /// Calendar field a stepped interval aligns to.
    ///
    /// Second-of-minute, minute-of-hour, hour-of-day, day-of-month (zero
    /// based), Sunday-week-of-year, month (zero based) and the year itself.
    #[must_use]
    pub fn field(self, time: DateTime<Utc>) -> i64 {
        match self {
            Self::Second => i64::from(time.second()),
            Self::Minute => i64::from(time.minute()),
            Self::Hour => i64::from(time.hour()),
            Self::Day => i64::from(time.day0()),
            Self::Week => sunday_week_of_year(time),
            Self::Month => i64::from(time.month0()),
            Self::Year => i64::from(time.year()),
        }
    }
}

// Weeks are counted from the (partial) week holding January 1st, which is week 0.
fn sunday_week_of_year(time: DateTime<Utc>) -> i64 {
    let ordinal0 = i64::from(time.ordinal0());
    let jan1_offset = match NaiveDate::from_ymd_opt(time.year(), 1, 1) {
        Some(jan1) => i64::from(jan1.weekday().num_days_from_sunday()),
        None => 0,
    };
    (ordinal0 + jan1_offset) / 7
}

/// A calendar unit plus a field-aligned step, e.g. "every 2nd day of month".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickInterval {
    unit: TimeUnit,
    step: u32,
}

impl TickInterval {
    pub const SECOND: Self = Self::every(TimeUnit::Second);
    pub const MINUTE: Self = Self::every(TimeUnit::Minute);
    pub const HOUR: Self = Self::every(TimeUnit::Hour);
    pub const DAY: Self = Self::every(TimeUnit::Day);
    pub const WEEK: Self = Self::every(TimeUnit::Week);
    pub const MONTH: Self = Self::every(TimeUnit::Month);
    pub const YEAR: Self = Self::every(TimeUnit::Year);

    pub fn new(unit: TimeUnit, step: u32) -> ScaleResult<Self> {
        if step == 0 {
            return Err(ScaleError::InvalidTickStep { step });
        }
        Ok(Self { unit, step })
    }

    #[must_use]
    pub const fn every(unit: TimeUnit) -> Self {
        Self { unit, step: 1 }
    }

    #[must_use]
    pub fn unit(self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub fn step(self) -> u32 {
        self.step
    }

    fn is_aligned(self, time: DateTime<Utc>) -> bool {
        self.unit.field(time).rem_euclid(i64::from(self.step)) == 0
    }

    /// First aligned slot at or after `time`.
    #[must_use]
    pub fn ceil(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let floored = self.unit.floor(time)?;
        let slot = if floored < time {
            self.unit.offset(floored, 1)?
        } else {
            floored
        };
        self.align_forward(slot)
    }

    /// First aligned slot strictly after `time`.
    #[must_use]
    pub fn next_after(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let slot = self.unit.offset(self.unit.floor(time)?, 1)?;
        self.align_forward(slot)
    }

    fn align_forward(self, mut slot: DateTime<Utc>) -> Option<DateTime<Utc>> {
        // Week numbers restart every January, so a few extra hops may be needed
        // beyond `step`; anything past this bound means the calendar ran out.
        let max_hops = self.step.saturating_mul(2).saturating_add(53);
        for _ in 0..max_hops {
            if self.is_aligned(slot) {
                return Some(slot);
            }
            slot = self.unit.offset(slot, 1)?;
        }
        None
    }
}
