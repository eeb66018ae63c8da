use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::core::tick_interval::TimeUnit;
use crate::core::ticks::TickGranularity;

const YEAR_FORMAT: &str = "%Y";
const MONTH_FORMAT: &str = "%b";
const MONTH_YEAR_FORMAT: &str = "%b %Y";
const DAY_FORMAT: &str = "%b %e";
const GENERIC_DAY_FORMAT: &str = "%b %d";
const CLOCK_FORMAT: &str = "%H:%M";
const SECOND_FORMAT: &str = ":%S";

/// Formats tick timestamps (UTC) for the granularity they were generated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickFormatter {
    granularity: TickGranularity,
}

impl TickFormatter {
    #[must_use]
    pub fn new(granularity: TickGranularity) -> Self {
        Self { granularity }
    }

    #[must_use]
    pub fn granularity(self) -> TickGranularity {
        self.granularity
    }

    #[must_use]
    pub fn pattern(self, time: &DateTime<Utc>) -> &'static str {
        match self.granularity {
            TickGranularity::Unit(TimeUnit::Year) => YEAR_FORMAT,
            TickGranularity::Unit(TimeUnit::Month) => {
                if time.month0() == 0 {
                    MONTH_YEAR_FORMAT
                } else {
                    MONTH_FORMAT
                }
            }
            TickGranularity::Unit(TimeUnit::Week | TimeUnit::Day) => DAY_FORMAT,
            TickGranularity::Unit(TimeUnit::Hour | TimeUnit::Minute) => CLOCK_FORMAT,
            TickGranularity::Unit(TimeUnit::Second) => {
                if time.second() != 0 {
                    SECOND_FORMAT
                } else {
                    CLOCK_FORMAT
                }
            }
            TickGranularity::Generic => generic_pattern(time),
        }
    }

    #[must_use]
    pub fn format(self, time: &DateTime<Utc>) -> String {
        time.format(self.pattern(time)).to_string()
    }

    /// Boxed closure form for renderers that store label callbacks.
    #[must_use]
    pub fn into_fn(self) -> Box<dyn Fn(&DateTime<Utc>) -> String + Send + Sync> {
        Box::new(move |time| self.format(time))
    }
}

// Finest non-zero calendar field wins.
fn generic_pattern(time: &DateTime<Utc>) -> &'static str {
    if time.second() != 0 {
        SECOND_FORMAT
    } else if time.minute() != 0 || time.hour() != 0 {
        CLOCK_FORMAT
    } else if time.day0() != 0 {
        GENERIC_DAY_FORMAT
    } else if time.month0() != 0 {
        MONTH_FORMAT
    } else {
        YEAR_FORMAT
    }
}
