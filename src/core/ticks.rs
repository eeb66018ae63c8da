use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::tick_interval::{TickInterval, TimeUnit};

pub const DEFAULT_TICK_COUNT: usize = 10;

/// Granularity recorded by the last tick generation, read by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickGranularity {
    /// One tick per record; used for single-point domains and as fallback.
    Generic,
    Unit(TimeUnit),
}

impl Default for TickGranularity {
    fn default() -> Self {
        Self::Unit(TimeUnit::Year)
    }
}

/// Candidate intervals for automatic tick selection, finest first.
pub const AUTO_TICK_INTERVALS: [(TimeUnit, u32); 24] = [
    (TimeUnit::Second, 1),
    (TimeUnit::Second, 5),
    (TimeUnit::Second, 15),
    (TimeUnit::Second, 30),
    (TimeUnit::Minute, 1),
    (TimeUnit::Minute, 5),
    (TimeUnit::Minute, 15),
    (TimeUnit::Minute, 30),
    (TimeUnit::Hour, 1),
    (TimeUnit::Hour, 3),
    (TimeUnit::Hour, 6),
    (TimeUnit::Hour, 12),
    (TimeUnit::Day, 1),
    (TimeUnit::Day, 2),
    (TimeUnit::Week, 1),
    (TimeUnit::Month, 1),
    (TimeUnit::Month, 3),
    (TimeUnit::Year, 1),
    (TimeUnit::Year, 2),
    (TimeUnit::Year, 5),
    (TimeUnit::Year, 10),
    (TimeUnit::Year, 25),
    (TimeUnit::Year, 50),
    (TimeUnit::Year, 100),
];

/// Lazily walks calendar slots over `times`, yielding the first entry at or
/// after each slot.
///
/// Slots that fall into a gap resolve to the next existing entry, and each
/// entry is yielded at most once, so weekends/holidays never appear.
#[derive(Debug, Clone)]
pub struct TickIter<'a> {
    times: &'a [DateTime<Utc>],
    interval: TickInterval,
    cursor: usize,
    slot: Option<DateTime<Utc>>,
}

impl<'a> TickIter<'a> {
    #[must_use]
    pub fn new(times: &'a [DateTime<Utc>], interval: TickInterval) -> Self {
        let slot = times.first().and_then(|first| interval.ceil(*first));
        Self {
            times,
            interval,
            cursor: 0,
            slot,
        }
    }
}

impl Iterator for TickIter<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slot?;
        let last = *self.times.last()?;
        if slot > last {
            self.slot = None;
            return None;
        }

        self.cursor += self.times[self.cursor..].partition_point(|t| *t < slot);
        let Some(&tick) = self.times.get(self.cursor) else {
            self.slot = None;
            return None;
        };
        self.cursor += 1;
        self.slot = self.interval.next_after(tick);
        Some(tick)
    }
}

/// Picks the interval whose gap-aware tick count is the largest non-zero
/// count not above `target`; equal counts prefer the coarser interval.
///
/// Returns `None` when no candidate fits (or fewer than two points), in which
/// case callers fall back to one tick per record.
#[must_use]
pub fn select_tick_interval(times: &[DateTime<Utc>], target: usize) -> Option<TickInterval> {
    if times.len() <= 1 {
        return None;
    }
    let target = target.max(1);

    let mut best: Option<(TickInterval, usize)> = None;
    for (unit, step) in AUTO_TICK_INTERVALS {
        let interval = TickInterval::new(unit, step).ok()?;
        let count = TickIter::new(times, interval).take(target + 1).count();
        if count == 0 || count > target {
            continue;
        }
        if best.is_none_or(|(_, best_count)| count >= best_count) {
            best = Some((interval, count));
        }
    }

    best.map(|(interval, _)| interval)
}
