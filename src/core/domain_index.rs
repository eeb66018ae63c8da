use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Position lookups over an ordered, duplicate-free timestamp sequence.
///
/// Ordering is a caller precondition; unsorted input gives unspecified results.
#[derive(Debug, Clone, Default)]
pub struct DomainIndex {
    times: Arc<[DateTime<Utc>]>,
}

impl DomainIndex {
    #[must_use]
    pub fn new(times: Arc<[DateTime<Utc>]>) -> Self {
        Self { times }
    }

    #[must_use]
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Exact position of `time`, if present.
    #[must_use]
    pub fn position(&self, time: DateTime<Utc>) -> Option<usize> {
        self.times.binary_search(&time).ok()
    }

    /// Position of `time`, or of its nearest neighbour by absolute distance.
    ///
    /// Equidistant neighbours resolve to the earlier index. `None` only for an
    /// empty domain.
    #[must_use]
    pub fn index_of(&self, time: DateTime<Utc>) -> Option<usize> {
        if self.times.is_empty() {
            return None;
        }

        let upper = self.times.partition_point(|t| *t < time);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.times.len() {
            return Some(upper - 1);
        }
        if self.times[upper] == time {
            return Some(upper);
        }

        let before = time - self.times[upper - 1];
        let after = self.times[upper] - time;
        if after < before {
            Some(upper)
        } else {
            Some(upper - 1)
        }
    }

    /// Timestamp at the nearest integer position, clamped into the domain.
    #[must_use]
    pub fn timestamp_at(&self, index: f64) -> Option<DateTime<Utc>> {
        if self.times.is_empty() {
            return None;
        }
        let rounded = round_index(index)?;
        let last = (self.times.len() - 1) as i64;
        Some(self.times[rounded.clamp(0, last) as usize])
    }
}

/// Rounds a fractional index to the nearest integer, halves toward the lower
/// index. Non-finite input yields `None`.
#[must_use]
pub fn round_index(index: f64) -> Option<i64> {
    if !index.is_finite() {
        return None;
    }
    let rounded = (index - 0.5).ceil();
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return None;
    }
    Some(rounded as i64)
}
