use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::domain_index::{DomainIndex, round_index};
use crate::core::index_scale::IndexScale;
use crate::core::tick_format::TickFormatter;
use crate::core::tick_interval::TickInterval;
use crate::core::ticks::{DEFAULT_TICK_COUNT, TickGranularity, TickIter, select_tick_interval};
use crate::core::zoom::ZoomHandle;
use crate::error::{ScaleError, ScaleResult};
use crate::telemetry::{DOMAIN_TARGET, TICKS_TARGET};

// Absorbs float noise when snapping the visible index window to whole indices.
const INDEX_WINDOW_EPSILON: f64 = 1e-9;

/// Band layout and tick defaults for [`FinanceTimeScale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceTimeScaleOptions {
    /// Fraction of each step left empty between bands, in `[0, 1)`.
    pub padding: f64,
    /// Extra space before the first and after the last band, in band widths.
    pub outer_padding: f64,
    /// Target tick count used by [`FinanceTimeScale::ticks`].
    pub default_tick_count: usize,
}

impl Default for FinanceTimeScaleOptions {
    fn default() -> Self {
        Self {
            padding: 0.2,
            outer_padding: 0.65,
            default_tick_count: DEFAULT_TICK_COUNT,
        }
    }
}

impl FinanceTimeScaleOptions {
    pub fn validate(self) -> ScaleResult<Self> {
        if !self.padding.is_finite() || !(0.0..1.0).contains(&self.padding) {
            return Err(ScaleError::InvalidOption(
                "padding must be finite and in [0, 1)".to_owned(),
            ));
        }

        if !self.outer_padding.is_finite() || self.outer_padding < 0.0 {
            return Err(ScaleError::InvalidOption(
                "outer padding must be finite and >= 0".to_owned(),
            ));
        }

        if self.default_tick_count == 0 {
            return Err(ScaleError::InvalidOption(
                "default tick count must be > 0".to_owned(),
            ));
        }

        Ok(self)
    }

    /// Parses and validates options from JSON; missing fields take defaults.
    pub fn from_json_str(json: &str) -> ScaleResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()
    }

    pub fn to_json_string(&self) -> ScaleResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Index units added on each side of the domain.
    #[must_use]
    pub fn index_margin(self) -> f64 {
        (1.0 - self.padding) * self.outer_padding
    }
}

/// Gap-aware time scale for financial series.
///
/// Timestamps map through their position in the full domain, so consecutive
/// observations are equally spaced whatever the calendar gap between them.
/// The full domain and range are the persistent state; the zoom transform is
/// shared with an external controller via [`FinanceTimeScale::zoomable`].
/// The visible domain and band width are recomputed from those on every read.
///
/// The domain must be ascending without duplicates. This is not checked.
#[derive(Debug)]
pub struct FinanceTimeScale {
    options: FinanceTimeScaleOptions,
    domain: DomainIndex,
    index: IndexScale,
    last_granularity: TickGranularity,
}

impl Default for FinanceTimeScale {
    fn default() -> Self {
        Self::from_valid_options(FinanceTimeScaleOptions::default())
    }
}

impl FinanceTimeScale {
    pub fn new(options: FinanceTimeScaleOptions) -> ScaleResult<Self> {
        Ok(Self::from_valid_options(options.validate()?))
    }

    fn from_valid_options(options: FinanceTimeScaleOptions) -> Self {
        let mut scale = Self {
            options,
            domain: DomainIndex::default(),
            index: IndexScale::new((0.0, 1.0), (0.0, 1.0)),
            last_granularity: TickGranularity::default(),
        };
        scale.apply_index_domain();
        scale
    }

    #[must_use]
    pub fn options(&self) -> FinanceTimeScaleOptions {
        self.options
    }

    /// Replaces the full domain and resets the zoom transform to identity.
    ///
    /// The reset goes through the shared handle, so an attached controller
    /// stays wired.
    pub fn set_domain(&mut self, times: impl Into<Arc<[DateTime<Utc>]>>) -> &mut Self {
        self.domain = DomainIndex::new(times.into());
        self.apply_index_domain();
        self.index.zoom().reset();
        debug!(
            target: DOMAIN_TARGET,
            count = self.domain.len(),
            "set finance time scale domain"
        );
        self
    }

    /// Every timestamp the scale was configured with.
    #[must_use]
    pub fn full_domain(&self) -> &[DateTime<Utc>] {
        self.domain.times()
    }

    /// The contiguous part of the full domain that lands inside the range
    /// under the current zoom. Empty when zoomed out of bounds.
    #[must_use]
    pub fn domain(&self) -> &[DateTime<Utc>] {
        match self.visible_index_bounds() {
            Some((start, end)) => &self.domain.times()[start..=end],
            None => &[],
        }
    }

    /// Inclusive index bounds of [`FinanceTimeScale::domain`] within the full domain.
    #[must_use]
    pub fn visible_index_bounds(&self) -> Option<(usize, usize)> {
        let len = self.domain.len();
        if len == 0 {
            return None;
        }
        let last = (len - 1) as f64;

        let (range_start, range_end) = self.index.range();
        if range_start == range_end {
            // A zero-width range clips nothing; keep every record addressable.
            return Some((0, len - 1));
        }

        let (low, high) = self.index.visible_index_window();
        if !low.is_finite() || !high.is_finite() {
            return None;
        }
        let start = (low - INDEX_WINDOW_EPSILON).ceil().max(0.0);
        let end = (high + INDEX_WINDOW_EPSILON).floor().min(last);
        if start > end {
            return None;
        }
        Some((start as usize, end as usize))
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.index.range()
    }

    pub fn set_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.index.set_range(min, max);
        debug!(target: DOMAIN_TARGET, min, max, "set finance time scale range");
        self
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.options.padding
    }

    pub fn set_padding(&mut self, padding: f64) -> ScaleResult<()> {
        self.options = FinanceTimeScaleOptions {
            padding,
            ..self.options
        }
        .validate()?;
        self.apply_index_domain();
        Ok(())
    }

    #[must_use]
    pub fn outer_padding(&self) -> f64 {
        self.options.outer_padding
    }

    pub fn set_outer_padding(&mut self, outer_padding: f64) -> ScaleResult<()> {
        self.options = FinanceTimeScaleOptions {
            outer_padding,
            ..self.options
        }
        .validate()?;
        self.apply_index_domain();
        Ok(())
    }

    /// Pixel distance between consecutive observations under the current zoom.
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        self.index.step()
    }

    /// Drawable width of one observation: the step minus inner padding.
    #[must_use]
    pub fn band(&self) -> f64 {
        self.step() * (1.0 - self.options.padding)
    }

    /// Maps a timestamp to a pixel.
    ///
    /// Timestamps between two entries snap to the nearest one (earlier on a
    /// tie). Timestamps before the first or after the last entry land one
    /// step outside the domain, so the result may fall outside the range.
    #[must_use]
    pub fn scale(&self, time: DateTime<Utc>) -> f64 {
        self.scale_with_offset(time, 0.0)
    }

    /// Like [`FinanceTimeScale::scale`], shifted by a fractional index offset
    /// (e.g. `-0.5` for the left edge of the step).
    #[must_use]
    pub fn scale_with_offset(&self, time: DateTime<Utc>, offset: f64) -> f64 {
        self.index.index_to_pixel(self.index_position(time) + offset)
    }

    fn index_position(&self, time: DateTime<Utc>) -> f64 {
        let times = self.domain.times();
        let (Some(first), Some(last)) = (times.first(), times.last()) else {
            return 0.0;
        };
        if time < *first {
            return -1.0;
        }
        if time > *last {
            return times.len() as f64;
        }
        self.domain.index_of(time).map_or(0.0, |index| index as f64)
    }

    /// Timestamp under `pixel`, or `None` when it rounds outside the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<DateTime<Utc>> {
        let index = self.invert_to_index(pixel)?;
        self.domain.timestamp_at(index as f64)
    }

    /// Full-domain index under `pixel`, or `None` when it rounds outside.
    #[must_use]
    pub fn invert_to_index(&self, pixel: f64) -> Option<usize> {
        let index = round_index(self.index.pixel_to_index(pixel))?;
        let len = i64::try_from(self.domain.len()).ok()?;
        if index < 0 || index >= len {
            return None;
        }
        usize::try_from(index).ok()
    }

    /// Ticks for the configured default count.
    pub fn ticks(&mut self) -> Vec<DateTime<Utc>> {
        self.ticks_with_count(self.options.default_tick_count)
    }

    /// Ticks drawn from the visible domain, roughly `count` of them.
    ///
    /// A single visible point yields that point. When no calendar interval
    /// fits under `count`, every visible record is returned.
    pub fn ticks_with_count(&mut self, count: usize) -> Vec<DateTime<Utc>> {
        let visible = self.domain();
        if visible.is_empty() {
            trace!(target: TICKS_TARGET, "no visible domain, no ticks");
            return Vec::new();
        }

        let (granularity, ticks) = match select_tick_interval(visible, count) {
            Some(interval) => (
                TickGranularity::Unit(interval.unit()),
                TickIter::new(visible, interval).collect::<Vec<_>>(),
            ),
            None => (TickGranularity::Generic, visible.to_vec()),
        };
        debug!(
            target: TICKS_TARGET,
            target_count = count,
            visible = visible.len(),
            tick_count = ticks.len(),
            ?granularity,
            "selected tick granularity"
        );

        self.last_granularity = granularity;
        ticks
    }

    /// Ticks at an explicit calendar interval, skipping slots with no data.
    pub fn ticks_with_interval(&mut self, interval: TickInterval) -> Vec<DateTime<Utc>> {
        let visible = self.domain();
        if visible.is_empty() {
            trace!(target: TICKS_TARGET, "no visible domain, no ticks");
            return Vec::new();
        }

        let ticks: Vec<_> = self.tick_iter(interval).collect();
        trace!(
            target: TICKS_TARGET,
            ?interval,
            tick_count = ticks.len(),
            "interval ticks"
        );
        self.last_granularity = TickGranularity::Unit(interval.unit());
        ticks
    }

    /// Lazy tick walk over the visible domain. Does not touch formatter state.
    #[must_use]
    pub fn tick_iter(&self, interval: TickInterval) -> TickIter<'_> {
        TickIter::new(self.domain(), interval)
    }

    /// Formatter for the granularity of the last tick call (yearly before any).
    #[must_use]
    pub fn tick_format(&self) -> TickFormatter {
        TickFormatter::new(self.last_granularity)
    }

    #[must_use]
    pub fn last_tick_granularity(&self) -> TickGranularity {
        self.last_granularity
    }

    /// Shared zoom handle for an external pan/zoom controller.
    #[must_use]
    pub fn zoomable(&self) -> ZoomHandle {
        self.index.zoom().clone()
    }

    #[must_use]
    pub fn index_scale(&self) -> &IndexScale {
        &self.index
    }

    #[must_use]
    pub fn domain_index(&self) -> &DomainIndex {
        &self.domain
    }

    /// Independent scale with the same domain, range and a snapshot of the zoom.
    ///
    /// The domain storage is shared; tick formatter state starts fresh.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            options: self.options,
            domain: self.domain.clone(),
            index: self.index.copy(),
            last_granularity: TickGranularity::default(),
        }
    }

    fn apply_index_domain(&mut self) {
        let margin = self.options.index_margin();
        let last = self.domain.len() as f64 - 1.0;
        self.index.set_domain(-margin, last + margin);
    }
}
