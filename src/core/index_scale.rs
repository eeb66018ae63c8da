use crate::core::zoom::{ZoomHandle, ZoomTransform};

/// Linear mapping from real-valued index positions to output pixels.
///
/// The base mapping is `[domain_start, domain_end] -> [range_start, range_end]`.
/// The zoom transform held in the shared [`ZoomHandle`] selects which index
/// window the range shows; that window is rederived on every call, so
/// controller mutations need no invalidation step. Both directions
/// extrapolate past the window edges.
#[derive(Debug)]
pub struct IndexScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    zoom: ZoomHandle,
}

impl IndexScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::with_zoom(domain, range, ZoomHandle::default())
    }

    /// Builds a scale wired to an existing zoom handle.
    #[must_use]
    pub fn with_zoom(domain: (f64, f64), range: (f64, f64), zoom: ZoomHandle) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
            zoom,
        }
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn set_domain(&mut self, start: f64, end: f64) {
        self.domain_start = start;
        self.domain_end = end;
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn set_range(&mut self, start: f64, end: f64) {
        self.range_start = start;
        self.range_end = end;
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomHandle {
        &self.zoom
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    /// Index window shown across the range under the current zoom, in range
    /// order.
    ///
    /// The window is what the unzoomed scale puts at `transform.invert(pixel)`
    /// for both range ends. With clamping on, each end is held inside the
    /// base domain. A window clamped away to nothing (zoomed or panned past
    /// the data entirely) falls back to the unclamped one, which keeps the
    /// mapping strictly monotonic.
    #[must_use]
    pub fn zoomed_domain(&self) -> (f64, f64) {
        let transform = self.transform();
        if transform.is_identity() || self.range_start == self.range_end {
            return self.domain();
        }

        let start = self.base_pixel_to_index(transform.invert(self.range_start));
        let end = self.base_pixel_to_index(transform.invert(self.range_end));
        if !self.zoom.clamp() {
            return (start, end);
        }

        let (low, high) = (
            self.domain_start.min(self.domain_end),
            self.domain_start.max(self.domain_end),
        );
        let clamped = (start.max(low), end.min(high));
        if clamped.0 < clamped.1 {
            clamped
        } else {
            (start, end)
        }
    }

    /// Maps an index to a pixel, zoom included.
    #[must_use]
    pub fn index_to_pixel(&self, index: f64) -> f64 {
        remap(index, self.zoomed_domain(), self.range())
    }

    /// Maps a pixel back to a (fractional) index, zoom included.
    #[must_use]
    pub fn pixel_to_index(&self, pixel: f64) -> f64 {
        remap(pixel, self.range(), self.zoomed_domain())
    }

    /// Pixel distance between two consecutive indices under the current zoom.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.index_to_pixel(1.0) - self.index_to_pixel(0.0)).abs()
    }

    /// Fractional index interval currently covered by the output range,
    /// ordered low to high.
    #[must_use]
    pub fn visible_index_window(&self) -> (f64, f64) {
        let (a, b) = self.zoomed_domain();
        (a.min(b), a.max(b))
    }

    /// Independent copy whose zoom handle is detached from any controller.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::with_zoom(self.domain(), self.range(), self.zoom.detached())
    }

    fn base_pixel_to_index(&self, pixel: f64) -> f64 {
        remap(pixel, self.range(), self.domain())
    }
}

// Degenerate source intervals collapse onto the start of the target.
fn remap(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    let normalized = (value - from.0) / span;
    to.0 + normalized * (to.1 - to.0)
}
