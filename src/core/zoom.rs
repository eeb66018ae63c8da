use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Smallest scale factor a transform can carry.
pub const MIN_ZOOM_FACTOR: f64 = 1e-6;

/// Pan/zoom state in output space: `pixel' = k * pixel + x`.
///
/// A zoomed scale shows across its range what the unzoomed scale placed at
/// `invert(pixel)`, so the transform picks an index window rather than
/// moving pixels directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    /// Builds a transform; `k` is raised to [`MIN_ZOOM_FACTOR`] when smaller.
    #[must_use]
    pub fn new(k: f64, x: f64) -> Self {
        Self {
            k: k.max(MIN_ZOOM_FACTOR),
            x,
        }
    }

    #[must_use]
    pub fn apply(self, pixel: f64) -> f64 {
        self.k * pixel + self.x
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        (pixel - self.x) / self.k
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

#[derive(Debug)]
struct ZoomState {
    transform: Cell<ZoomTransform>,
    clamp: Cell<bool>,
}

/// Shared, mutable zoom state handed to an external pan/zoom controller.
///
/// Cloning the handle shares the underlying transform and clamp flag;
/// mutations are seen by every holder on the next read. Use
/// [`ZoomHandle::detached`] for an independent snapshot.
///
/// With clamping on (the default) a scale never lets the zoomed index window
/// reach past the index domain it had before zooming.
#[derive(Debug, Clone)]
pub struct ZoomHandle {
    state: Rc<ZoomState>,
}

impl Default for ZoomHandle {
    fn default() -> Self {
        Self::new(ZoomTransform::IDENTITY)
    }
}

impl ZoomHandle {
    #[must_use]
    pub fn new(transform: ZoomTransform) -> Self {
        Self::with_clamp(transform, true)
    }

    #[must_use]
    pub fn with_clamp(transform: ZoomTransform, clamp: bool) -> Self {
        Self {
            state: Rc::new(ZoomState {
                transform: Cell::new(transform),
                clamp: Cell::new(clamp),
            }),
        }
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.state.transform.get()
    }

    pub fn set_transform(&self, transform: ZoomTransform) {
        self.state
            .transform
            .set(ZoomTransform::new(transform.k, transform.x));
    }

    pub fn reset(&self) {
        self.state.transform.set(ZoomTransform::IDENTITY);
    }

    #[must_use]
    pub fn clamp(&self) -> bool {
        self.state.clamp.get()
    }

    /// Turns clamping of the zoomed index window on or off.
    pub fn set_clamp(&self, clamp: bool) {
        self.state.clamp.set(clamp);
    }

    /// Pans by an output-space delta.
    pub fn translate_by(&self, delta_px: f64) {
        let current = self.transform();
        self.set_transform(ZoomTransform::new(current.k, current.x + delta_px));
    }

    /// Multiplies the scale factor while keeping `anchor_px` fixed on screen.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out. The anchor
    /// only drifts when clamping cuts the zoomed window.
    pub fn scale_by(&self, factor: f64, anchor_px: f64) {
        let current = self.transform();
        let anchor_base = current.invert(anchor_px);
        let k = (current.k * factor).max(MIN_ZOOM_FACTOR);
        self.set_transform(ZoomTransform::new(k, anchor_px - k * anchor_base));
    }

    /// Returns a new handle holding a copy of the current transform and clamp flag.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self::with_clamp(self.transform(), self.clamp())
    }

    /// Whether both handles observe the same zoom state.
    #[must_use]
    pub fn shares_state_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}
