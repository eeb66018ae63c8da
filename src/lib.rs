//! fintime-scale: gap-aware time scale for financial charts.
//!
//! Timestamps are mapped through their position in an ordered domain, so
//! every observation gets the same pixel width no matter how large the
//! calendar gap before it is. Pan/zoom is driven externally through a
//! shared [`core::ZoomHandle`], and ticks are only ever drawn from
//! timestamps that exist in the data.

pub mod core;
pub mod error;
pub mod telemetry;

pub use crate::core::{FinanceTimeScale, FinanceTimeScaleOptions};
pub use error::{ScaleError, ScaleResult};
