pub mod domain_index;
pub mod finance_time_scale;
pub mod index_scale;
pub mod tick_format;
pub mod tick_interval;
pub mod ticks;
pub mod zoom;

pub use domain_index::{DomainIndex, round_index};
pub use finance_time_scale::{FinanceTimeScale, FinanceTimeScaleOptions};
pub use index_scale::IndexScale;
pub use tick_format::TickFormatter;
pub use tick_interval::{TickInterval, TimeUnit};
pub use ticks::{AUTO_TICK_INTERVALS, DEFAULT_TICK_COUNT, TickGranularity, TickIter};
pub use zoom::{MIN_ZOOM_FACTOR, ZoomHandle, ZoomTransform};
