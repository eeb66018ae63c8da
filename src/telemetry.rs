//! Tracing targets and an opt-in subscriber for `fintime-scale`.
//!
//! The scale never installs a subscriber itself. It emits:
//! - `debug` on [`DOMAIN_TARGET`] when the domain or range is replaced,
//! - `debug` on [`TICKS_TARGET`] with the granularity picked for a tick count,
//! - `trace` on [`TICKS_TARGET`] for explicit-interval walks and empty views.
//!
//! Hosts with their own subscriber can filter on those targets directly.

/// Target for domain and range replacement events.
pub const DOMAIN_TARGET: &str = "fintime_scale::domain";

/// Target for tick selection events.
pub const TICKS_TARGET: &str = "fintime_scale::ticks";

/// Directives used by [`init_default_tracing`] when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "warn,fintime_scale=info";

/// Installs a compact subscriber filtered by [`DEFAULT_DIRECTIVES`].
///
/// Returns `false` when the `telemetry` feature is disabled or the host
/// already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVES)
}

/// Installs a compact subscriber; `RUST_LOG` takes precedence over
/// `fallback_directives`.
///
/// Invalid fallback directives make this return `false` without installing
/// anything.
#[must_use]
pub fn init_tracing(fallback_directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match EnvFilter::try_new(fallback_directives) {
                Ok(filter) => filter,
                Err(_) => return false,
            },
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directives;
        false
    }
}
