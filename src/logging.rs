//! Tracing setup for the command line tools.
//!
//! Events go to stderr. The filter comes from `TASKFOLIO_LOG`, then
//! `RUST_LOG`, and defaults to `warn` so that dropped orphan tasks are
//! visible without any configuration.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TASKFOLIO_LOG";

/// Filter used when no usable filter is configured.
const DEFAULT_FILTER: &str = "warn";

/// Build a filter from a raw directive string, ignoring empty, oversized or
/// invalid input.
fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty() && raw.len() <= 4096)
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let raw = std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")).ok();
    let filter = filter_from(raw.as_deref());

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
