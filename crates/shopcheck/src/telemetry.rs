//! Log output for suite runs.
//!
//! Filter comes from `SHOPCHECK_LOG`, then `RUST_LOG`, then `info`.
//! `SHOPCHECK_LOG_FORMAT=json` switches to one JSON object per line.

use tracing_subscriber::EnvFilter;

/// Filter variable checked first
pub const LOG_ENV: &str = "SHOPCHECK_LOG";

/// Output format variable
pub const LOG_FORMAT_ENV: &str = "SHOPCHECK_LOG_FORMAT";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber once.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_tracing() {
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_test_writer();
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
