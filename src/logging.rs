// Logging setup on top of tracing-subscriber.
// RUST_LOG takes precedence over the configured filter.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"shiftopt=debug"`. Calling this twice keeps the first subscriber.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Verbose subscriber writing through the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
