//! Logging for learnctl
//!
//! Logs go to stderr so `report --json` stays clean on stdout.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. RUST_LOG wins over `default_level`.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests) is not an error
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
