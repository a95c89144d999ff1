//! Tracing setup
//!
//! Log output goes to stderr so it never mixes with report output on stdout.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter (same syntax as `RUST_LOG`)
pub const LOG_ENV: &str = "FINTRACK_LOG";

const DEFAULT_FILTER: &str = "fintrack=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::new(if verbose {
                "fintrack=debug"
            } else {
                DEFAULT_FILTER
            })
        });

        // try_init: a test harness may already have installed a subscriber
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
