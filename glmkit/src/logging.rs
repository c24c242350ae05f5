//! Development-time tracing for debugging model manipulation and runs.
//!
//! Overwrite notices, staging steps, and simulator lifecycle events are all
//! `tracing` events; nothing is persisted. Simulator stdout/stderr are
//! captured separately in [`crate::pipeline::RunOutcome`].

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
