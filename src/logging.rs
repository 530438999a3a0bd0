//! Tracing setup for hosts embedding the relay.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Respects `RUST_LOG`; defaults to `info`
/// with dispatch diagnostics visible. Safe to call more than once — later
/// calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
