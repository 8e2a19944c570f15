// SPDX-License-Identifier: MIT
//
// Diagnostics go to stderr so stdout stays pure JSON.

use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "N_PALETTE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Filter from `N_PALETTE_LOG`, then `RUST_LOG`, then `warn`.
pub fn env_filter() -> EnvFilter {
    [LOG_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .find_map(|var| EnvFilter::try_from_env(var).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
