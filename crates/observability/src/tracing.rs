//! Structured JSON logging on top of `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
///
/// `tower_http` request spans are included at `info` so each request gets
/// one line with method, path and status.
pub const DEFAULT_DIRECTIVE: &str = "info,tower_http=info,sqlx=warn";

/// Install the global subscriber with [`DEFAULT_DIRECTIVE`] as fallback.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with_default(DEFAULT_DIRECTIVE);
}

pub fn init_with_default(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_current_span(true)
        .try_init()
        .is_ok();

    if installed {
        ::tracing::debug!(directive, "tracing initialized");
    }
}
