//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Machine-readable JSON lines (production default).
    Json,
    /// Human-readable output for local development.
    Pretty,
}

/// Initialize tracing with the production default (JSON).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(Format::Json);
}

/// Initialize tracing with an explicit format.
///
/// Filtering is configurable via `RUST_LOG`; defaults to `info`.
pub fn init_with(format: Format) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        Format::Json => builder.json().try_init(),
        Format::Pretty => builder.pretty().try_init(),
    };
}
