//! Logging Infrastructure
//!
//! Structured logging setup for development and production environments.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// Respects `RUST_LOG`; falls back to `LOG_LEVEL`, then `info`.
pub fn init_logger() {
    let fallback = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}
