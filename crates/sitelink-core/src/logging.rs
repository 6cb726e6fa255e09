//! Tracing subscriber initialization.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::logging::LoggingConfig;

/// Initialize the global tracing subscriber from logging configuration.
///
/// The `RUST_LOG` environment variable takes precedence over the configured
/// level. Calling this more than once is a no-op (the second registration
/// fails silently), so embedding hosts that install their own subscriber
/// are left undisturbed.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
        _ => fmt().with_env_filter(filter).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
