//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ObservabilityConfig};

/// Initialize tracing from `RUST_LOG` / `DEFERID_LOG_FORMAT`.
///
/// An invalid format falls back to the defaults and is reported once the
/// subscriber is installed.
pub fn init() {
    match ObservabilityConfig::from_env() {
        Ok(config) => init_with(&config),
        Err(err) => {
            init_with(&ObservabilityConfig::default());
            tracing::warn!(error = %err, "invalid observability config; using defaults");
        }
    }
}

/// Initialize tracing for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let _ = match config.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}
