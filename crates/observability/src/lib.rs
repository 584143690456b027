//! Tracing/logging setup shared by deferid binaries.

pub mod config;

/// Subscriber installation.
pub mod tracing;

pub use config::{ConfigError, LogFormat, ObservabilityConfig};

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide logging from an explicit configuration.
pub fn init_with(config: &ObservabilityConfig) {
    tracing::init_with(config);
}
