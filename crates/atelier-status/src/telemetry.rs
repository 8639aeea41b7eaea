//! Tracing subscriber setup for processes that embed the status services
//! (billing schedulers, notification jobs).

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, TelemetryConfig};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over [`TelemetryConfig::log_level`].
/// Returns [`ConfigError::Telemetry`] if a subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ConfigError::InvalidValue("ATELIER_LOG_LEVEL".to_string(), e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ConfigError::Telemetry(e.to_string()))?;

    tracing::debug!(json = config.json, "tracing initialized");
    Ok(())
}
