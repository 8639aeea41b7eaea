//! Engine and telemetry configuration.
//!
//! Durations are configured in whole seconds. Defaults match the
//! production policy: bids live 24 hours, pricing reminders go out one
//! week and two days before expiry, and "just expired" looks back one day.

use chrono::Duration;

use atelier_state::DEFAULT_BID_TTL_SECS;

use crate::reminders::ReminderWindows;

const ONE_WEEK_SECS: i64 = 7 * 24 * 60 * 60;
const TWO_DAYS_SECS: i64 = 2 * 24 * 60 * 60;
const ONE_DAY_SECS: i64 = 24 * 60 * 60;

/// Tunables for the status services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a bid stays answerable after creation.
    pub bid_ttl: Duration,
    /// Lead times for pricing-expiration reminders.
    pub reminders: ReminderWindows,
    /// How far back an expiration still counts as "just expired".
    pub expired_lookback: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bid_ttl: Duration::seconds(DEFAULT_BID_TTL_SECS),
            reminders: ReminderWindows {
                one_week: Duration::seconds(ONE_WEEK_SECS),
                two_days: Duration::seconds(TWO_DAYS_SECS),
            },
            expired_lookback: Duration::seconds(ONE_DAY_SECS),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ATELIER_BID_TTL_SECS` (default: 86400)
    /// - `ATELIER_REMINDER_ONE_WEEK_SECS` (default: 604800)
    /// - `ATELIER_REMINDER_TWO_DAYS_SECS` (default: 172800)
    /// - `ATELIER_EXPIRED_LOOKBACK_SECS` (default: 86400)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            bid_ttl: secs(&lookup, "ATELIER_BID_TTL_SECS", DEFAULT_BID_TTL_SECS)?,
            reminders: ReminderWindows {
                one_week: secs(&lookup, "ATELIER_REMINDER_ONE_WEEK_SECS", ONE_WEEK_SECS)?,
                two_days: secs(&lookup, "ATELIER_REMINDER_TWO_DAYS_SECS", TWO_DAYS_SECS)?,
            },
            expired_lookback: secs(&lookup, "ATELIER_EXPIRED_LOOKBACK_SECS", ONE_DAY_SECS)?,
        };
        if config.reminders.two_days > config.reminders.one_week {
            return Err(ConfigError::InvalidValue(
                "ATELIER_REMINDER_TWO_DAYS_SECS".to_string(),
                "must not exceed ATELIER_REMINDER_ONE_WEEK_SECS".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ATELIER_LOG_LEVEL` (default: `info`)
    /// - `ATELIER_LOG_JSON` (default: `false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let json = match lookup("ATELIER_LOG_JSON").as_deref() {
            None => false,
            Some("1" | "true" | "TRUE" | "yes") => true,
            Some("0" | "false" | "FALSE" | "no" | "") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "ATELIER_LOG_JSON".to_string(),
                    format!("expected a boolean, got {other:?}"),
                ))
            }
        };
        Ok(Self {
            log_level: lookup("ATELIER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            json,
        })
    }
}

fn secs<F>(lookup: &F, var: &str, default: i64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(Duration::seconds(default));
    };
    let value: i64 = raw.trim().parse().map_err(|e| {
        ConfigError::InvalidValue(var.to_string(), format!("{raw:?} is not an integer: {e}"))
    })?;
    if value <= 0 {
        return Err(ConfigError::InvalidValue(
            var.to_string(),
            format!("must be positive, got {value}"),
        ));
    }
    Duration::try_seconds(value).ok_or_else(|| {
        ConfigError::InvalidValue(var.to_string(), format!("{value} is out of range"))
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be used (variable, reason).
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    /// The global `tracing` subscriber could not be installed.
    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}
