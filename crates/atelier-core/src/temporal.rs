//! # Temporal Types: UTC Millisecond Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to millisecond
//! precision. Event rows, bid creation times and cost-input expirations all
//! use it, and every expiration predicate takes "now" as an explicit
//! `Timestamp` argument so that a replay is reproducible.
//!
//! Millisecond precision is load-bearing: the bid TTL boundary is decided
//! one millisecond either side of `created_at + ttl`.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AtelierError;

/// A UTC-only timestamp, truncated to millisecond precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-milliseconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string, converted to UTC.
/// - [`Timestamp::from_epoch_millis()`]: from Unix milliseconds.
///
/// Deserialization goes through [`Timestamp::from_utc()`], so sub-millisecond
/// digits in incoming data are truncated too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DateTime<Utc>", into = "DateTime<Utc>")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any offset and
    /// converting to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`AtelierError::InvalidTimestamp`] if the string is not valid RFC 3339.
    pub fn parse(s: &str) -> Result<Self, AtelierError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| AtelierError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`AtelierError::InvalidTimestamp`] if the value is out of range.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, AtelierError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| AtelierError::InvalidTimestamp(format!("epoch millis {millis}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Shift this instant by `delta` (negative deltas move backwards).
    ///
    /// Saturates at the representable range instead of panicking.
    pub fn shifted(&self, delta: Duration) -> Self {
        match self.0.checked_add_signed(delta) {
            Some(dt) => Self::from_utc(dt),
            None if delta < Duration::zero() => Self(DateTime::<Utc>::MIN_UTC),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Signed duration from `earlier` to `self`.
    pub fn since(&self, earlier: Timestamp) -> Duration {
        self.0.signed_duration_since(earlier.0)
    }

    /// Render as RFC 3339 with millisecond precision and a `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = dt.nanosecond();
    dt.with_nanosecond(nanos - nanos % 1_000_000).unwrap_or(dt)
}
