//! # Error Types
//!
//! The lifecycle engine itself never fails: unrelated events are ignored and
//! empty collections are a handled case. The only errors in this crate come
//! from parsing raw values at the ingestion boundary, where a bad tag or a
//! malformed timestamp must fail loudly instead of silently skewing a replay.

use thiserror::Error;

/// Top-level error type for the Atelier core types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtelierError {
    /// An event type tag that is not part of the closed event vocabulary.
    #[error("unknown event type: {0:?}")]
    UnknownEventType(String),

    /// A timestamp that could not be parsed or is out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An identifier that is not a valid UUID.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
