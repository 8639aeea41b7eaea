//! # Error Types
//!
//! The lifecycle machines cannot fail; everything that can go wrong here
//! happens while fetching rows or when a caller's precondition is violated.

use thiserror::Error;

use atelier_core::{AtelierError, QuoteId, UserId};

/// Errors raised by a [`BidSource`](crate::BidSource) or
/// [`DesignSource`](crate::DesignSource).
#[derive(Error, Debug)]
pub enum SourceError {
    /// The database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row could not be decoded into a domain type (e.g. an unknown event tag).
    #[error("decode error: {0}")]
    Decode(#[from] AtelierError),

    /// The backing store could not be reached.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the status services.
#[derive(Error, Debug)]
pub enum StatusError {
    /// Fetching the input rows failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The user already holds an open or accepted bid on the quote.
    #[error("{user_id} already holds an active bid on {quote_id}")]
    DuplicateAssignment {
        /// The quote being assigned.
        quote_id: QuoteId,
        /// The partner who already holds a bid.
        user_id: UserId,
    },
}
