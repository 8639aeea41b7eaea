//! # atelier-status: Lifecycle Status Services
//!
//! The layer billing schedulers, bid-assignment handlers and collection
//! reporting jobs call into. It fetches bids and designs through a
//! [`BidSource`]/[`DesignSource`], hands them to the pure machines in
//! `atelier-state`, and rolls the results up.
//!
//! ## Services
//!
//! | Function | Module | Used by |
//! |---|---|---|
//! | [`has_active_bids`] / [`ensure_assignable`] | [`active_bids`] | bid assignment |
//! | [`determine_submission_status`] | [`submission`] | collection labeling, billing |
//! | [`pricing_reminders`] | [`reminders`] | pricing-expiration notifications |
//!
//! ## Sources
//!
//! - [`MemorySource`]: in-process maps, for tests and local development.
//! - [`db::PgSource`]: read-only Postgres queries via SQLx.
//!
//! Every service takes `now` explicitly; no status is ever cached or
//! written back.

pub mod active_bids;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod reminders;
pub mod source;
pub mod submission;
pub mod telemetry;

pub use active_bids::{any_active_bid, ensure_assignable, has_active_bids};
pub use config::{ConfigError, EngineConfig, TelemetryConfig};
pub use error::{SourceError, StatusError};
pub use memory::MemorySource;
pub use reminders::{
    pricing_just_expired, pricing_reminders, CollectionLabel, PricingReminder, ReminderWindows,
};
pub use source::{BidSource, DesignSource, SourceResult};
pub use submission::{determine_submission_status, summarize_collections, SubmissionStatus};
