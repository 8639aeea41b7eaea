//! # atelier-core: Foundational Types for the Lifecycle Engine
//!
//! Defines the vocabulary shared by every other crate in the workspace:
//! identifier newtypes, the UTC millisecond [`Timestamp`], the closed
//! [`EventType`] set, immutable [`DomainEvent`] records, and the entity
//! shapes (bids, designs, cost inputs) that the persistence layer hands
//! to the engine.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `BidId`, `DesignId`,
//!    `CollectionId`, `QuoteId`, `UserId`: no bare UUIDs cross an API.
//!
//! 2. **Closed event vocabulary.** `EventType` is a single enum. Raw tags
//!    are parsed once, at the boundary where rows enter the system, and an
//!    unknown tag is a loud [`AtelierError::UnknownEventType`].
//!
//! 3. **UTC-only timestamps.** Time is always passed in explicitly; nothing
//!    in the engine reads the wall clock on its own.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `atelier-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod event;
pub mod identity;
pub mod model;
pub mod temporal;

pub use error::AtelierError;
pub use event::{DomainEvent, EventType};
pub use identity::{BidId, CollectionId, CostInputId, DesignId, EventId, QuoteId, UserId};
pub use model::{Bid, BidWithEvents, CostInput, DesignWithMeta};
pub use temporal::Timestamp;
