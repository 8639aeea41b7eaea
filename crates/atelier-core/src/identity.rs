//! # Identifier Newtypes
//!
//! Newtype wrappers for every identifier the engine touches. A `DesignId`
//! cannot be passed where a `CollectionId` is expected, which matters here
//! because designs, bids and quotes all share the same event rows.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AtelierError;

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = AtelierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| AtelierError::InvalidIdentifier(format!(
                        "{} {s:?}: {e}", $prefix
                    )))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

uuid_newtype!(
    /// Unique identifier for a domain event row.
    EventId,
    "event"
);

uuid_newtype!(
    /// Unique identifier for a production bid.
    BidId,
    "bid"
);

uuid_newtype!(
    /// Unique identifier for a design.
    DesignId,
    "design"
);

uuid_newtype!(
    /// Unique identifier for a collection of designs.
    CollectionId,
    "collection"
);

uuid_newtype!(
    /// Unique identifier for a pricing quote.
    QuoteId,
    "quote"
);

uuid_newtype!(
    /// Unique identifier for a user (designer, partner or admin).
    UserId,
    "user"
);

uuid_newtype!(
    /// Unique identifier for a cost input.
    CostInputId,
    "cost-input"
);
