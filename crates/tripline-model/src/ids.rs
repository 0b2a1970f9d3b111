//! Identifier newtypes
//!
//! Entity identifiers are ULIDs (sortable, collision-free without
//! coordination — important because ids are minted on disconnected
//! clients). User identities are opaque phone-number-keyed strings
//! supplied by the identity provider.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ulid::Ulid;

macro_rules! ulid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub Ulid);

        impl $name {
            /// Generate a fresh identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s)
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId(s.to_string()))
            }
        }
    };
}

ulid_id! {
    /// Unique trip identifier (the aggregate root)
    TripId
}

ulid_id! {
    /// Unique itinerary item identifier (unique within a day)
    ItemId
}

ulid_id! {
    /// Unique trip task identifier
    TaskId
}

ulid_id! {
    /// Unique activity record identifier
    ActivityId
}

/// Stable collaborator identity key
///
/// Phone-number-keyed reference handed out by the identity provider.
/// Treated as opaque; used as a map key for votes, RSVPs and admin grants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identity key
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
