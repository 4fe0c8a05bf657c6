//! Entity identifiers
//!
//! Row ids are assigned by the store and are always positive. Each id kind is
//! its own newtype so an `ActorId` can never be passed where a `PostId` is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an id from a path segment or query value
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid id format")]
    InvalidFormat,

    #[error("id must be positive")]
    NotPositive,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create from a raw store id
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Parse from string representation, rejecting zero and negatives
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                let id = s.trim().parse::<i64>().map_err(|_| IdParseError::InvalidFormat)?;
                if id < 1 {
                    return Err(IdParseError::NotPositive);
                }
                Ok(Self(id))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

entity_id!(
    /// Identity of an authenticated end user
    ActorId
);

entity_id!(
    /// Post row id
    PostId
);

entity_id!(
    /// Comment row id
    CommentId
);
