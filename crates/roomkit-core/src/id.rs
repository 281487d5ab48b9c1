//! Strongly-typed identifiers for platform resources.
//!
//! Every record on the platform is keyed by a UUID. Wrapping them per resource
//! prevents passing a booking id to the property client at compile time.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Generates a strongly-typed UUID wrapper.
#[macro_export]
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wraps an existing [`Uuid`](::uuid::Uuid).
            #[must_use]
            pub const fn new(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Creates a new random id (v4).
            #[must_use]
            pub fn new_v4() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            /// Parses an id from its hyphenated string form.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidId`]($crate::Error::InvalidId) if the string is not a UUID.
            pub fn parse_str(input: &str) -> $crate::Result<Self> {
                ::uuid::Uuid::parse_str(input)
                    .map(Self)
                    .map_err(|_| $crate::Error::InvalidId(input.to_string()))
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> $crate::Result<Self> {
                Self::parse_str(s)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $crate::id::ResourceId for $name {
            fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }
    };
}

/// Implemented by every id wrapper so the generic resource client can accept any of them.
pub trait ResourceId: Copy + Serialize + fmt::Display + Send + Sync + 'static {
    /// The wrapped UUID.
    fn as_uuid(&self) -> &Uuid;
}

id_type!(AccountId, "Account (tenant) id");
id_type!(PropertyId, "Property id");
id_type!(BookingId, "Booking id");
id_type!(GuestId, "Guest id");
id_type!(ChannelId, "Distribution channel id");
id_type!(ThreadId, "Conversation thread id");
id_type!(MessageId, "Thread message id");
id_type!(WorkflowId, "Automation workflow id");
id_type!(PaymentMethodId, "Payment method id");

/// Validates an id string without committing to a resource type.
///
/// # Errors
///
/// Returns an error if the string is not a valid UUID.
pub fn validate_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| Error::InvalidId(s.to_string()))
}
