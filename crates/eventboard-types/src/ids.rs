//! Type-safe identifier wrappers.
//!
//! Every record kind has its own identifier type so a foreign key can never
//! be assigned to the wrong field. Identifiers are opaque strings: records
//! created at runtime receive a UUID v7 string, while seeded records keep
//! whatever identifier the seed document carries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Common behaviour of the per-kind identifier types.
pub trait RecordId:
    Clone + Eq + core::fmt::Debug + core::fmt::Display + From<String> + Send + Sync + 'static
{
    /// Generate a fresh identifier.
    fn generate() -> Self;

    /// Borrow the identifier as a string slice.
    fn as_str(&self) -> &str;
}

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier (UUID v7, time-ordered).
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl RecordId for $name {
            fn generate() -> Self {
                Self::generate()
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a user.
    UserId
}

define_id! {
    /// Unique identifier for a location.
    LocationId
}

define_id! {
    /// Unique identifier for an event.
    EventId
}

define_id! {
    /// Unique identifier for a participant (one user's attendance at one event).
    ParticipantId
}
