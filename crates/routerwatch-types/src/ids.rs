//! Type-safe identifier wrappers for document-store keys.
//!
//! The remote document store keys both router documents and user accounts
//! by opaque strings. Wrapping them in newtypes prevents accidental mixing
//! of the two at compile time. Router identifiers are assigned by the store
//! on creation; [`RouterId::generate`] exists for the store side and uses
//! UUID v7 (time-ordered) so freshly created documents sort by insertion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around an owned identifier string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing store-assigned identifier.
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a router document in the remote store.
    RouterId
}

define_id! {
    /// Unique identifier for an authenticated user account.
    UserId
}

impl RouterId {
    /// Generate a fresh store-assigned identifier (UUID v7, time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_inner_string() {
        let id = RouterId::from("router-42");
        assert_eq!(id.to_string(), "router-42");
        assert_eq!(id.as_str(), "router-42");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = RouterId::generate();
        let b = RouterId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::from("user-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-7\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn router_and_user_ids_are_distinct_types() {
        // Compile-time property; the assertion just keeps the test body real.
        let router = RouterId::from("x");
        let user = UserId::from("x");
        assert_eq!(router.as_str(), user.as_str());
    }
}
