//! Type-safe identifier wrappers.
//!
//! Content identifiers ([`PaperId`], [`SetId`], [`TechnologyId`]) are
//! authored `snake_case` strings that stay stable across saves and content
//! versions. Researcher contexts are runtime entities and use UUID v7
//! ([`ContextId`]) like every other entity the host simulation creates.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around an authored string key.
///
/// Keys borrow as `str` so ordered maps keyed by them can be queried with
/// plain string slices.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from anything string-like.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(String::from(key))
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }
    };
}

define_id! {
    /// Unique identifier for an independent researcher (player, faction, nation).
    ContextId
}

define_key! {
    /// Stable identifier of a research paper.
    PaperId
}

define_key! {
    /// Stable identifier of a research set.
    SetId
}

define_key! {
    /// Identifier of a technology. Several unlock rules may share one.
    TechnologyId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn context_ids_are_unique() {
        assert_ne!(ContextId::new(), ContextId::new());
    }

    #[test]
    fn keys_lookup_by_str() {
        let set: BTreeSet<PaperId> = ["fire", "wheel"].into_iter().map(PaperId::from).collect();
        assert!(set.contains("fire"));
        assert!(!set.contains("bronze"));
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let id = TechnologyId::from("forge");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"forge\"");
    }

    #[test]
    fn key_display_is_raw() {
        assert_eq!(SetId::from("metallurgy").to_string(), "metallurgy");
    }
}
