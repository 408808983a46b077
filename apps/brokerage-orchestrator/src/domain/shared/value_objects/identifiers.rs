//! Strongly-typed identifiers.
//!
//! Upstream identifiers are always assigned by the brokerage; nothing here
//! generates one locally.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_upstream_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Create an identifier only when the value is non-blank.
            ///
            /// Local records use the empty string for "not assigned yet".
            #[must_use]
            pub fn non_blank(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    None
                } else {
                    Some(Self(value))
                }
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_upstream_id!(AccountId, "Upstream brokerage account identifier.");
define_upstream_id!(WatchlistId, "Upstream watchlist identifier.");

/// Local user identifier, as resolved by the authentication layer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Create a new user identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_new_and_display() {
        let id = AccountId::new("acct-1");
        assert_eq!(id.as_str(), "acct-1");
        assert_eq!(format!("{id}"), "acct-1");
    }

    #[test]
    fn non_blank_rejects_empty_and_whitespace() {
        assert!(AccountId::non_blank("").is_none());
        assert!(WatchlistId::non_blank("   ").is_none());
        assert_eq!(
            WatchlistId::non_blank("wl-9").map(WatchlistId::into_inner),
            Some("wl-9".to_string())
        );
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&WatchlistId::new("wl-1")).unwrap();
        assert_eq!(json, "\"wl-1\"");

        let user: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(user.value(), 42);
    }
}
