//! Typed identifiers for league entities.
//!
//! # Invariants
//! - Identifiers are opaque strings; persisted values are accepted verbatim,
//!   including legacy timestamp-based ids.
//! - Freshly generated identifiers are random UUID v4 in simple hex form.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh identifier that is unique for practical purposes.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns whether this id is an empty selection.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
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

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

entity_id!(
    /// Key of a league inside the store.
    LeagueId
);
entity_id!(
    /// Stable identifier of a player within one league.
    PlayerId
);
entity_id!(
    /// Stable identifier of a doubles pair within one league.
    PairId
);
entity_id!(
    /// Stable identifier of one recorded match.
    MatchId
);

#[cfg(test)]
mod tests {
    use super::{PairId, PlayerId};

    #[test]
    fn generated_ids_are_distinct_hex() {
        let first = PlayerId::generate();
        let second = PlayerId::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 32);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = PairId::from("lq3x9k2abc");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("lq3x9k2abc"));
    }

    #[test]
    fn blank_ids_count_as_missing_selection() {
        assert!(PlayerId::from("  ").is_blank());
        assert!(!PlayerId::from("p1").is_blank());
    }
}
