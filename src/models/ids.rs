//! Typed row identifiers
//!
//! Every table keys its rows by a UUID the backend generates. Each entity
//! gets its own newtype so an account id can never be passed where a
//! category id is expected.
//!
//! Ids print in a short form (`acc-1a2b3c4d`) that the CLI also accepts as
//! input; see [`AccountId::matches`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Hex digits shown in the short form
const SHORT_LEN: usize = 8;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random id, for rows created locally (tests, demo data)
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse a full hyphenated UUID
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s.trim()).map(Self)
            }

            /// First eight hex digits of the UUID
            pub fn short(&self) -> String {
                let mut hex = self.0.simple().to_string();
                hex.truncate(SHORT_LEN);
                hex
            }

            /// Whether user input names this id
            ///
            /// Accepts the full UUID, the printed short form, or the short
            /// form without its prefix. Case-insensitive.
            pub fn matches(&self, input: &str) -> bool {
                let input = input.trim().to_ascii_lowercase();
                if input.is_empty() {
                    return false;
                }
                let bare = input.strip_prefix($prefix).unwrap_or(&input);
                bare == self.0.to_string() || bare == self.short()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

row_id!(AccountId => "acc-");
row_id!(TransactionId => "txn-");
row_id!(CategoryId => "cat-");
row_id!(BudgetId => "bud-");
row_id!(GoalId => "goal-");
row_id!(ProfileId => "prf-");
row_id!(
    /// Id of an authenticated user, owner of every private row
    UserId => "usr-"
);
