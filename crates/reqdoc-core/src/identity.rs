//! # Identifier Newtypes
//!
//! Store-assigned keys for the three entity kinds. Each key is a distinct
//! type wrapping the `BIGSERIAL` value assigned by the backing store.
//!
//! Keys coming from a store are trusted as-is ([`RequirementId::new`]).
//! Keys coming from a client (URL path segments, query strings) go through
//! [`FromStr`], which rejects anything that is not a positive integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! store_key {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a key assigned by the backing store.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Access the underlying key.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(ValidationError::InvalidIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

store_key!(
    /// Key of a compliance requirement.
    RequirementId,
    "requirement"
);

store_key!(
    /// Key of a document attached to a requirement.
    DocumentId,
    "document"
);

store_key!(
    /// Key of one revision of a document.
    VersionId,
    "version"
);
