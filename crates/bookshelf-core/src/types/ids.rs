//! Typed resource identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw server-assigned id.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self).map_err(|e| {
                    InvalidInputError::Id {
                        value: s.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

resource_id!(
    /// Identifier of a book.
    BookId
);

resource_id!(
    /// Identifier of a reading list.
    ReadingListId
);

resource_id!(
    /// Identifier of a book's membership in a reading list.
    ///
    /// Reorder requests address entries, not books.
    EntryId
);
