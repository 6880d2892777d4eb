//! Integer surrogate identifiers.
//!
//! Each id type is a transparent `i32` newtype so a [`Nid`] cannot be passed
//! where a [`StampSequence`] is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wrap a raw integer.
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// The raw integer.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Component identifier assigned by the identifier service.
    Nid
);

define_id!(
    /// Deduplicated surrogate for one STAMP tuple.
    StampSequence
);
