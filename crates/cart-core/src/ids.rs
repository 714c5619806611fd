//! Newtype IDs for type-safe identifiers.
//!
//! Catalog identifiers are plain integers on the wire; wrapping them keeps a
//! product id from being passed where a quantity is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate integer-backed newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw integer.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new(42);
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn test_id_parse() {
        let id: ProductId = " 7 ".parse().unwrap();
        assert_eq!(id, ProductId::new(7));
        assert!("seven".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", ProductId::new(789)), "789");
    }

    #[test]
    fn test_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&ProductId::new(3)).unwrap();
        assert_eq!(json, "3");

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new(3));
    }
}
