//! Newtype IDs for type-safe identifiers.
//!
//! Identifiers are 64-bit unsigned integers on the gateway. They serialize as
//! exact decimal strings so text formats whose native number type is a
//! double never round them.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from its numeric value.
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the numeric value.
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
                s.trim().parse::<u64>().map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = ProductId::new(789);
        assert_eq!(format!("{}", id), "789");
    }

    #[test]
    fn test_id_parse() {
        let id: ProductId = " 18446744073709551615 ".parse().unwrap();
        assert_eq!(id.get(), u64::MAX);
        assert!("-1".parse::<ProductId>().is_err());
        assert!("18446744073709551616".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let json = serde_json::to_string(&OrderId::new(u64::MAX)).unwrap();
        assert_eq!(json, "\"18446744073709551615\"");

        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderId::new(u64::MAX));
    }

    #[test]
    fn test_id_rejects_native_number() {
        assert!(serde_json::from_str::<ProductId>("42").is_err());
    }
}
