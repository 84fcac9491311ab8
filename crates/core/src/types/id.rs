//! Catalog product identifier.
//!
//! Shopify assigns numeric product IDs, but they reach us through several
//! channels (JSON numbers from the catalog, path segments, browser-side keys
//! that may have been stringified). `ProductId` is the one representation
//! used everywhere: it deserializes from a JSON number or a numeric JSON
//! string and always serializes as a number.

use core::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string is not a valid product ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid product id: {0:?}")]
pub struct ParseProductIdError(pub String);

/// A Shopify product ID.
///
/// ```
/// use copydesk_core::ProductId;
///
/// let from_number: ProductId = serde_json::from_str("632910392").unwrap();
/// let from_string: ProductId = serde_json::from_str("\"632910392\"").unwrap();
/// assert_eq!(from_number, from_string);
/// assert_eq!(serde_json::to_string(&from_string).unwrap(), "632910392");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a new ID from a u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl FromStr for ProductId {
    type Err = ParseProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseProductIdError(s.to_owned()))
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(ProductId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_number_and_string_agree() {
        let a: ProductId = serde_json::from_str("42").unwrap();
        let b: ProductId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_u64(), 42);
    }

    #[test]
    fn test_serializes_as_number() {
        let id = ProductId::new(8_123_456_789_012);
        assert_eq!(serde_json::to_string(&id).unwrap(), "8123456789012");
    }

    #[test]
    fn test_rejects_negative_and_non_numeric() {
        assert!(serde_json::from_str::<ProductId>("-1").is_err());
        assert!(serde_json::from_str::<ProductId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("17".parse::<ProductId>(), Ok(ProductId::new(17)));
        assert_eq!(
            "gid://shopify/Product/17".parse::<ProductId>(),
            Err(ParseProductIdError("gid://shopify/Product/17".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new(632_910_392).to_string(), "632910392");
    }
}
