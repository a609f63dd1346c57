//! Strongly-typed identifiers used across the catalog.
//!
//! Catalog rows carry plain integer keys; wrapping them keeps group ids from
//! being compared against option ids by accident.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product (the parent of all its variants).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a concrete, purchasable variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(u64);

/// Identifier of a configurator group (e.g. "Size").
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

/// Identifier of a configurator option (e.g. "XL").
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(u64);

/// Identifier of a shop (sales channel).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(u64);

/// Identifier of a currency.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(u64);

macro_rules! impl_numeric_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {:?}: {}", $name, s, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_id!(ProductId, "ProductId");
impl_numeric_id!(VariantId, "VariantId");
impl_numeric_id!(GroupId, "GroupId");
impl_numeric_id!(OptionId, "OptionId");
impl_numeric_id!(ShopId, "ShopId");
impl_numeric_id!(CurrencyId, "CurrencyId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integral_ids() {
        assert_eq!("42".parse::<OptionId>().unwrap(), OptionId::new(42));
        assert_eq!(" 7 ".parse::<GroupId>().unwrap(), GroupId::new(7));
    }

    #[test]
    fn rejects_non_integral_ids() {
        for raw in ["", "1.5", "abc", "-3", "12a"] {
            let err = raw.parse::<OptionId>().unwrap_err();
            match err {
                DomainError::InvalidId(msg) => assert!(msg.starts_with("OptionId")),
                _ => panic!("Expected InvalidId error for {raw:?}"),
            }
        }
    }

    #[test]
    fn ids_order_numerically() {
        let mut ids = vec![OptionId::new(12), OptionId::new(2), OptionId::new(100)];
        ids.sort();
        assert_eq!(ids, vec![OptionId::new(2), OptionId::new(12), OptionId::new(100)]);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&GroupId::new(10)).unwrap();
        assert_eq!(json, "10");
    }
}
