//! Shops, currencies, customer groups and the pricing context built from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use facetry_core::{CurrencyId, DomainError, DomainResult, ShopId};

/// Key of a customer group (e.g. `EK` for end customers, `H` for resellers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerGroupKey(String);

impl CustomerGroupKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CustomerGroupKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A currency with its conversion factor relative to the shop's base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub factor: Decimal,
}

impl Currency {
    pub fn new(id: CurrencyId, factor: Decimal) -> Self {
        Self { id, factor }
    }
}

/// A shop (sales channel). Sub-shops share the currencies of their main shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub is_main: bool,
    pub parent_id: Option<ShopId>,
    pub currency: Currency,
}

impl Shop {
    pub fn main(id: ShopId, currency: Currency) -> Self {
        Self {
            id,
            is_main: true,
            parent_id: None,
            currency,
        }
    }

    pub fn sub_shop(id: ShopId, parent_id: ShopId, currency: Currency) -> Self {
        Self {
            id,
            is_main: false,
            parent_id: Some(parent_id),
            currency,
        }
    }

    /// The shop whose currency list applies to this shop.
    pub fn currency_shop_id(&self) -> ShopId {
        match (self.is_main, self.parent_id) {
            (false, Some(parent_id)) => parent_id,
            _ => self.id,
        }
    }
}

/// Pricing context: which price rows apply and how they are converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingContext {
    pub shop_id: ShopId,
    pub currency: Currency,
    pub customer_group: CustomerGroupKey,
    /// Customer group whose prices apply when the current group has none.
    pub fallback_customer_group: CustomerGroupKey,
}

impl PricingContext {
    /// Result key of this context in the listing price matrix (`EK_1`).
    pub fn price_key(&self) -> String {
        format!("{}_{}", self.customer_group, self.currency.id)
    }

    /// Converts a base-currency amount into this context's currency.
    pub fn convert(&self, amount: Decimal) -> DomainResult<Decimal> {
        amount.checked_mul(self.currency.factor).ok_or_else(|| {
            DomainError::overflow(format!(
                "{amount} times factor {} of currency {}",
                self.currency.factor, self.currency.id
            ))
        })
    }
}
