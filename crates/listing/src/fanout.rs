//! Pricing context fan-out.

use serde::{Deserialize, Serialize};

use facetry_catalog::CustomerGroupKey;
use facetry_core::{CurrencyId, ShopId};

/// Coordinates of one pricing context, resolved by a `ContextFactory`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub shop_id: ShopId,
    pub customer_group: CustomerGroupKey,
    pub currency_id: CurrencyId,
}

/// Cross product of customer groups and currencies for one shop.
///
/// Customer groups form the outer loop, currencies the inner one.
pub fn fanout(
    shop_id: ShopId,
    customer_groups: &[CustomerGroupKey],
    currencies: &[CurrencyId],
) -> Vec<ContextKey> {
    customer_groups
        .iter()
        .flat_map(|customer_group| {
            currencies.iter().map(move |currency_id| ContextKey {
                shop_id,
                customer_group: customer_group.clone(),
                currency_id: *currency_id,
            })
        })
        .collect()
}
