//! Raw rows handed over by the price and stock collaborators.
//!
//! One row per (variant, configurator option): a variant with three groups
//! arrives as three rows carrying the same payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use facetry_core::{GroupId, OptionId, ProductId, VariantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRow {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    /// Unbounded-tier price in the shop's base currency.
    pub price: Decimal,
    pub option_id: OptionId,
    pub group_id: GroupId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    /// `stock >= min_purchase` of the variant.
    pub available: bool,
    pub option_id: OptionId,
    pub group_id: GroupId,
}
