//! Per-product variant indexes built from raw price / stock rows.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use facetry_catalog::{AvailabilityRow, PriceRow};
use facetry_core::{GroupId, OptionId, ProductId, ValueObject, VariantId};

/// One purchasable variant with its configurator options and a payload.
///
/// `option_ids` and `group_ids` have equal length and are each sorted
/// ascending on their own, so position `i` of one list does not necessarily
/// belong to position `i` of the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord<T> {
    pub variant_id: VariantId,
    pub option_ids: Vec<OptionId>,
    pub group_ids: Vec<GroupId>,
    pub payload: T,
}

impl<T: Clone + PartialEq + core::fmt::Debug> ValueObject for VariantRecord<T> {}

/// A raw row contributing one configurator option of one variant.
pub trait VariantRow {
    type Payload: Clone;

    fn product_id(&self) -> ProductId;
    fn variant_id(&self) -> VariantId;
    fn option_id(&self) -> OptionId;
    fn group_id(&self) -> GroupId;
    fn payload(&self) -> Self::Payload;
}

impl VariantRow for PriceRow {
    type Payload = Decimal;

    fn product_id(&self) -> ProductId {
        self.product_id
    }

    fn variant_id(&self) -> VariantId {
        self.variant_id
    }

    fn option_id(&self) -> OptionId {
        self.option_id
    }

    fn group_id(&self) -> GroupId {
        self.group_id
    }

    fn payload(&self) -> Decimal {
        self.price
    }
}

impl VariantRow for AvailabilityRow {
    type Payload = bool;

    fn product_id(&self) -> ProductId {
        self.product_id
    }

    fn variant_id(&self) -> VariantId {
        self.variant_id
    }

    fn option_id(&self) -> OptionId {
        self.option_id
    }

    fn group_id(&self) -> GroupId {
        self.group_id
    }

    fn payload(&self) -> bool {
        self.available
    }
}

/// Variant records grouped by product.
///
/// Variants appear in the order their first row was seen. A variant without
/// rows (inactive, filtered by the price rules) is simply absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantIndex<T> {
    products: BTreeMap<ProductId, Vec<VariantRecord<T>>>,
}

/// Cheapest-price index (unbounded tier, one pricing context).
pub type PriceIndex = VariantIndex<Decimal>;

/// Stock availability index.
pub type AvailabilityIndex = VariantIndex<bool>;

impl<T: Clone> VariantIndex<T> {
    pub fn from_rows<R>(rows: &[R]) -> Self
    where
        R: VariantRow<Payload = T>,
    {
        let mut products: BTreeMap<ProductId, Vec<VariantRecord<T>>> = BTreeMap::new();
        let mut positions: HashMap<(ProductId, VariantId), usize> = HashMap::new();

        for row in rows {
            let records = products.entry(row.product_id()).or_default();
            let position = *positions
                .entry((row.product_id(), row.variant_id()))
                .or_insert_with(|| {
                    records.push(VariantRecord {
                        variant_id: row.variant_id(),
                        option_ids: Vec::new(),
                        group_ids: Vec::new(),
                        payload: row.payload(),
                    });
                    records.len() - 1
                });

            let record = &mut records[position];
            record.payload = row.payload();
            record.option_ids.push(row.option_id());
            record.group_ids.push(row.group_id());
        }

        for record in products.values_mut().flatten() {
            record.option_ids.sort();
            record.group_ids.sort();
        }

        Self { products }
    }

    /// Records of one product; `None` when the product had no rows.
    pub fn records(&self, product_id: ProductId) -> Option<&[VariantRecord<T>]> {
        self.products.get(&product_id).map(Vec::as_slice)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.products.contains_key(&product_id)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.keys().copied()
    }

    /// Number of indexed products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
