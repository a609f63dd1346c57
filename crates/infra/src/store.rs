//! In-memory catalog: shops, currencies, customer groups, variants and prices.
//!
//! Serves the listing loader's collaborators with the same row rules the shop
//! database applies: open-ended price tier only, active variants only, and
//! last-stock variants only while they can still be bought.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use facetry_catalog::{
    AvailabilityRow, Currency, CustomerGroupKey, ListProduct, PriceRow, PricingContext, Shop,
};
use facetry_core::{CurrencyId, Entity, GroupId, OptionId, ProductId, ShopId, VariantId, entity::sort_by_id};
use facetry_listing::{ContextFactory, ContextKey, IdentifierSelector, ListingDataSource, SourceError};

use crate::config::ListingConfig;

/// A purchasable variant with its configurator options and stock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    /// Selected option per configurator group.
    pub options: Vec<(GroupId, OptionId)>,
    pub active: bool,
    pub stock: i64,
    pub min_purchase: i64,
    /// Sold only while stock lasts.
    pub last_stock: bool,
}

impl CatalogVariant {
    /// An active variant with no stock and a minimum purchase of one.
    pub fn new(product_id: ProductId, variant_id: VariantId, options: Vec<(GroupId, OptionId)>) -> Self {
        Self {
            product_id,
            variant_id,
            options,
            active: true,
            stock: 0,
            min_purchase: 1,
            last_stock: false,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_min_purchase(mut self, min_purchase: i64) -> Self {
        self.min_purchase = min_purchase;
        self
    }

    pub fn with_last_stock(mut self) -> Self {
        self.last_stock = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn in_stock(&self) -> bool {
        self.stock >= self.min_purchase
    }

    /// Last-stock variants drop out of price listings once sold out.
    pub fn purchasable(&self) -> bool {
        !self.last_stock || self.in_stock()
    }
}

impl Entity for CatalogVariant {
    type Id = VariantId;

    fn id(&self) -> VariantId {
        self.variant_id
    }
}

/// One quantity tier of a variant's price for a customer group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPrice {
    pub variant_id: VariantId,
    pub customer_group: CustomerGroupKey,
    pub from: u32,
    /// Upper quantity bound; the open-ended tier carries the configured marker.
    pub to: String,
    pub price: Decimal,
}

impl CatalogPrice {
    pub fn new(
        variant_id: VariantId,
        customer_group: CustomerGroupKey,
        from: u32,
        to: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            variant_id,
            customer_group,
            from,
            to: to.into(),
            price,
        }
    }
}

#[derive(Debug, Default)]
struct Catalog {
    shops: BTreeMap<ShopId, Shop>,
    currencies: BTreeMap<CurrencyId, Currency>,
    shop_currencies: BTreeMap<ShopId, Vec<CurrencyId>>,
    customer_groups: Vec<CustomerGroupKey>,
    /// Ascending by variant id.
    variants: Vec<CatalogVariant>,
    prices: Vec<CatalogPrice>,
}

impl Catalog {
    fn variants_of<'a>(&'a self, products: &[ListProduct]) -> impl Iterator<Item = &'a CatalogVariant> + 'a {
        let product_ids: BTreeSet<ProductId> = products.iter().map(|p| p.id).collect();
        self.variants
            .iter()
            .filter(move |variant| variant.active && product_ids.contains(&variant.product_id))
    }

    fn unbounded_price(&self, variant_id: VariantId, customer_group: &CustomerGroupKey, tier: &str) -> Option<Decimal> {
        self.prices
            .iter()
            .find(|p| p.variant_id == variant_id && &p.customer_group == customer_group && p.to == tier)
            .map(|p| p.price)
    }
}

/// Thread-safe in-memory catalog for tests/dev.
#[derive(Debug)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Catalog>,
    fallback_customer_group: CustomerGroupKey,
    unbounded_price_tier: String,
}

impl InMemoryCatalogStore {
    pub fn new(config: &ListingConfig) -> Self {
        Self {
            inner: RwLock::new(Catalog::default()),
            fallback_customer_group: config.fallback_customer_group.clone(),
            unbounded_price_tier: config.unbounded_price_tier.clone(),
        }
    }

    /// Registers a shop together with its default currency.
    pub fn add_shop(&self, shop: Shop) {
        if let Ok(mut catalog) = self.inner.write() {
            let currency = shop.currency.clone();
            catalog.currencies.entry(currency.id).or_insert(currency.clone());
            let assigned = catalog.shop_currencies.entry(shop.id).or_default();
            if !assigned.contains(&currency.id) {
                assigned.push(currency.id);
            }
            catalog.shops.insert(shop.id, shop);
        }
    }

    pub fn add_currency(&self, currency: Currency) {
        if let Ok(mut catalog) = self.inner.write() {
            catalog.currencies.insert(currency.id, currency);
        }
    }

    /// Makes a currency selectable in a shop.
    pub fn assign_currency(&self, shop_id: ShopId, currency_id: CurrencyId) {
        if let Ok(mut catalog) = self.inner.write() {
            let assigned = catalog.shop_currencies.entry(shop_id).or_default();
            if !assigned.contains(&currency_id) {
                assigned.push(currency_id);
            }
        }
    }

    pub fn add_customer_group(&self, key: CustomerGroupKey) {
        if let Ok(mut catalog) = self.inner.write() {
            if !catalog.customer_groups.contains(&key) {
                catalog.customer_groups.push(key);
            }
        }
    }

    /// Inserts or replaces a variant.
    pub fn upsert_variant(&self, variant: CatalogVariant) {
        if let Ok(mut catalog) = self.inner.write() {
            catalog.variants.retain(|v| v.variant_id != variant.variant_id);
            catalog.variants.push(variant);
            sort_by_id(&mut catalog.variants);
        }
    }

    pub fn add_price(&self, price: CatalogPrice) {
        if let Ok(mut catalog) = self.inner.write() {
            catalog.prices.push(price);
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Catalog>, String> {
        self.inner.read().map_err(|_| "catalog lock poisoned".to_string())
    }
}

impl ListingDataSource for InMemoryCatalogStore {
    fn fetch_price_rows(
        &self,
        products: &[ListProduct],
        context: &PricingContext,
    ) -> Result<Vec<PriceRow>, SourceError> {
        let catalog = self.read().map_err(SourceError::Prices)?;
        let tier = self.unbounded_price_tier.as_str();

        let mut rows = Vec::new();
        for variant in catalog.variants_of(products).filter(|v| v.purchasable()) {
            let price = catalog
                .unbounded_price(variant.variant_id, &context.customer_group, tier)
                .or_else(|| catalog.unbounded_price(variant.variant_id, &context.fallback_customer_group, tier));
            let Some(price) = price else {
                continue;
            };

            rows.extend(variant.options.iter().map(|(group_id, option_id)| PriceRow {
                product_id: variant.product_id,
                variant_id: variant.variant_id,
                price,
                option_id: *option_id,
                group_id: *group_id,
            }));
        }

        Ok(rows)
    }

    fn fetch_availability_rows(&self, products: &[ListProduct]) -> Result<Vec<AvailabilityRow>, SourceError> {
        let catalog = self.read().map_err(SourceError::Availability)?;

        let rows = catalog
            .variants_of(products)
            .flat_map(|variant| {
                let available = variant.in_stock();
                variant.options.iter().map(move |(group_id, option_id)| AvailabilityRow {
                    product_id: variant.product_id,
                    variant_id: variant.variant_id,
                    available,
                    option_id: *option_id,
                    group_id: *group_id,
                })
            })
            .collect();

        Ok(rows)
    }
}

impl IdentifierSelector for InMemoryCatalogStore {
    fn shop_currency_ids(&self, shop_id: ShopId) -> Result<Vec<CurrencyId>, SourceError> {
        let catalog = self.read().map_err(SourceError::Identifiers)?;
        if !catalog.shops.contains_key(&shop_id) {
            return Err(SourceError::UnknownShop(shop_id));
        }
        Ok(catalog.shop_currencies.get(&shop_id).cloned().unwrap_or_default())
    }

    fn customer_group_keys(&self) -> Result<Vec<CustomerGroupKey>, SourceError> {
        let catalog = self.read().map_err(SourceError::Identifiers)?;
        Ok(catalog.customer_groups.clone())
    }
}

impl ContextFactory for InMemoryCatalogStore {
    fn create_context(&self, key: &ContextKey) -> Result<PricingContext, SourceError> {
        let catalog = self.read().map_err(SourceError::Identifiers)?;

        if !catalog.shops.contains_key(&key.shop_id) {
            return Err(SourceError::UnknownShop(key.shop_id));
        }
        let currency = catalog
            .currencies
            .get(&key.currency_id)
            .cloned()
            .ok_or(SourceError::UnknownCurrency(key.currency_id))?;
        if !catalog.customer_groups.contains(&key.customer_group) {
            return Err(SourceError::UnknownCustomerGroup(key.customer_group.clone()));
        }

        Ok(PricingContext {
            shop_id: key.shop_id,
            currency,
            customer_group: key.customer_group.clone(),
            fallback_customer_group: self.fallback_customer_group.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT: ProductId = ProductId::new(1);

    fn ek() -> CustomerGroupKey {
        CustomerGroupKey::new("EK")
    }

    fn h() -> CustomerGroupKey {
        CustomerGroupKey::new("H")
    }

    fn euro() -> Currency {
        Currency::new(CurrencyId::new(1), Decimal::ONE)
    }

    fn variant(id: u64, options: &[(u64, u64)]) -> CatalogVariant {
        CatalogVariant::new(
            PRODUCT,
            VariantId::new(id),
            options
                .iter()
                .map(|(g, o)| (GroupId::new(*g), OptionId::new(*o)))
                .collect(),
        )
    }

    fn unbounded(variant: u64, group: CustomerGroupKey, price: i64) -> CatalogPrice {
        CatalogPrice::new(VariantId::new(variant), group, 1, "beliebig", Decimal::from(price))
    }

    fn store() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new(&ListingConfig::default());
        store.add_shop(Shop::main(ShopId::new(1), euro()));
        store.add_customer_group(ek());
        store.add_customer_group(h());
        store
    }

    fn batch() -> Vec<ListProduct> {
        vec![ListProduct::new(PRODUCT, VariantId::new(11), "SW-1")]
    }

    fn context(store: &InMemoryCatalogStore, group: CustomerGroupKey) -> PricingContext {
        store
            .create_context(&ContextKey {
                shop_id: ShopId::new(1),
                customer_group: group,
                currency_id: CurrencyId::new(1),
            })
            .unwrap()
    }

    fn priced_variants(rows: &[PriceRow]) -> Vec<(u64, Decimal)> {
        let mut seen: Vec<(u64, Decimal)> = rows.iter().map(|r| (r.variant_id.get(), r.price)).collect();
        seen.dedup();
        seen
    }

    #[test]
    fn one_price_row_per_option() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100), (20, 200)]).with_stock(5));
        store.add_price(unbounded(11, ek(), 5));

        let rows = store.fetch_price_rows(&batch(), &context(&store, ek())).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].option_id, OptionId::new(100));
        assert_eq!(rows[1].group_id, GroupId::new(20));
        assert!(rows.iter().all(|r| r.price == Decimal::from(5)));
    }

    #[test]
    fn only_the_open_ended_tier_is_used() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]));
        store.add_price(CatalogPrice::new(VariantId::new(11), ek(), 1, "9", Decimal::from(9)));
        store.add_price(CatalogPrice::new(VariantId::new(11), ek(), 10, "beliebig", Decimal::from(7)));

        let rows = store.fetch_price_rows(&batch(), &context(&store, ek())).unwrap();
        assert_eq!(priced_variants(&rows), vec![(11, Decimal::from(7))]);
    }

    #[test]
    fn missing_group_price_falls_back_to_the_fallback_group() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]));
        store.upsert_variant(variant(12, &[(10, 101)]));
        store.add_price(unbounded(11, ek(), 5));
        store.add_price(unbounded(12, ek(), 7));
        store.add_price(unbounded(12, h(), 6));

        let rows = store.fetch_price_rows(&batch(), &context(&store, h())).unwrap();
        assert_eq!(
            priced_variants(&rows),
            vec![(11, Decimal::from(5)), (12, Decimal::from(6))]
        );
    }

    #[test]
    fn unpriced_and_inactive_variants_are_left_out() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]));
        store.upsert_variant(variant(12, &[(10, 101)]).inactive());
        store.add_price(unbounded(12, ek(), 7));

        let rows = store.fetch_price_rows(&batch(), &context(&store, ek())).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn sold_out_last_stock_variants_are_not_priced() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]).with_last_stock().with_stock(0));
        store.upsert_variant(variant(12, &[(10, 101)]).with_last_stock().with_stock(3).with_min_purchase(3));
        store.upsert_variant(variant(13, &[(10, 102)]).with_stock(0));
        for v in [11, 12, 13] {
            store.add_price(unbounded(v, ek(), v as i64));
        }

        let rows = store.fetch_price_rows(&batch(), &context(&store, ek())).unwrap();
        assert_eq!(
            priced_variants(&rows),
            vec![(12, Decimal::from(12)), (13, Decimal::from(13))]
        );
    }

    #[test]
    fn rows_follow_variant_id_order() {
        let store = store();
        store.upsert_variant(variant(13, &[(10, 102)]));
        store.upsert_variant(variant(11, &[(10, 100)]));
        for v in [11, 13] {
            store.add_price(unbounded(v, ek(), 1));
        }

        let rows = store.fetch_price_rows(&batch(), &context(&store, ek())).unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.variant_id.get()).collect();
        assert_eq!(ids, vec![11, 13]);
    }

    #[test]
    fn availability_compares_stock_with_minimum_purchase() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]).with_stock(1).with_min_purchase(2));
        store.upsert_variant(variant(12, &[(10, 101)]).with_stock(2).with_min_purchase(2));
        store.upsert_variant(variant(13, &[(10, 102)]).with_stock(9).inactive());

        let rows = store.fetch_availability_rows(&batch()).unwrap();
        let flags: Vec<(u64, bool)> = rows.iter().map(|r| (r.variant_id.get(), r.available)).collect();
        assert_eq!(flags, vec![(11, false), (12, true)]);
    }

    #[test]
    fn other_products_are_not_fetched() {
        let store = store();
        store.upsert_variant(CatalogVariant::new(
            ProductId::new(2),
            VariantId::new(21),
            vec![(GroupId::new(10), OptionId::new(100))],
        ));

        assert!(store.fetch_availability_rows(&batch()).unwrap().is_empty());
    }

    #[test]
    fn shop_currencies_include_the_default_currency() {
        let store = store();
        store.add_currency(Currency::new(CurrencyId::new(2), "1.5".parse().unwrap()));
        store.assign_currency(ShopId::new(1), CurrencyId::new(2));
        store.assign_currency(ShopId::new(1), CurrencyId::new(2));

        assert_eq!(
            store.shop_currency_ids(ShopId::new(1)).unwrap(),
            vec![CurrencyId::new(1), CurrencyId::new(2)]
        );
        assert_eq!(
            store.shop_currency_ids(ShopId::new(9)),
            Err(SourceError::UnknownShop(ShopId::new(9)))
        );
    }

    #[test]
    fn contexts_require_known_coordinates() {
        let store = store();
        let key = |shop: u64, group: &str, currency: u64| ContextKey {
            shop_id: ShopId::new(shop),
            customer_group: CustomerGroupKey::new(group),
            currency_id: CurrencyId::new(currency),
        };

        let context = store.create_context(&key(1, "H", 1)).unwrap();
        assert_eq!(context.customer_group, h());
        assert_eq!(context.fallback_customer_group, ek());
        assert_eq!(context.currency, euro());

        assert_eq!(store.create_context(&key(2, "H", 1)), Err(SourceError::UnknownShop(ShopId::new(2))));
        assert_eq!(
            store.create_context(&key(1, "H", 3)),
            Err(SourceError::UnknownCurrency(CurrencyId::new(3)))
        );
        assert_eq!(
            store.create_context(&key(1, "X", 1)),
            Err(SourceError::UnknownCustomerGroup(CustomerGroupKey::new("X")))
        );
    }

    #[test]
    fn upsert_replaces_a_variant() {
        let store = store();
        store.upsert_variant(variant(11, &[(10, 100)]).with_stock(0));
        store.upsert_variant(variant(11, &[(10, 100)]).with_stock(4));

        let rows = store.fetch_availability_rows(&batch()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].available);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: only active variants are fetched, and only purchasable ones are priced.
            #[test]
            fn rows_respect_activity_and_stock_rules(
                raw in proptest::collection::vec((any::<bool>(), 0i64..5, 1i64..4, any::<bool>()), 1..12)
            ) {
                let store = store();
                let variants: Vec<CatalogVariant> = raw
                    .iter()
                    .enumerate()
                    .map(|(i, (active, stock, min_purchase, last_stock))| {
                        let mut v = variant(i as u64 + 1, &[(10, 100 + i as u64), (20, 200)])
                            .with_stock(*stock)
                            .with_min_purchase(*min_purchase);
                        v.active = *active;
                        v.last_stock = *last_stock;
                        v
                    })
                    .collect();
                for v in &variants {
                    store.upsert_variant(v.clone());
                    store.add_price(unbounded(v.variant_id.get(), ek(), 10));
                }

                let priced: Vec<u64> = priced_variants(
                    &store.fetch_price_rows(&batch(), &context(&store, h())).unwrap(),
                )
                .into_iter()
                .map(|(id, _)| id)
                .collect();
                let expected: Vec<u64> = variants
                    .iter()
                    .filter(|v| v.active && v.purchasable())
                    .map(|v| v.variant_id.get())
                    .collect();
                prop_assert_eq!(priced, expected);

                let rows = store.fetch_availability_rows(&batch()).unwrap();
                prop_assert_eq!(rows.len(), 2 * variants.iter().filter(|v| v.active).count());
                for row in &rows {
                    let v = &variants[row.variant_id.get() as usize - 1];
                    prop_assert_eq!(row.available, v.stock >= v.min_purchase);
                }
            }
        }
    }
}
