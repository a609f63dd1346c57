//! Listing variation loader: per-batch prices, availability and visibility.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use thiserror::Error;

use facetry_catalog::{
    CustomerGroupKey, GroupSubset, IndexedProduct, ListProduct, OptionGroup, Shop, VariantFacet,
    expand_set,
};
use facetry_core::{DomainError, DomainResult, GroupId};

use crate::aggregate::CombinationAggregator;
use crate::combinations::bounded_combinations;
use crate::fanout::fanout;
use crate::index::{AvailabilityIndex, PriceIndex, VariantIndex, VariantRecord};
use crate::source::{ContextFactory, IdentifierSelector, ListingDataSource, SourceError};
use crate::splitting::{AvailableCombinations, split, visibility};

/// Variant configurations of a batch, keyed by variant number.
pub type Configurations = BTreeMap<String, Vec<OptionGroup>>;

/// Cheapest price per group subset.
pub type SubsetPrices = BTreeMap<GroupSubset, Decimal>;

/// variant number → `"<customerGroup>_<currencyId>"` → subset prices.
pub type ListingPrices = BTreeMap<String, BTreeMap<String, SubsetPrices>>;

/// variant number → subset availability.
pub type ListingAvailability = BTreeMap<String, BTreeMap<GroupSubset, bool>>;

/// Partition → whether the variant is listed in it.
pub type ListingVisibility = BTreeMap<GroupSubset, bool>;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("listing data source failed: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Upper bound on configurator groups per product (subset count is 2^n - 1).
    /// Products above it are logged and left out of the results.
    pub max_groups: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { max_groups: 12 }
    }
}

pub struct ListingVariationLoader<S, I, C> {
    source: S,
    identifiers: I,
    contexts: C,
    options: LoaderOptions,
}

impl<S, I, C> ListingVariationLoader<S, I, C>
where
    S: ListingDataSource,
    I: IdentifierSelector,
    C: ContextFactory,
{
    pub fn new(source: S, identifiers: I, contexts: C) -> Self {
        Self {
            source,
            identifiers,
            contexts,
            options: LoaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> LoaderOptions {
        self.options
    }

    /// Cheapest prices per group subset for every customer group and shop currency.
    ///
    /// Prices are aggregated once per customer group in the shop's own
    /// currency and then converted into every currency of the shop (or of its
    /// main shop).
    #[tracing::instrument(skip_all, fields(shop_id = %shop.id, products = products.len()))]
    pub fn listing_prices(
        &self,
        shop: &Shop,
        products: &[ListProduct],
        configurations: &Configurations,
        facet: Option<&VariantFacet>,
    ) -> Result<ListingPrices, LoaderError> {
        let expand_group_ids = expand_set(facet);
        let customer_groups = self.identifiers.customer_group_keys()?;

        let mut by_customer_group: BTreeMap<CustomerGroupKey, BTreeMap<String, SubsetPrices>> =
            BTreeMap::new();

        for key in fanout(shop.id, &customer_groups, &[shop.currency.id]) {
            let context = self.contexts.create_context(&key)?;
            let rows = self.source.fetch_price_rows(products, &context)?;
            let index = PriceIndex::from_rows(&rows);
            tracing::debug!(
                customer_group = %context.customer_group,
                rows = rows.len(),
                priced_products = index.len(),
                "price rows fetched"
            );

            for product in products {
                let Some((configuration, records)) = batch_entry(product, configurations, &index) else {
                    continue;
                };
                let Some(subsets) = self.subsets(product, configuration) else {
                    continue;
                };
                let prices = CombinationAggregator::new(configuration, &expand_group_ids)
                    .cheapest_prices(records, &subsets);

                by_customer_group
                    .entry(context.customer_group.clone())
                    .or_default()
                    .insert(product.number.clone(), prices);
            }
        }

        let currencies = self.identifiers.shop_currency_ids(shop.currency_shop_id())?;
        let mut calculated = ListingPrices::new();

        for key in fanout(shop.id, &customer_groups, &currencies) {
            let Some(customer_prices) = by_customer_group.get(&key.customer_group) else {
                continue;
            };
            let context = self.contexts.create_context(&key)?;
            let price_key = context.price_key();

            for (number, prices) in customer_prices {
                let converted = prices
                    .iter()
                    .map(|(subset, price)| context.convert(*price).map(|converted| (subset.clone(), converted)))
                    .collect::<DomainResult<SubsetPrices>>();
                let converted = match converted {
                    Ok(converted) => converted,
                    Err(err) => {
                        tracing::warn!(%number, %price_key, error = %err, "price conversion failed, skipping");
                        continue;
                    }
                };
                calculated
                    .entry(number.clone())
                    .or_default()
                    .insert(price_key.clone(), converted);
            }
        }

        Ok(calculated)
    }

    /// Availability per group subset for every product of the batch.
    #[tracing::instrument(skip_all, fields(products = products.len()))]
    pub fn availability(
        &self,
        products: &[ListProduct],
        configurations: &Configurations,
        facet: Option<&VariantFacet>,
    ) -> Result<ListingAvailability, LoaderError> {
        let expand_group_ids = expand_set(facet);
        let rows = self.source.fetch_availability_rows(products)?;
        let index = AvailabilityIndex::from_rows(&rows);

        let mut result = ListingAvailability::new();
        for product in products {
            let Some((configuration, records)) = batch_entry(product, configurations, &index) else {
                continue;
            };
            let Some(subsets) = self.subsets(product, configuration) else {
                continue;
            };
            let availability = CombinationAggregator::new(configuration, &expand_group_ids)
                .availability(records, &subsets);
            result.insert(product.number.clone(), availability);
        }

        Ok(result)
    }

    /// Which expand partitions list this variant.
    #[tracing::instrument(skip_all, fields(number = %product.number))]
    pub fn visibility(
        &self,
        product: &IndexedProduct,
        facet: &VariantFacet,
    ) -> Result<ListingVisibility, LoaderError> {
        let expandable: BTreeSet<GroupId> = product
            .full_configuration
            .iter()
            .map(|group| group.id)
            .filter(|id| facet.expands(*id))
            .collect();
        if expandable.len() > self.options.max_groups {
            tracing::warn!(
                number = %product.number,
                expand_groups = expandable.len(),
                max_groups = self.options.max_groups,
                "too many expand groups, skipping"
            );
            return Ok(ListingVisibility::new());
        }

        let available = AvailableCombinations::new(&product.parsed_available_combinations()?);
        let splitting = split(&product.full_configuration, &available, facet.expand_group_ids());

        Ok(visibility(&splitting, &product.configuration))
    }

    /// Group subsets of one product; `None` when it has more groups than allowed.
    fn subsets(&self, product: &ListProduct, configuration: &[OptionGroup]) -> Option<Vec<GroupSubset>> {
        match bounded_combinations(configuration.iter().map(|group| group.id), self.options.max_groups) {
            Ok(subsets) => Some(subsets),
            Err(err) => {
                tracing::warn!(number = %product.number, error = %err, "product skipped");
                None
            }
        }
    }
}

/// Configuration and records of one batch product; `None` when either is missing.
fn batch_entry<'a, T: Clone>(
    product: &ListProduct,
    configurations: &'a Configurations,
    index: &'a VariantIndex<T>,
) -> Option<(&'a [OptionGroup], &'a [VariantRecord<T>])> {
    let Some(configuration) = configurations.get(&product.number) else {
        tracing::debug!(number = %product.number, "no configuration for product, skipping");
        return None;
    };
    let Some(records) = index.records(product.id) else {
        tracing::debug!(number = %product.number, "no variant rows for product, skipping");
        return None;
    };
    Some((configuration.as_slice(), records))
}
