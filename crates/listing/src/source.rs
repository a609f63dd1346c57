//! Collaborators supplying already-fetched catalog data.
//!
//! Implementations fetch rows once per product batch. A failing fetch is an
//! error, never an empty result.

use std::sync::Arc;

use thiserror::Error;

use facetry_catalog::{AvailabilityRow, CustomerGroupKey, ListProduct, PriceRow, PricingContext};
use facetry_core::{CurrencyId, ShopId};

use crate::fanout::ContextKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("price rows unavailable: {0}")]
    Prices(String),

    #[error("availability rows unavailable: {0}")]
    Availability(String),

    #[error("unknown shop: {0}")]
    UnknownShop(ShopId),

    #[error("unknown currency: {0}")]
    UnknownCurrency(CurrencyId),

    #[error("unknown customer group: {0}")]
    UnknownCustomerGroup(CustomerGroupKey),

    #[error("identifier lookup failed: {0}")]
    Identifiers(String),
}

/// Price and stock rows for a product batch.
pub trait ListingDataSource {
    /// Unbounded-tier price rows of active, purchasable variants for `context`.
    fn fetch_price_rows(
        &self,
        products: &[ListProduct],
        context: &PricingContext,
    ) -> Result<Vec<PriceRow>, SourceError>;

    /// Availability rows of active variants.
    fn fetch_availability_rows(&self, products: &[ListProduct]) -> Result<Vec<AvailabilityRow>, SourceError>;
}

/// Shop and customer group identifiers.
pub trait IdentifierSelector {
    fn shop_currency_ids(&self, shop_id: ShopId) -> Result<Vec<CurrencyId>, SourceError>;
    fn customer_group_keys(&self) -> Result<Vec<CustomerGroupKey>, SourceError>;
}

/// Resolves context coordinates into a full pricing context.
pub trait ContextFactory {
    fn create_context(&self, key: &ContextKey) -> Result<PricingContext, SourceError>;
}

impl<S> ListingDataSource for Arc<S>
where
    S: ListingDataSource + ?Sized,
{
    fn fetch_price_rows(
        &self,
        products: &[ListProduct],
        context: &PricingContext,
    ) -> Result<Vec<PriceRow>, SourceError> {
        (**self).fetch_price_rows(products, context)
    }

    fn fetch_availability_rows(&self, products: &[ListProduct]) -> Result<Vec<AvailabilityRow>, SourceError> {
        (**self).fetch_availability_rows(products)
    }
}

impl<S> IdentifierSelector for Arc<S>
where
    S: IdentifierSelector + ?Sized,
{
    fn shop_currency_ids(&self, shop_id: ShopId) -> Result<Vec<CurrencyId>, SourceError> {
        (**self).shop_currency_ids(shop_id)
    }

    fn customer_group_keys(&self) -> Result<Vec<CustomerGroupKey>, SourceError> {
        (**self).customer_group_keys()
    }
}

impl<S> ContextFactory for Arc<S>
where
    S: ContextFactory + ?Sized,
{
    fn create_context(&self, key: &ContextKey) -> Result<PricingContext, SourceError> {
        (**self).create_context(key)
    }
}
