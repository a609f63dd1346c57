//! Variant listing engine.
//!
//! Turns the configurator groups of a configurable product plus the rows of
//! its purchasable variants into per-subset listing data:
//!
//! - cheapest price per group subset and pricing context ([`aggregate`])
//! - availability per group subset ([`aggregate`])
//! - facet visibility of a concrete variant ([`splitting`])
//!
//! All computation is pure and synchronous. Row fetching happens behind the
//! collaborator traits in [`source`], once per product batch.

pub mod aggregate;
pub mod combinations;
pub mod fanout;
pub mod index;
pub mod loader;
pub mod source;
pub mod splitting;

pub use aggregate::{CombinationAggregator, PinnedOptions};
pub use combinations::{bounded_combinations, combinations};
pub use fanout::{ContextKey, fanout};
pub use index::{AvailabilityIndex, PriceIndex, VariantIndex, VariantRecord, VariantRow};
pub use loader::{
    Configurations, ListingAvailability, ListingPrices, ListingVariationLoader, ListingVisibility,
    LoaderError, LoaderOptions, SubsetPrices,
};
pub use source::{ContextFactory, IdentifierSelector, ListingDataSource, SourceError};
pub use splitting::{AvailableCombinations, GroupRole, Splitting, split, visibility};
