//! Catalog value types consumed by the listing engine.
//!
//! Everything here is already-fetched, read-only data: configurator groups
//! and options, shops and pricing contexts, and the raw rows handed over by
//! the price and stock collaborators.

pub mod configurator;
pub mod product;
pub mod rows;
pub mod shop;
pub mod subset;

pub use configurator::{ConfiguratorOption, OptionGroup, VariantFacet, expand_set};
pub use product::{IndexedProduct, ListProduct};
pub use rows::{AvailabilityRow, PriceRow};
pub use shop::{Currency, CustomerGroupKey, PricingContext, Shop};
pub use subset::{GroupSubset, OptionCombination};
