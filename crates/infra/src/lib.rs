//! Infrastructure layer: configuration and in-memory catalog collaborators.

pub mod config;
pub mod store;


pub use config::{ConfigError, ListingConfig};
pub use store::{CatalogPrice, CatalogVariant, InMemoryCatalogStore};
