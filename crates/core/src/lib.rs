//! `facetry-core` — catalog foundation building blocks.
//!
//! This crate contains **pure** primitives shared by the listing engine
//! (identifiers, the error model, marker traits). No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CurrencyId, GroupId, OptionId, ProductId, ShopId, VariantId};
pub use value_object::ValueObject;
