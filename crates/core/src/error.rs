//! Domain error model.

use thiserror::Error;

/// Result type used across the catalog and listing layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures caused by the catalog data
/// itself (malformed identifiers, impossible configurations). Failures of the
/// data-fetch collaborators belong to the listing layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A computed value left the representable range (e.g. a price conversion).
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// An identifier was invalid (e.g. a non-integral option id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Catalog or listing configuration cannot be processed.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
