//! Value object trait: equality by value, not identity.
//!
//! Everything the listing engine derives from catalog rows (variant records,
//! subset keys, option combinations) is a value object: built once per
//! request, never mutated, compared by its attributes.

/// Marker trait for value objects.
///
/// Two value objects with the same attribute values are interchangeable. A
/// `GroupSubset` of `{10, 20}` built from rows is the same key as one parsed
/// from the string `g10-20`.
///
/// The trait requires:
/// - **Clone**: values are copied freely between indexes and result maps
/// - **PartialEq**: values are compared by their attributes
/// - **Debug**: values show up in traces and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
