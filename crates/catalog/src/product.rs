//! Products as seen by a listing batch and by the search index.

use serde::{Deserialize, Serialize};

use facetry_core::{DomainResult, ProductId, VariantId};

use crate::configurator::OptionGroup;
use crate::subset::OptionCombination;

/// A product as it appears in a listing batch: identified by its main variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProduct {
    pub id: ProductId,
    pub variant_id: VariantId,
    /// Order number of the variant; listing results are keyed by it.
    pub number: String,
}

impl ListProduct {
    pub fn new(id: ProductId, variant_id: VariantId, number: impl Into<String>) -> Self {
        Self {
            id,
            variant_id,
            number: number.into(),
        }
    }
}

/// The search-index view of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedProduct {
    pub number: String,
    /// The variant's own configuration: each group carries the selected option only.
    pub configuration: Vec<OptionGroup>,
    /// Every group of the product with every option.
    pub full_configuration: Vec<OptionGroup>,
    /// Purchasable option combinations, dash-joined option ids (`"100-200"`).
    pub available_combinations: Vec<String>,
}

impl IndexedProduct {
    /// Parses the available combinations; a non-integral id is a configuration error.
    pub fn parsed_available_combinations(&self) -> DomainResult<Vec<OptionCombination>> {
        self.available_combinations
            .iter()
            .map(|raw| raw.parse())
            .collect()
    }
}
