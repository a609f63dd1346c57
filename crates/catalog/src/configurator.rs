//! Configurator groups, their options and the listing facet settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use facetry_core::{Entity, GroupId, OptionId, ValueObject};

/// One selectable value of a configurator group (e.g. "Red").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguratorOption {
    pub id: OptionId,
    pub name: String,
}

impl ConfiguratorOption {
    pub fn new(id: OptionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for ConfiguratorOption {
    type Id = OptionId;

    fn id(&self) -> OptionId {
        self.id
    }
}

/// A configurator dimension (e.g. "Color") with its options in declared order.
///
/// In a variant's own configuration each group carries exactly the option
/// selected by that variant; in a product's full configuration it carries
/// every option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: GroupId,
    pub name: String,
    pub options: Vec<ConfiguratorOption>,
}

impl OptionGroup {
    pub fn new(id: GroupId, name: impl Into<String>, options: Vec<ConfiguratorOption>) -> Self {
        Self {
            id,
            name: name.into(),
            options,
        }
    }

    /// The option that represents this group when the group is pinned.
    pub fn first_option(&self) -> Option<&ConfiguratorOption> {
        self.options.first()
    }

    /// Option ids sorted ascending (stable for duplicated ids).
    pub fn sorted_option_ids(&self) -> Vec<OptionId> {
        let mut ids: Vec<OptionId> = self.options.iter().map(|o| o.id).collect();
        ids.sort();
        ids
    }
}

impl Entity for OptionGroup {
    type Id = GroupId;

    fn id(&self) -> GroupId {
        self.id
    }
}

/// Listing facet settings for configurable products.
///
/// Groups marked "expand" get one listing entry per option value instead of
/// collapsing to the cheapest / first available variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFacet {
    expand_group_ids: BTreeSet<GroupId>,
}

impl VariantFacet {
    pub fn new(expand_group_ids: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            expand_group_ids: expand_group_ids.into_iter().collect(),
        }
    }

    pub fn expand_group_ids(&self) -> &BTreeSet<GroupId> {
        &self.expand_group_ids
    }

    pub fn expands(&self, group_id: GroupId) -> bool {
        self.expand_group_ids.contains(&group_id)
    }
}

impl ValueObject for VariantFacet {}

/// Expand set of an optional facet; no facet expands nothing.
pub fn expand_set(facet: Option<&VariantFacet>) -> BTreeSet<GroupId> {
    facet
        .map(|f| f.expand_group_ids().clone())
        .unwrap_or_default()
}
