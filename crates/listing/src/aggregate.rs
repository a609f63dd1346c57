//! Cheapest price / availability per group subset.
//!
//! For every group subset the aggregator selects the variant records that
//! share the listed variant's options on the subset's expanding groups, then
//! reduces their payloads. Subsets nothing matches are left out of the result.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use facetry_catalog::{GroupSubset, OptionGroup};
use facetry_core::{GroupId, OptionId};

use crate::index::VariantRecord;

/// The option representing each group when the group is pinned: the first
/// option of the group in the listed variant's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedOptions(BTreeMap<GroupId, OptionId>);

impl PinnedOptions {
    pub fn from_configuration(configuration: &[OptionGroup]) -> Self {
        let mut pinned = BTreeMap::new();
        for group in configuration {
            match group.first_option() {
                Some(option) => {
                    pinned.insert(group.id, option.id);
                }
                None => {
                    tracing::warn!(group_id = %group.id, "configurator group without options cannot be pinned");
                }
            }
        }
        Self(pinned)
    }

    pub fn get(&self, group_id: GroupId) -> Option<OptionId> {
        self.0.get(&group_id).copied()
    }
}

/// Record filter for one group subset.
#[derive(Debug)]
struct SubsetFilter {
    /// Pinned options of the subset's expanding groups, ascending.
    expanding_options: Vec<OptionId>,
    /// Pinned options of the subset's non-expanding groups.
    pinned_options: BTreeSet<OptionId>,
}

impl SubsetFilter {
    fn new(subset: &GroupSubset, pinned: &PinnedOptions, expand_group_ids: &BTreeSet<GroupId>) -> Self {
        let mut expanding_options = Vec::new();
        let mut pinned_options = BTreeSet::new();

        for group_id in subset.iter() {
            let Some(option_id) = pinned.get(group_id) else {
                continue;
            };
            if expand_group_ids.contains(&group_id) {
                expanding_options.push(option_id);
            } else {
                pinned_options.insert(option_id);
            }
        }
        expanding_options.sort();

        Self {
            expanding_options,
            pinned_options,
        }
    }

    /// `(record options \ pinned) ∩ expanding == expanding`, compared in record order.
    fn matches<T>(&self, record: &VariantRecord<T>) -> bool {
        let remaining: Vec<OptionId> = record
            .option_ids
            .iter()
            .copied()
            .filter(|id| !self.pinned_options.contains(id))
            .filter(|id| self.expanding_options.binary_search(id).is_ok())
            .collect();

        remaining == self.expanding_options
    }
}

/// Aggregates variant records of one product over group subsets.
#[derive(Debug)]
pub struct CombinationAggregator<'a> {
    pinned: PinnedOptions,
    expand_group_ids: &'a BTreeSet<GroupId>,
}

impl<'a> CombinationAggregator<'a> {
    pub fn new(configuration: &[OptionGroup], expand_group_ids: &'a BTreeSet<GroupId>) -> Self {
        Self {
            pinned: PinnedOptions::from_configuration(configuration),
            expand_group_ids,
        }
    }

    /// Reduces the payloads of matching records per subset.
    ///
    /// `reduce` folds in record order, so ties keep the earliest record.
    pub fn aggregate<T, F>(
        &self,
        records: &[VariantRecord<T>],
        subsets: &[GroupSubset],
        mut reduce: F,
    ) -> BTreeMap<GroupSubset, T>
    where
        T: Clone,
        F: FnMut(T, T) -> T,
    {
        let mut result = BTreeMap::new();

        for subset in subsets {
            let filter = SubsetFilter::new(subset, &self.pinned, self.expand_group_ids);
            let reduced = records
                .iter()
                .filter(|record| filter.matches(record))
                .map(|record| record.payload.clone())
                .reduce(&mut reduce);

            if let Some(value) = reduced {
                result.insert(subset.clone(), value);
            }
        }

        result
    }

    /// Cheapest price per subset.
    pub fn cheapest_prices(
        &self,
        records: &[VariantRecord<Decimal>],
        subsets: &[GroupSubset],
    ) -> BTreeMap<GroupSubset, Decimal> {
        self.aggregate(records, subsets, |cheapest, price| {
            if price < cheapest { price } else { cheapest }
        })
    }

    /// Whether any matching variant is available, per subset.
    pub fn availability(
        &self,
        records: &[VariantRecord<bool>],
        subsets: &[GroupSubset],
    ) -> BTreeMap<GroupSubset, bool> {
        self.aggregate(records, subsets, |any, available| any || available)
    }
}
