//! Facet visibility of variants in expanded listings.
//!
//! Every subset of the facet's expand groups forms one partition. Inside a
//! partition the partition's own groups contribute all of their options,
//! every other group only its first option that still leads to a purchasable
//! combination. A variant is visible in a partition when its own option
//! combination is among the partition's combinations.

use std::collections::{BTreeMap, BTreeSet};

use facetry_catalog::{GroupSubset, OptionCombination, OptionGroup};
use facetry_core::{GroupId, OptionId};

use crate::combinations::combinations;

/// Partition key → option combinations listed in that partition.
pub type Splitting = BTreeMap<GroupSubset, Vec<OptionCombination>>;

/// Role of a configurator group inside one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    /// Expand group of the current partition: all options are combined.
    Expanded,
    /// Expand group outside the current partition: first fitting option only.
    Pinned,
    /// Group the facet never expands: first fitting option only.
    NeverExpanded,
}

impl GroupRole {
    fn of(group_id: GroupId, partition: &GroupSubset, expand_group_ids: &BTreeSet<GroupId>) -> Self {
        if partition.contains(group_id) {
            Self::Expanded
        } else if expand_group_ids.contains(&group_id) {
            Self::Pinned
        } else {
            Self::NeverExpanded
        }
    }

    pub fn first_option_only(self) -> bool {
        !matches!(self, Self::Expanded)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Expanded => 0,
            Self::Pinned => 1,
            Self::NeverExpanded => 2,
        }
    }
}

/// Purchasable option combinations of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableCombinations(Vec<BTreeSet<OptionId>>);

impl AvailableCombinations {
    pub fn new(combinations: &[OptionCombination]) -> Self {
        Self(combinations.iter().map(OptionCombination::to_set).collect())
    }

    /// Whether some purchasable combination contains every option of `candidate`.
    pub fn admits(&self, candidate: &OptionCombination) -> bool {
        self.0
            .iter()
            .any(|available| candidate.ids().iter().all(|id| available.contains(id)))
    }
}

/// Builds one partition per non-empty subset of the expand groups present in `groups`.
pub fn split(
    groups: &[OptionGroup],
    available: &AvailableCombinations,
    expand_group_ids: &BTreeSet<GroupId>,
) -> Splitting {
    let expandable = groups
        .iter()
        .map(|group| group.id)
        .filter(|id| expand_group_ids.contains(id));

    combinations(expandable)
        .into_iter()
        .map(|partition| {
            let plan = partition_plan(groups, &partition, expand_group_ids);
            let listed = nested_combinations(&plan, available);
            tracing::trace!(partition = %partition, combinations = listed.len(), "partition built");
            (partition, listed)
        })
        .collect()
}

/// Visibility of the variant described by `configuration` in every partition.
pub fn visibility(splitting: &Splitting, configuration: &[OptionGroup]) -> BTreeMap<GroupSubset, bool> {
    let own = OptionCombination::from_ids(
        configuration
            .iter()
            .flat_map(|group| group.options.iter().map(|option| option.id)),
    );

    splitting
        .iter()
        .map(|(partition, listed)| (partition.clone(), listed.contains(&own)))
        .collect()
}

/// Working order of a partition: expanded groups by id, then pinned and
/// never-expanded groups in declared order.
fn partition_plan<'a>(
    groups: &'a [OptionGroup],
    partition: &GroupSubset,
    expand_group_ids: &BTreeSet<GroupId>,
) -> Vec<(&'a OptionGroup, GroupRole)> {
    let mut plan: Vec<(&OptionGroup, GroupRole)> = groups
        .iter()
        .map(|group| (group, GroupRole::of(group.id, partition, expand_group_ids)))
        .collect();

    plan.sort_by_key(|(group, role)| match role {
        GroupRole::Expanded => (role.rank(), group.id),
        _ => (role.rank(), GroupId::new(0)),
    });
    plan
}

fn nested_combinations(
    plan: &[(&OptionGroup, GroupRole)],
    available: &AvailableCombinations,
) -> Vec<OptionCombination> {
    let mut result = vec![OptionCombination::default()];

    for (group, role) in plan {
        let options = group.sorted_option_ids();
        let mut next = Vec::new();

        for partial in &result {
            for option_id in &options {
                let candidate = partial.with(*option_id);
                if !available.admits(&candidate) {
                    continue;
                }
                next.push(candidate);
                if role.first_option_only() {
                    break;
                }
            }
        }

        // A group nothing fits is skipped instead of emptying the partition.
        if next.is_empty() {
            continue;
        }
        result = next;
    }

    result
}
