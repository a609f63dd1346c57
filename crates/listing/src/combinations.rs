//! Group subset enumeration.

use std::collections::BTreeSet;

use facetry_catalog::GroupSubset;
use facetry_core::{DomainError, DomainResult, GroupId};

/// Every non-empty subset of `ids`.
///
/// Results are grown from the empty seed: each new id is merged with every
/// subset built so far. Duplicate input ids are collapsed first, so `n`
/// distinct ids always yield `2^n - 1` subsets.
pub fn combinations(ids: impl IntoIterator<Item = GroupId>) -> Vec<GroupSubset> {
    let mut seen = BTreeSet::new();
    let unique: Vec<GroupId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

    let mut results: Vec<Vec<GroupId>> = vec![Vec::new()];
    for id in unique {
        let grown: Vec<Vec<GroupId>> = results
            .iter()
            .map(|existing| {
                let mut next = Vec::with_capacity(existing.len() + 1);
                next.push(id);
                next.extend_from_slice(existing);
                next
            })
            .collect();
        results.extend(grown);
    }

    results.into_iter().filter_map(GroupSubset::from_ids).collect()
}

/// [`combinations`], refusing inputs with more than `max_groups` distinct ids.
pub fn bounded_combinations(
    ids: impl IntoIterator<Item = GroupId>,
    max_groups: usize,
) -> DomainResult<Vec<GroupSubset>> {
    let unique: BTreeSet<GroupId> = ids.into_iter().collect();
    if unique.len() > max_groups {
        return Err(DomainError::configuration(format!(
            "{} configurator groups exceed the limit of {max_groups}",
            unique.len()
        )));
    }
    Ok(combinations(unique))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(raw: &[u64]) -> Vec<GroupId> {
        raw.iter().copied().map(GroupId::new).collect()
    }

    fn rendered(subsets: &[GroupSubset]) -> Vec<String> {
        subsets.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn three_groups_yield_seven_subsets() {
        let subsets = combinations(ids(&[1, 2, 3]));
        assert_eq!(subsets.len(), 7);

        let unique: HashSet<_> = subsets.iter().cloned().collect();
        assert_eq!(unique.len(), 7);
        assert_eq!(
            rendered(&subsets),
            vec!["g1", "g2", "g1-2", "g3", "g1-3", "g2-3", "g1-2-3"]
        );
    }

    #[test]
    fn no_groups_yield_no_subsets() {
        assert!(combinations(Vec::new()).is_empty());
    }

    #[test]
    fn duplicate_ids_are_collapsed() {
        assert_eq!(rendered(&combinations(ids(&[5, 5, 6]))), vec!["g5", "g6", "g5-6"]);
    }

    #[test]
    fn enumeration_is_deterministic() {
        assert_eq!(combinations(ids(&[30, 10, 20])), combinations(ids(&[30, 10, 20])));
    }

    #[test]
    fn bounded_combinations_rejects_too_many_groups() {
        let err = bounded_combinations(ids(&[1, 2, 3]), 2).unwrap_err();
        match err {
            DomainError::Configuration(msg) => assert!(msg.contains("limit of 2")),
            _ => panic!("Expected Configuration error"),
        }

        assert_eq!(bounded_combinations(ids(&[1, 2]), 2).unwrap().len(), 3);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: n distinct ids yield exactly 2^n - 1 distinct non-empty subsets.
            #[test]
            fn subset_count_is_two_to_the_n_minus_one(raw in proptest::collection::btree_set(1u64..1000, 0..8)) {
                let subsets = combinations(raw.iter().copied().map(GroupId::new));
                let expected = (1usize << raw.len()) - 1;

                prop_assert_eq!(subsets.len(), expected);
                let unique: HashSet<_> = subsets.iter().cloned().collect();
                prop_assert_eq!(unique.len(), expected);
                prop_assert!(subsets.iter().all(|s| !s.is_empty()));
                prop_assert!(subsets
                    .iter()
                    .all(|s| s.iter().all(|id| raw.contains(&id.get()))));
            }
        }
    }
}
