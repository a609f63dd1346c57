//! Structured listing keys.
//!
//! Listing results are keyed by group subsets (`g10-20`) and facet visibility
//! is decided on option combinations (`100-200`). Both are stored as sorted id
//! sequences; the dash-joined strings only exist at the `Display` / serde
//! boundary.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use facetry_core::{DomainError, GroupId, OptionId, ValueObject};

const SUBSET_PREFIX: char = 'g';
const SEPARATOR: char = '-';

/// A non-empty set of configurator group ids, kept sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupSubset(Vec<GroupId>);

impl GroupSubset {
    /// Builds a subset from arbitrary ids; `None` when no id is given.
    pub fn from_ids(ids: impl IntoIterator<Item = GroupId>) -> Option<Self> {
        let mut ids: Vec<GroupId> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            None
        } else {
            Some(Self(ids))
        }
    }

    pub fn ids(&self) -> &[GroupId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; subsets are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, group_id: GroupId) -> bool {
        self.0.binary_search(&group_id).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.0.iter().copied()
    }
}

impl ValueObject for GroupSubset {}

impl fmt::Display for GroupSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SUBSET_PREFIX}")?;
        write_joined(f, &self.0)
    }
}

impl FromStr for GroupSubset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix(SUBSET_PREFIX).ok_or_else(|| {
            DomainError::configuration(format!("group subset key {s:?} must start with '{SUBSET_PREFIX}'"))
        })?;

        let ids = body
            .split(SEPARATOR)
            .map(str::parse::<GroupId>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::configuration(format!("group subset key {s:?}: {e}")))?;

        Self::from_ids(ids)
            .ok_or_else(|| DomainError::configuration(format!("group subset key {s:?} is empty")))
    }
}

impl Serialize for GroupSubset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupSubset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A sorted sequence of option ids, one per configurator group it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionCombination(Vec<OptionId>);

impl OptionCombination {
    pub fn from_ids(ids: impl IntoIterator<Item = OptionId>) -> Self {
        let mut ids: Vec<OptionId> = ids.into_iter().collect();
        ids.sort();
        Self(ids)
    }

    pub fn ids(&self) -> &[OptionId] {
        &self.0
    }

    /// A copy of this combination extended by one option, re-sorted.
    pub fn with(&self, option_id: OptionId) -> Self {
        Self::from_ids(self.0.iter().copied().chain(core::iter::once(option_id)))
    }

    pub fn to_set(&self) -> BTreeSet<OptionId> {
        self.0.iter().copied().collect()
    }
}

impl ValueObject for OptionCombination {}

impl fmt::Display for OptionCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

impl FromStr for OptionCombination {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ids = s
            .split(SEPARATOR)
            .map(str::parse::<OptionId>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::configuration(format!("option combination {s:?}: {e}")))?;
        Ok(Self::from_ids(ids))
    }
}

impl Serialize for OptionCombination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OptionCombination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, ids: &[T]) -> fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            write!(f, "{SEPARATOR}")?;
        }
        write!(f, "{id}")?;
    }
    Ok(())
}
