//! Per-street aggregation state built during the first pass.

use std::collections::{BTreeSet, HashMap};

use crate::merge_indices;

/// The distinct index labels seen for one raw street name, and how many rows
/// contributed to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreetGroup {
    indices: BTreeSet<String>,
    occurrences: usize,
}

impl StreetGroup {
    /// Adds one row's index label.
    pub fn record(&mut self, index: String) {
        self.indices.insert(index);
        self.occurrences += 1;
    }

    /// Distinct labels in ascending string order.
    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.indices.iter().map(String::as_str)
    }

    /// Number of rows recorded, counting repeated labels.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// The merged label for every row of this street, or `None` if its
    /// labels cannot be merged.
    #[must_use]
    pub fn merged(&self) -> Option<String> {
        let sorted: Vec<&str> = self.indices().collect();
        merge_indices(&sorted)
    }
}

/// Street groups keyed by the raw, untrimmed street name.
#[derive(Debug, Clone, Default)]
pub(crate) struct StreetGroups {
    groups: HashMap<String, StreetGroup>,
}

impl StreetGroups {
    pub(crate) fn record(&mut self, raw_street: &str, index: String) {
        self.groups
            .entry(raw_street.to_owned())
            .or_default()
            .record(index);
    }

    pub(crate) fn get(&self, raw_street: &str) -> Option<&StreetGroup> {
        self.groups.get(raw_street)
    }

    pub(crate) fn occurrences(&self, street: &str) -> usize {
        self.get(street).map_or(0, StreetGroup::occurrences)
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }
}
