//! Feature sets and labeled entries.

use crate::core::error::{CompositeError, Result};
use crate::core::types::{FeatureId, Value};
use crate::sampling::similarity::tanimoto;
use serde::{Deserialize, Serialize};

/// Sorted, duplicate-free set of feature ids: a sparse binary feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FeatureId>", into = "Vec<FeatureId>")]
pub struct FeatureSet {
    ids: Vec<FeatureId>,
}

impl FeatureSet {
    /// Create a feature set from ids in any order; duplicates are dropped.
    pub fn new<I: IntoIterator<Item = FeatureId>>(ids: I) -> Self {
        let mut ids: Vec<FeatureId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        FeatureSet { ids }
    }

    /// The empty feature set.
    pub fn empty() -> Self {
        FeatureSet { ids: Vec::new() }
    }

    /// Feature ids in ascending order.
    pub fn as_slice(&self) -> &[FeatureId] {
        &self.ids
    }

    /// Number of features present.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no feature is present.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: FeatureId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Iterate over the ids in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureId> {
        self.ids.iter()
    }

    /// Tanimoto coefficient against another set.
    pub fn tanimoto(&self, other: &FeatureSet) -> f64 {
        tanimoto(&self.ids, &other.ids)
    }
}

impl From<Vec<FeatureId>> for FeatureSet {
    fn from(ids: Vec<FeatureId>) -> Self {
        FeatureSet::new(ids)
    }
}

impl From<FeatureSet> for Vec<FeatureId> {
    fn from(set: FeatureSet) -> Self {
        set.ids
    }
}

impl FromIterator<FeatureId> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureId>>(iter: I) -> Self {
        FeatureSet::new(iter)
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a FeatureId;
    type IntoIter = std::slice::Iter<'a, FeatureId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// A feature set paired with its continuous label value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    features: FeatureSet,
    value: Value,
}

impl Entry {
    /// Create an entry; the value must be finite.
    pub fn new(features: FeatureSet, value: Value) -> Result<Self> {
        if !value.is_finite() {
            return Err(CompositeError::invalid_parameter(
                "value",
                value.to_string(),
                "entry values must be finite",
            ));
        }
        Ok(Entry { features, value })
    }

    /// Feature set of the entry.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Label value of the entry.
    pub fn value(&self) -> Value {
        self.value
    }
}

impl AsRef<Entry> for Entry {
    fn as_ref(&self) -> &Entry {
        self
    }
}
