//! Entry collections: a mutable builder that freezes into an immutable set.

use crate::core::error::{CompositeError, Result};
use crate::core::traits::FeatureExtractor;
use crate::core::types::{FeatureId, Value};
use crate::dataset::entry::{Entry, FeatureSet};
use std::sync::Arc;

/// Immutable snapshot of training (or testing) entries.
///
/// Cloning is cheap: the entries are shared. Nothing can be added once the
/// set exists, which keeps the entry list frozen for the duration of a
/// segmentation or training run.
#[derive(Debug, Clone)]
pub struct EntrySet {
    entries: Arc<[Entry]>,
}

impl Default for EntrySet {
    fn default() -> Self {
        EntrySet::from(Vec::new())
    }
}

impl EntrySet {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Label values, in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(Entry::value).collect()
    }

    /// Lowest and highest label value, or `None` for an empty set.
    pub fn value_range(&self) -> Option<(Value, Value)> {
        self.entries.iter().fold(None, |range, e| {
            let v = e.value();
            Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }

    /// Borrow the entries at the given indices.
    pub fn select(&self, indices: &[usize]) -> Vec<&Entry> {
        indices.iter().filter_map(|&i| self.entries.get(i)).collect()
    }
}

impl FromIterator<Entry> for EntrySet {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        EntrySet {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Entry>> for EntrySet {
    fn from(entries: Vec<Entry>) -> Self {
        EntrySet {
            entries: entries.into(),
        }
    }
}

/// Accumulates entries before they are frozen into an [`EntrySet`].
#[derive(Debug, Default)]
pub struct EntrySetBuilder {
    entries: Vec<Entry>,
}

impl EntrySetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        EntrySetBuilder {
            entries: Vec::new(),
        }
    }

    /// Add an entry from raw feature ids (any order) and a value.
    pub fn add<I>(&mut self, features: I, value: Value) -> Result<&mut Self>
    where
        I: IntoIterator<Item = FeatureId>,
    {
        self.entries.push(Entry::new(FeatureSet::new(features), value)?);
        Ok(self)
    }

    /// Add an already constructed entry.
    pub fn add_entry(&mut self, entry: Entry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Extract the features of a raw sample and add it with `value`.
    ///
    /// Extraction failures are reported as classifier failures.
    pub fn add_sample<X: FeatureExtractor>(
        &mut self,
        extractor: &X,
        sample: &X::Sample,
        value: Value,
    ) -> Result<&mut Self> {
        let features = extractor.extract(sample).map_err(|e| match e {
            CompositeError::ClassifierFailure { .. } => e,
            other => CompositeError::classifier(other.to_string()),
        })?;
        self.entries.push(Entry::new(features, value)?);
        Ok(self)
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the entries.
    pub fn build(self) -> EntrySet {
        EntrySet::from(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_freezes_entries() {
        let mut builder = EntrySetBuilder::new();
        builder.add(vec![3, 1], 2.0).unwrap();
        builder.add(vec![7], -1.0).unwrap().add(vec![2], 4.5).unwrap();
        assert_eq!(builder.len(), 3);

        let set = builder.build();
        assert_eq!(set.len(), 3);
        assert_eq!(set.values(), vec![2.0, -1.0, 4.5]);
        assert_eq!(set.value_range(), Some((-1.0, 4.5)));
        assert_eq!(set.get(0).unwrap().features().as_slice(), &[1, 3]);
    }

    #[test]
    fn test_builder_rejects_nan() {
        let mut builder = EntrySetBuilder::new();
        assert!(builder.add(vec![1], f64::NAN).is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_select_and_clone_share_entries() {
        let set: EntrySet = (0..5)
            .map(|i| Entry::new(FeatureSet::new(vec![i]), i as f64).unwrap())
            .collect();
        let copy = set.clone();
        let picked = copy.select(&[4, 1, 9]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].value(), 4.0);
        assert_eq!(picked[1].value(), 1.0);
        assert!(EntrySet::default().value_range().is_none());
    }
}
