//! Entries, entry collections and feature extraction.
//!
//! Entries are accumulated in an [`EntrySetBuilder`] and frozen into an
//! immutable [`EntrySet`] before any segmentation or training starts.

pub mod dataset;
pub mod entry;
pub mod features;
pub mod partition;

pub use dataset::{EntrySet, EntrySetBuilder};
pub use entry::{Entry, FeatureSet};
pub use features::NgramExtractor;
pub use partition::{split_holdout, split_holdout_with, HoldoutSplit};
