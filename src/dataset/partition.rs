//! Hold-out partitioning of training entries into a testing set.

use crate::config::SegmentationConfig;
use crate::core::constants::MIN_TRAINING_AFTER_PARTITION;
use crate::core::error::{CompositeError, Result};
use crate::dataset::dataset::EntrySet;
use crate::dataset::entry::Entry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Training and testing sets produced by [`split_holdout`].
#[derive(Debug, Clone)]
pub struct HoldoutSplit {
    /// Entries left for training
    pub training: EntrySet,
    /// Entries moved out for independent validation
    pub testing: EntrySet,
}

/// Move `round(fraction * n)` randomly chosen entries out of `entries` into a
/// testing set.
///
/// The choice is reproducible for a given `seed`. Training is never shrunk to
/// `MIN_TRAINING_AFTER_PARTITION` entries or fewer, so the testing set may
/// come out smaller than requested.
pub fn split_holdout(entries: &EntrySet, fraction: f64, seed: u64) -> Result<HoldoutSplit> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(CompositeError::invalid_parameter(
            "fraction",
            fraction.to_string(),
            "must be in range [0.0, 1.0]",
        ));
    }

    let mut training: Vec<Entry> = entries.entries().to_vec();
    let mut testing = Vec::new();
    let mut to_move = (fraction * training.len() as f64).round() as usize;

    let mut rng = StdRng::seed_from_u64(seed);
    while to_move > 0 && training.len() > MIN_TRAINING_AFTER_PARTITION {
        let idx = rng.gen_range(0..training.len());
        testing.push(training.remove(idx));
        to_move -= 1;
    }

    log::debug!(
        "hold-out split: {} training, {} testing",
        training.len(),
        testing.len()
    );

    Ok(HoldoutSplit {
        training: EntrySet::from(training),
        testing: EntrySet::from(testing),
    })
}

/// [`split_holdout`] seeded from [`SegmentationConfig::partition_seed`].
pub fn split_holdout_with(entries: &EntrySet, fraction: f64, config: &SegmentationConfig) -> Result<HoldoutSplit> {
    split_holdout(entries, fraction, config.partition_seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::entry::FeatureSet;

    fn make_set(n: usize) -> EntrySet {
        (0..n)
            .map(|i| Entry::new(FeatureSet::new(vec![i as i32]), i as f64).unwrap())
            .collect()
    }

    #[test]
    fn test_split_moves_requested_fraction() {
        let set = make_set(40);
        let split = split_holdout(&set, 0.25, 1).unwrap();
        assert_eq!(split.testing.len(), 10);
        assert_eq!(split.training.len(), 30);

        let mut values: Vec<f64> = split
            .training
            .values()
            .into_iter()
            .chain(split.testing.values())
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(values, set.values());
    }

    #[test]
    fn test_split_is_reproducible() {
        let set = make_set(30);
        let a = split_holdout(&set, 0.3, 7).unwrap();
        let b = split_holdout(&set, 0.3, 7).unwrap();
        assert_eq!(a.testing.values(), b.testing.values());
    }

    #[test]
    fn test_split_keeps_minimum_training() {
        let set = make_set(12);
        let split = split_holdout(&set, 0.9, 1).unwrap();
        assert_eq!(split.training.len(), MIN_TRAINING_AFTER_PARTITION);
        assert_eq!(split.testing.len(), 2);

        let split = split_holdout(&set, 0.0, 1).unwrap();
        assert!(split.testing.is_empty());
        assert!(split_holdout(&set, 1.5, 1).is_err());
    }

    #[test]
    fn test_split_uses_configured_seed() {
        let set = make_set(30);
        let config = SegmentationConfig {
            partition_seed: 7,
            ..SegmentationConfig::default()
        };
        let from_config = split_holdout_with(&set, 0.3, &config).unwrap();
        let explicit = split_holdout(&set, 0.3, 7).unwrap();
        assert_eq!(from_config.testing.values(), explicit.testing.values());
        assert_eq!(from_config.training.values(), explicit.training.values());
    }
}
