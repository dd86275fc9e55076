//! Greedy diversity subsampling.
//!
//! Picks a subset of entries that is spread evenly over the value range and,
//! locally, as dissimilar as possible in feature space. The subset keeps the
//! cut-point search tractable on large inputs: every candidate threshold
//! trains and cross-validates a classifier on it.

use crate::config::SegmentationConfig;
use crate::core::constants::{DEFAULT_SCAN_WINDOW, DEFAULT_SIMILARITY_WINDOW};
use crate::dataset::Entry;
use std::collections::VecDeque;

/// Selects a value-spread, feature-diverse subset of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiversitySubsampler {
    target_size: usize,
    similarity_window: usize,
    scan_window: usize,
}

impl DiversitySubsampler {
    /// Create a subsampler for `target_size` picks (at least 2) with default
    /// windows.
    pub fn new(target_size: usize) -> Self {
        DiversitySubsampler {
            target_size: target_size.max(2),
            similarity_window: DEFAULT_SIMILARITY_WINDOW,
            scan_window: DEFAULT_SCAN_WINDOW,
        }
    }

    /// Create a subsampler sized and tuned by a configuration.
    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.subsample_size)
            .with_windows(config.similarity_window, config.scan_window)
    }

    /// Override the similarity and scan windows.
    pub fn with_windows(mut self, similarity_window: usize, scan_window: usize) -> Self {
        self.similarity_window = similarity_window.max(1);
        self.scan_window = scan_window.max(1);
        self
    }

    /// Requested number of picks.
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Indices (ascending) of the selected entries.
    ///
    /// When `entries` is no larger than the target, every index is returned.
    /// Otherwise the result always holds the lowest- and highest-valued entry
    /// and never exceeds the target size.
    pub fn subsample<E: AsRef<Entry>>(&self, entries: &[E]) -> Vec<usize> {
        let num = entries.len();
        if num <= self.target_size {
            return (0..num).collect();
        }

        let mut order: Vec<usize> = (0..num).collect();
        order.sort_by(|&a, &b| entries[a].as_ref().value().total_cmp(&entries[b].as_ref().value()));
        let at = |pos: usize| entries[order[pos]].as_ref();

        // selection state is kept by position in value order
        let mut selected = vec![false; num];
        let mut recent: VecDeque<usize> = VecDeque::with_capacity(self.similarity_window);
        selected[0] = true;
        selected[num - 1] = true;
        recent.push_back(0);
        recent.push_back(num - 1);
        let mut count = 2;

        let positions = (self.target_size / 5).max(2);
        let inv_positions = 1.0 / (positions - 1) as f64;

        while count < self.target_size {
            let mut added = false;

            for n in 0..positions {
                if count >= self.target_size {
                    break;
                }

                let mid = ((n as f64 - 0.5) * num as f64 * inv_positions).round().max(1.0) as usize;
                let mut best: Option<(usize, f64)> = None;
                let mut i = mid;
                while i < num && (i < mid + self.scan_window || best.is_none()) {
                    if !selected[i] {
                        let candidate = at(i).features();
                        let similarity = recent
                            .iter()
                            .map(|&p| at(p).features().tanimoto(candidate))
                            .sum::<f64>()
                            / recent.len() as f64;
                        if best.map_or(true, |(_, lowest)| similarity < lowest) {
                            best = Some((i, similarity));
                        }
                    }
                    i += 1;
                }

                let Some((pick, _)) = best else { continue };
                selected[pick] = true;
                if recent.len() >= self.similarity_window {
                    recent.pop_front();
                }
                recent.push_back(pick);
                count += 1;
                added = true;
            }

            if !added {
                log::debug!(
                    "diversity subsampler exhausted after {} of {} picks",
                    count,
                    self.target_size
                );
                break;
            }
        }

        let mut picked: Vec<usize> = (0..num).filter(|&p| selected[p]).map(|p| order[p]).collect();
        picked.sort_unstable();
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FeatureSet;
    use proptest::prelude::*;

    fn entry(features: Vec<i32>, value: f64) -> Entry {
        Entry::new(FeatureSet::new(features), value).unwrap()
    }

    #[test]
    fn test_small_input_returns_everything() {
        let entries: Vec<Entry> = (0..5).map(|i| entry(vec![i], i as f64)).collect();
        let picked = DiversitySubsampler::new(10).subsample(&entries);
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_includes_extremes_and_hits_target() {
        // values shuffled relative to index so that the extremes are not at the ends
        let entries: Vec<Entry> = (0..250)
            .map(|i| entry(vec![i % 17, 100 + i % 5], ((i * 37) % 250) as f64))
            .collect();
        let min_idx = (0..250).find(|&i| (i * 37) % 250 == 0).unwrap();
        let max_idx = (0..250).find(|&i| (i * 37) % 250 == 249).unwrap();

        let picked = DiversitySubsampler::new(100).subsample(&entries);
        assert_eq!(picked.len(), 100);
        assert!(picked.contains(&min_idx));
        assert!(picked.contains(&max_idx));
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_prefers_dissimilar_neighbours() {
        // pairs of near-duplicates: the subsampler should not take both halves
        // of every pair when it only needs half the entries
        let entries: Vec<Entry> = (0..40)
            .map(|i| entry(vec![1000 + i / 2, 2000 + i / 2], i as f64))
            .collect();
        let picked = DiversitySubsampler::new(20).subsample(&entries);
        assert_eq!(picked.len(), 20);
        let pairs = picked.iter().map(|&i| i / 2).collect::<std::collections::BTreeSet<_>>();
        assert!(pairs.len() > 10);
    }

    #[test]
    fn test_works_on_borrowed_entries() {
        let entries: Vec<Entry> = (0..30).map(|i| entry(vec![i], i as f64)).collect();
        let borrowed: Vec<&Entry> = entries.iter().collect();
        let picked = DiversitySubsampler::new(12).subsample(&borrowed);
        assert_eq!(picked.len(), 12);
        assert!(picked.contains(&0));
        assert!(picked.contains(&29));
    }

    proptest! {
        #[test]
        fn prop_output_bounded_and_contains_extremes(
            values in proptest::collection::vec(-100.0f64..100.0, 1..160),
            target in 2usize..60,
        ) {
            let entries: Vec<Entry> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| entry(vec![(i % 7) as i32, (i % 11) as i32 + 50], v))
                .collect();
            let picked = DiversitySubsampler::new(target).subsample(&entries);

            prop_assert!(picked.len() <= target);
            prop_assert!(picked.len() <= entries.len());
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));

            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(picked.iter().any(|&i| values[i] == lo));
            prop_assert!(picked.iter().any(|&i| values[i] == hi));
        }
    }
}
