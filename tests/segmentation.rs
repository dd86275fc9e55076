//! Integration tests for the segment search.
//!
//! These exercise subsampling, candidate ranking and greedy refinement
//! through the public API on synthetic entry sets with known structure.

use composite_bayes::segmentation::SegmentationSearch;
use composite_bayes::*;

mod common;
use common::*;

/// Test that a clear value gap with matching features is the primary cut
#[test]
fn test_gap_is_primary_cut() {
    let entries = gapped_entries();
    let classifier = NaiveBayesClassifier::new();
    let config = SegmentationConfig::default();
    let search = SegmentationSearch::new(&classifier, &config);

    let ranked = search.rank_candidates(&entries).unwrap();
    assert!(ranked[0].cut > 5.0 && ranked[0].cut < 16.0);
    assert!(ranked.iter().all(|c| c.desirability.is_finite()));

    let segments = search.determine(&entries).unwrap();
    assert!(segments.as_slice().iter().any(|&c| c > 5.0 && c < 16.0));
}

/// Test that two entries cannot be segmented into three bins
#[test]
fn test_too_few_entries_for_min_bins() {
    let entries: EntrySet = gapped_entries().iter().take(2).cloned().collect();
    let trainer = ModelTrainer::new(NaiveBayesClassifier::new(), SegmentationConfig::default(), entries).unwrap();

    assert!(matches!(
        trainer.determine_segments(),
        Err(CompositeError::InsufficientData { .. })
    ));
}

/// Test segment search invariants across several random data sets
#[test]
fn test_search_invariants() {
    let classifier = NaiveBayesClassifier::new();
    let config = SegmentationConfig::default();

    for seed in [1, 7, 42] {
        let entries = three_clusters(seed);
        let segments = SegmentationSearch::new(&classifier, &config).determine(&entries).unwrap();

        assert!(!segments.is_empty());
        assert!(segments.len() <= config.max_segments());
        assert!(segments.as_slice().windows(2).all(|w| w[0] < w[1]));

        let min_size = config.min_bin_size(entries.len());
        let sizes = segments.bin_sizes(entries.entries());
        assert!(sizes.iter().all(|&n| n >= min_size), "seed {}: sizes {:?}", seed, sizes);
        assert_eq!(sizes.iter().sum::<usize>(), entries.len());
    }
}

/// Test that the search is reproducible for the same input
#[test]
fn test_search_is_deterministic() {
    let entries = three_clusters(3);
    let classifier = NaiveBayesClassifier::new();
    let config = SegmentationConfig::default();

    let first = SegmentationSearch::new(&classifier, &config).determine(&entries).unwrap();
    let second = SegmentationSearch::new(&classifier, &config).determine(&entries).unwrap();
    assert_eq!(first, second);
}

/// Test that a dedicated thread pool gives the same segments as the global one
#[test]
fn test_thread_pool_matches_global_pool() {
    let entries = three_clusters(11);
    let global = SegmentationConfig::default();
    let pooled = ConfigBuilder::new().num_threads(2).build().unwrap();

    let a = ModelTrainer::new(NaiveBayesClassifier::new(), global, entries.clone())
        .unwrap()
        .determine_segments()
        .unwrap();
    let b = ModelTrainer::new(NaiveBayesClassifier::new(), pooled, entries)
        .unwrap()
        .determine_segments()
        .unwrap();
    assert_eq!(a, b);
}

/// Test that the bin cap bounds the number of segments
#[test]
fn test_max_bins_caps_segments() {
    let entries = clustered_entries(&[0.0, 10.0, 20.0, 30.0, 40.0], 20, 5);
    let classifier = NaiveBayesClassifier::new();
    let config = ConfigBuilder::new().min_bins(3).max_bins(3).build().unwrap();

    let segments = SegmentationSearch::new(&classifier, &config).determine(&entries).unwrap();
    assert!(segments.len() <= 2);
}

/// Test Tanimoto similarity on entry feature sets
#[test]
fn test_tanimoto_on_entries() {
    let a = FeatureSet::new(vec![1, 2, 3]);
    let b = FeatureSet::new(vec![3, 2, 1]);
    let c = FeatureSet::new(vec![4, 5]);

    assert_eq!(tanimoto(a.as_slice(), b.as_slice()), 1.0);
    assert_eq!(tanimoto(a.as_slice(), c.as_slice()), 0.0);
    assert_eq!(a.tanimoto(&b), 1.0);
}

/// Test that the diversity subsampler keeps the value extremes
#[test]
fn test_subsample_keeps_extremes() {
    let entries = three_clusters(9);
    let picked = DiversitySubsampler::new(20).subsample(entries.entries());
    assert!(picked.len() <= 20);
    assert!(picked.windows(2).all(|w| w[0] < w[1]));

    let (low, high) = entries.value_range().unwrap();
    let values: Vec<f64> = picked.iter().map(|&i| entries.entries()[i].value()).collect();
    assert!(values.contains(&low));
    assert!(values.contains(&high));
}
