//! Integration tests for training, validating, reconstructing and
//! predicting with composite models.

use composite_bayes::*;
use rand::prelude::*;

mod common;
use common::*;

fn trainer(entries: EntrySet) -> ModelTrainer<NaiveBayesClassifier> {
    ModelTrainer::new(NaiveBayesClassifier::new(), SegmentationConfig::default(), entries).unwrap()
}

/// Test the full pipeline with searched segments
#[test]
fn test_calculate_invariants() {
    let _ = composite_bayes::init();
    let config = SegmentationConfig::default();

    for seed in [2, 13] {
        let entries = three_clusters(seed);
        let model = trainer(entries.clone()).calculate().unwrap();
        assert_model_invariants(&model, &entries, &config);

        let stats = model.off_by_stats().unwrap();
        assert_eq!(stats.len(), model.num_bins());
        let last = stats.last().unwrap();
        assert!((last.portion - 1.0).abs() < 1e-9);
        assert!((last.random - 1.0).abs() < 1e-9);
        assert!(model.cv_scores().unwrap().iter().all(|&s| (0.0..=1.0).contains(&s)));
    }
}

/// Test five entries with four supplied segments
#[test]
fn test_too_many_segments_for_entries() {
    let entries = clustered_entries(&[0.0, 10.0, 20.0, 30.0, 40.0], 1, 4);
    let result = trainer(entries).with_segments(vec![5.0, 15.0, 25.0, 35.0]).calculate();
    assert!(matches!(result, Err(CompositeError::InvalidConfiguration { .. })));
}

/// Test that separable clusters are recovered with supplied segments
#[test]
fn test_supplied_segments_on_clusters() {
    let entries = three_clusters(21);
    let model = trainer(entries.clone()).with_segments(vec![5.0, 15.0]).calculate().unwrap();
    assert_model_invariants(&model, &entries, &SegmentationConfig::default());

    let matrix = model.validation_matrix().unwrap();
    assert_eq!(matrix.row_sums(), vec![30, 30, 30]);
    assert!(matrix.accuracy() > 0.9, "accuracy {}", matrix.accuracy());

    let mut rng = StdRng::seed_from_u64(99);
    let features = FeatureSet::new(cluster_features(&mut rng, 2));
    let prediction = model.predict_bins(&features).unwrap();
    assert_eq!(prediction.num_bins(), 3);
    assert_eq!(prediction.best_bin(), 2);
    assert!((0.0..=1.0).contains(&prediction.confidence()));
    assert_eq!(prediction.ranked_bins()[0], 2);
}

/// Test searching segments first, then training with them
#[test]
fn test_determine_then_supply() {
    let entries = three_clusters(8);
    let searched = trainer(entries.clone()).determine_segments().unwrap();

    let model = trainer(entries)
        .with_segments(searched.as_slice().to_vec())
        .calculate()
        .unwrap();
    assert_eq!(model.segments(), &searched);
}

/// Test validation on a hold-out set
#[test]
fn test_holdout_validation() {
    let entries = three_clusters(17);
    let split = split_holdout(&entries, 0.2, 7).unwrap();
    assert_eq!(split.testing.len(), 18);
    assert_eq!(split.training.len() + split.testing.len(), entries.len());

    let model = trainer(split.training.clone()).with_segments(vec![5.0, 15.0]).calculate().unwrap();
    let matrix = model.validate(&split.testing).unwrap();

    assert_eq!(matrix.num_bins(), 3);
    assert_eq!(matrix.total(), split.testing.len());
    assert_eq!(matrix.row_sums(), model.assign(&split.testing).sizes());
}

/// Test reconstruction from boundaries and serialized models
#[test]
fn test_reconstruct_from_parts() {
    let entries = three_clusters(5);
    let trained = trainer(entries).with_segments(vec![5.0, 15.0]).calculate().unwrap();

    let json = serde_json::to_string(trained.models()).unwrap();
    let models: Vec<NaiveBayesModel> = serde_json::from_str(&json).unwrap();
    let boundaries = trained.boundaries();

    let rebuilt = CompositeModel::from_parts(NaiveBayesClassifier::new(), &boundaries, models).unwrap();
    assert_eq!(rebuilt.boundaries(), boundaries);
    assert_eq!(rebuilt.num_bins(), trained.num_bins());
    assert!(rebuilt.validation_matrix().is_none());

    let mut rng = StdRng::seed_from_u64(3);
    for cluster in 0..3 {
        let features = FeatureSet::new(cluster_features(&mut rng, cluster));
        let a = trained.predict_bins(&features).unwrap();
        let b = rebuilt.predict_bins(&features).unwrap();
        assert_eq!(a.best_bin(), b.best_bin());
        for (x, y) in a.scores().iter().zip(b.scores()) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}

/// Test that supplied segments must be ascending
#[test]
fn test_rejects_unsorted_segments() {
    let result = trainer(three_clusters(1)).with_segments(vec![15.0, 5.0]).calculate();
    assert!(matches!(result, Err(CompositeError::InvalidConfiguration { .. })));
}

/// Test prediction from raw text samples through the n-gram extractor
#[test]
fn test_predict_sample_with_ngrams() {
    let alphabets = ["ab", "mn", "xy"];
    let extractor = NgramExtractor::default();
    let mut rng = StdRng::seed_from_u64(12);
    let mut builder = EntrySetBuilder::new();

    for (group, alphabet) in alphabets.iter().enumerate() {
        let letters: Vec<char> = alphabet.chars().collect();
        for _ in 0..20 {
            let text: String = (0..8).map(|_| letters[rng.gen_range(0..letters.len())]).collect();
            let value = group as f64 * 10.0 + rng.gen_range(-1.0..1.0);
            builder.add_sample(&extractor, text.as_str(), value).unwrap();
        }
    }

    let classifier = NaiveBayesClassifier::for_feature_space(extractor.feature_space());
    let model = ModelTrainer::new(classifier, SegmentationConfig::default(), builder.build())
        .unwrap()
        .with_segments(vec![5.0, 15.0])
        .calculate()
        .unwrap();

    assert_eq!(model.predict_sample(&extractor, "xyyxxyxy").unwrap().best_bin(), 2);
    assert_eq!(model.predict_sample(&extractor, "abbaabab").unwrap().best_bin(), 0);
    assert!(model.predict_sample(&extractor, "   ").is_err());
}

/// Test configuration round trip through a TOML file
#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segmentation.toml");

    let config = ConfigBuilder::new().min_bins(4).max_bins(6).max_candidates(20).build().unwrap();
    config.save_to_file(&path).unwrap();
    let loaded = SegmentationConfig::load_from_file(&path).unwrap();

    assert_eq!(loaded.min_bins, 4);
    assert_eq!(loaded.max_bins, 6);
    assert_eq!(loaded.max_candidates, 20);
}
