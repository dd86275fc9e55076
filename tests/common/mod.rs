//! Common fixtures for composite-bayes integration tests.

#![allow(dead_code)]

use composite_bayes::*;
use rand::prelude::*;

/// Features in the shared noise pool are drawn by every cluster.
pub const NOISE_BASE: i32 = 10_000;
/// Per-entry unique feature ids start here.
pub const UNIQUE_BASE: i32 = 50_000;

/// Ten entries with a clear value gap between 5 and 16; the low and high
/// groups each share a feature.
pub fn gapped_entries() -> EntrySet {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 16.0, 17.0, 18.0, 19.0, 20.0];
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let group = if v < 10.0 { 1 } else { 2 };
            Entry::new(FeatureSet::new(vec![group, UNIQUE_BASE + i as i32]), v).unwrap()
        })
        .collect()
}

/// Features typical of cluster `cluster`: four of its eight marker ids plus
/// two shared noise ids.
pub fn cluster_features(rng: &mut StdRng, cluster: usize) -> Vec<i32> {
    let markers: Vec<i32> = (0..8).map(|k| cluster as i32 * 100 + k).collect();
    let mut ids: Vec<i32> = markers.choose_multiple(rng, 4).copied().collect();
    ids.push(NOISE_BASE + rng.gen_range(0..20));
    ids.push(NOISE_BASE + rng.gen_range(0..20));
    ids
}

/// Entries drawn from clusters centred on `centers`, `per_cluster` each,
/// with values spread uniformly within ±1 of the centre.
pub fn clustered_entries(centers: &[f64], per_cluster: usize, seed: u64) -> EntrySet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = EntrySetBuilder::new();
    let mut next_id = UNIQUE_BASE;

    for (cluster, &center) in centers.iter().enumerate() {
        for _ in 0..per_cluster {
            let mut ids = cluster_features(&mut rng, cluster);
            ids.push(next_id);
            next_id += 1;
            let value = center + rng.gen_range(-1.0..1.0);
            builder.add(ids, value).unwrap();
        }
    }
    builder.build()
}

/// The default three-cluster fixture: centres 0, 10 and 20.
pub fn three_clusters(seed: u64) -> EntrySet {
    clustered_entries(&[0.0, 10.0, 20.0], 30, seed)
}

/// Check the invariants every successful `calculate` must satisfy.
pub fn assert_model_invariants(
    model: &CompositeModel<NaiveBayesClassifier>,
    entries: &EntrySet,
    config: &SegmentationConfig,
) {
    let segments = model.segments().as_slice();
    assert!(segments.windows(2).all(|w| w[0] < w[1]), "segments not ascending: {:?}", segments);
    assert!(segments.len() <= config.max_segments());
    assert_eq!(model.num_bins(), segments.len() + 1);
    assert_eq!(model.num_models(), model.num_bins());
    assert_eq!(model.boundaries().len(), model.num_bins() + 1);

    let assignment = model.assigned_bins().expect("trained model keeps its assignment");
    assert_eq!(assignment.num_entries(), entries.len());
    let min_size = config.min_bin_size(entries.len());
    assert!(
        assignment.sizes().iter().all(|&n| n >= min_size),
        "bin sizes {:?} below {}",
        assignment.sizes(),
        min_size
    );

    let matrix = model.validation_matrix().expect("trained model keeps its matrix");
    assert_eq!(matrix.num_bins(), model.num_bins());
    assert_eq!(matrix.row_sums(), assignment.sizes());
    assert_eq!(matrix.total(), entries.len());
}
