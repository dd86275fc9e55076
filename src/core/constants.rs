//! Default tunables for segmentation search and ensemble validation.
//!
//! These values seed [`SegmentationConfig`](crate::config::SegmentationConfig);
//! callers adjust them through the configuration rather than globally.

use crate::core::types::ValidationKind;

/// Library version string.
pub const COMPOSITE_BAYES_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default minimum number of bins.
pub const DEFAULT_MIN_BINS: usize = 3;

/// Default maximum number of bins.
pub const DEFAULT_MAX_BINS: usize = 8;

/// Lowest permitted bin count: fewer bins defeats the purpose of a composite model.
pub const MIN_BINS_FLOOR: usize = 3;

/// Highest permitted bin count.
pub const MAX_BINS_CEILING: usize = 20;

/// Largest subset handed to the cut-point scorer; bigger inputs are diversified down to this.
pub const DEFAULT_SUBSAMPLE_SIZE: usize = 100;

/// Number of runner-up cut points kept for iterative refinement.
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Refinement stops once the best two-partition ROC drops below this.
pub const DEFAULT_MIN_ROC_SPLIT: f64 = 0.55;

/// Bins holding less than this fraction of all entries are disallowed.
pub const DEFAULT_MIN_BIN_FRACTION: f64 = 0.05;

/// Resolution of the smoothed density curve.
pub const DEFAULT_DENSITY_SAMPLES: usize = 1000;

/// Gaussian kernel width, in value units.
pub const DEFAULT_DENSITY_BANDWIDTH: f64 = 0.1;

/// Padding added below the minimum and above the maximum value.
pub const DEFAULT_DENSITY_PADDING: f64 = 1.0;

/// Number of recent picks compared against by the diversity subsampler.
pub const DEFAULT_SIMILARITY_WINDOW: usize = 10;

/// Minimum number of forward positions scanned at each sampling position.
pub const DEFAULT_SCAN_WINDOW: usize = 10;

/// Percentile of the balance ratios that is rescaled to 1.
pub const DEFAULT_BALANCE_PERCENTILE: f64 = 0.9;

/// Cross-validation protocol for the per-bin ensemble models.
pub const DEFAULT_ENSEMBLE_VALIDATION: ValidationKind = ValidationKind::FiveFold;

/// Default number of threads (0 means the global rayon pool).
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Default seed for hold-out partitioning.
pub const DEFAULT_PARTITION_SEED: u64 = 1;

/// Training sets are never shrunk below this size by hold-out partitioning.
pub const MIN_TRAINING_AFTER_PARTITION: usize = 10;
