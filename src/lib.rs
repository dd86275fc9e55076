//! # Composite Bayes
//!
//! Piecewise classifier ensembles over continuous-valued labeled data.
//!
//! The label range is split into an adaptively chosen number of contiguous
//! bins, one binary one-vs-rest classifier is trained per bin, and new
//! samples receive a calibrated membership score for every bin.
//!
//! ## Features
//!
//! - **Adaptive segmentation**: cut points are ranked by classifier
//!   separability, by valleys in the smoothed value density and by class
//!   balance, then refined greedily while the new sub-bins stay separable.
//! - **Diversity subsampling**: large inputs are reduced to a value-spread,
//!   feature-diverse subset before the candidate search.
//! - **Pluggable collaborators**: any [`Classifier`] over sparse feature-id
//!   sets and any [`FeatureExtractor`] can be used. A Laplacian-corrected
//!   [`NaiveBayesClassifier`] and an n-gram [`NgramExtractor`] are included.
//! - **Validation reporting**: true-versus-predicted bin matrices with
//!   cumulative off-by-N enrichment over random guessing.
//! - **Parallel Processing**: candidate scoring and per-bin training run on
//!   Rayon, optionally inside a dedicated thread pool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use composite_bayes::{
//!     ConfigBuilder, EntrySetBuilder, ModelTrainer, NaiveBayesClassifier, NgramExtractor,
//! };
//!
//! # fn main() -> composite_bayes::Result<()> {
//! composite_bayes::init()?;
//!
//! let extractor = NgramExtractor::default();
//! let mut builder = EntrySetBuilder::new();
//! for (text, value) in [("CCO", 1.2), ("CCCO", 1.9), ("c1ccccc1", 4.5), ("c1ccccc1O", 4.1)] {
//!     builder.add_sample(&extractor, text, value)?;
//! }
//! // ... many more entries
//! let entries = builder.build();
//!
//! let config = ConfigBuilder::new().min_bins(3).max_bins(6).build()?;
//! let classifier = NaiveBayesClassifier::for_feature_space(extractor.feature_space());
//! let model = ModelTrainer::new(classifier, config, entries)?.calculate()?;
//!
//! println!("boundaries: {:?}", model.boundaries());
//! let prediction = model.predict_sample(&extractor, "CCCCO")?;
//! println!(
//!     "best bin {} (confidence {:.2})",
//!     prediction.best_bin(),
//!     prediction.confidence()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error handling, scalar types, defaults and collaborator traits
//! - [`config`]: [`SegmentationConfig`] and its builder
//! - [`dataset`]: feature sets, entries, entry sets and hold-out partitioning
//! - [`sampling`]: Tanimoto similarity and the diversity subsampler
//! - [`segmentation`]: density curvature, cut-point scoring and the search
//! - [`bayes`]: the reference naive Bayes classifier
//! - [`metrics`]: ROC-AUC and validation matrices
//! - [`ensemble`]: per-bin training and matrix scoring
//! - [`prediction`]: per-bin scores with best bin and confidence
//! - [`model`]: [`ModelTrainer`] and the finalized [`CompositeModel`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Entries and entry sets
pub mod dataset;

// Subsampling for the cut-point search
pub mod sampling;

// Segment search and bin assignment
pub mod segmentation;

// Reference classifier
pub mod bayes;

// ROC and validation matrices
pub mod metrics;

// Per-bin classifier ensemble
pub mod ensemble;

// Prediction results
pub mod prediction;

// Trainer and finalized model
pub mod model;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{CompositeError, Result},
    traits::*,
    types::*,
};

// Re-export configuration functionality
pub use config::{ConfigBuilder, SegmentationConfig};

// Re-export dataset functionality
pub use dataset::{split_holdout, split_holdout_with, Entry, EntrySet, EntrySetBuilder, FeatureSet, HoldoutSplit, NgramExtractor};

pub use bayes::{NaiveBayesClassifier, NaiveBayesModel};
pub use metrics::{roc_auc, OffByStat, ValidationMatrix};
pub use model::{CompositeModel, ModelTrainer};
pub use prediction::BinPrediction;
pub use sampling::{tanimoto, DiversitySubsampler};
pub use segmentation::{BinAssignment, Segments};

// Version information
pub use crate::core::constants::COMPOSITE_BAYES_VERSION as VERSION;

/// Initialize the library.
///
/// Sets up `env_logger` logging (honouring `RUST_LOG`, `info` otherwise).
/// Calling it is optional and repeated calls are harmless.
///
/// # Examples
///
/// ```rust
/// fn main() -> composite_bayes::Result<()> {
///     composite_bayes::init()?;
///     assert!(composite_bayes::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_integration() {
        let err = CompositeError::config("test error");
        assert_eq!(err.category(), "config");
        let err = CompositeError::insufficient_data("no entries");
        assert_eq!(err.category(), "insufficient_data");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new().num_bins(5).subsample_size(50).build().unwrap();
        assert_eq!(config.min_bins, 5);
        assert_eq!(config.max_bins, 5);
        assert_eq!(config.subsample_size, 50);
    }
}
