//! Training and querying composite models.
//!
//! A [`ModelTrainer`] owns the classifier, configuration and frozen entries of
//! one run. [`ModelTrainer::calculate`] segments the value range, trains one
//! classifier per bin and returns an immutable [`CompositeModel`]. A model can
//! also be reconstructed from stored boundaries and per-bin classifier models
//! with [`CompositeModel::from_parts`].

pub mod composite;
pub mod trainer;

pub use composite::CompositeModel;
pub use trainer::ModelTrainer;
