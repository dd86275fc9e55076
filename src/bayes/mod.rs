//! Reference classifier for the segmentation core.

pub mod naive_bayes;

pub use naive_bayes::{NaiveBayesClassifier, NaiveBayesModel};
