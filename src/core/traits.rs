//! Capability traits for the collaborators the segmentation core consumes.
//!
//! The core never looks inside a classifier or a feature extractor. It only
//! needs the operations below, which lets the same search and ensemble code
//! run over any binary classifier that works on sparse feature-id sets.

use crate::core::error::Result;
use crate::core::types::{Score, ValidationKind};
use crate::dataset::FeatureSet;
use std::fmt::Debug;

/// Binary classifier over sparse feature sets.
///
/// A trained handle (`Model`) must remember whatever it needs to
/// cross-validate itself, since [`Classifier::cross_validate`] only receives
/// the handle.
pub trait Classifier: Send + Sync + Debug {
    /// Trained model handle.
    type Model: Send + Sync + Debug + Clone;

    /// Train a model from `(features, label)` pairs.
    fn build(&self, training: &[(&FeatureSet, bool)]) -> Result<Self::Model>;

    /// Uncalibrated prediction for a feature set.
    fn predict_raw(&self, model: &Self::Model, features: &FeatureSet) -> Result<Score>;

    /// Map a raw prediction onto the calibrated scale, nominally `[0, 1]`.
    fn scale_predictor(&self, model: &Self::Model, raw: Score) -> Score;

    /// Cross-validate the model with the given protocol and return its ROC-AUC.
    fn cross_validate(&self, model: &Self::Model, kind: ValidationKind) -> Result<f64>;

    /// Whether a model (possibly built elsewhere) can be used with this classifier.
    fn is_compatible(&self, _model: &Self::Model) -> bool {
        true
    }

    /// Calibrated prediction for a feature set.
    fn predict(&self, model: &Self::Model, features: &FeatureSet) -> Result<Score> {
        let raw = self.predict_raw(model, features)?;
        Ok(self.scale_predictor(model, raw))
    }
}

/// Turns a raw domain sample into a feature set.
///
/// Implementations must be deterministic: the same sample always yields the
/// same feature ids.
pub trait FeatureExtractor: Send + Sync {
    /// Raw sample type.
    type Sample: ?Sized;

    /// Compute the sorted, duplicate-free feature ids of a sample.
    fn extract(&self, sample: &Self::Sample) -> Result<FeatureSet>;
}
