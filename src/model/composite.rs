//! Finalized composite model: segments, per-bin classifiers and validation.

use crate::core::constants::MIN_BINS_FLOOR;
use crate::core::error::{CompositeError, Result};
use crate::core::traits::{Classifier, FeatureExtractor};
use crate::core::types::{BinIndex, Value};
use crate::dataset::{EntrySet, FeatureSet};
use crate::ensemble::{build_validation_matrix, score_bins};
use crate::metrics::{OffByStat, ValidationMatrix};
use crate::prediction::BinPrediction;
use crate::segmentation::{BinAssignment, Segments};

/// A segmentation of the value range with one trained classifier per bin.
///
/// Produced by [`ModelTrainer::calculate`](crate::model::ModelTrainer::calculate)
/// or reconstructed from stored parts with [`CompositeModel::from_parts`].
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct CompositeModel<C: Classifier> {
    classifier: C,
    segments: Segments,
    min_value: Value,
    max_value: Value,
    models: Vec<C::Model>,
    cv_scores: Option<Vec<f64>>,
    validation: Option<ValidationMatrix>,
    assignment: Option<BinAssignment>,
}

impl<C: Classifier> CompositeModel<C> {
    pub(crate) fn from_training(
        classifier: C,
        segments: Segments,
        (min_value, max_value): (Value, Value),
        models: Vec<C::Model>,
        cv_scores: Vec<f64>,
        validation: ValidationMatrix,
        assignment: BinAssignment,
    ) -> Self {
        CompositeModel {
            classifier,
            segments,
            min_value,
            max_value,
            models,
            cv_scores: Some(cv_scores),
            validation: Some(validation),
            assignment: Some(assignment),
        }
    }

    /// Rebuild a model from its boundaries (`[min, cuts..., max]`) and one
    /// pre-trained classifier model per bin.
    ///
    /// Fails with `InvalidConfiguration` when there are fewer than
    /// [`MIN_BINS_FLOOR`] models, when the boundary count is not one
    /// more than the model count, when the interior cuts are not finite and
    /// strictly ascending, or when a model is not compatible with
    /// `classifier`.
    pub fn from_parts(classifier: C, boundaries: &[Value], models: Vec<C::Model>) -> Result<Self> {
        if models.len() < MIN_BINS_FLOOR {
            return Err(CompositeError::invalid_configuration(format!(
                "at least {} classifier models are required, got {}",
                MIN_BINS_FLOOR,
                models.len()
            )));
        }
        if boundaries.len() != models.len() + 1 {
            return Err(CompositeError::invalid_configuration(format!(
                "{} boundaries do not match {} models (expected {})",
                boundaries.len(),
                models.len(),
                models.len() + 1
            )));
        }

        let min_value = boundaries[0];
        let max_value = boundaries[boundaries.len() - 1];
        if !(min_value.is_finite() && max_value.is_finite()) {
            return Err(CompositeError::invalid_configuration(format!(
                "boundary extremes must be finite, got {} and {}",
                min_value, max_value
            )));
        }
        let segments = Segments::new(boundaries[1..boundaries.len() - 1].to_vec())?;

        if let Some(bin) = models.iter().position(|m| !classifier.is_compatible(m)) {
            return Err(CompositeError::invalid_configuration(format!(
                "model for bin {} is not compatible with the classifier",
                bin
            )));
        }

        log::debug!("reconstructed composite model with {} bins", models.len());
        Ok(CompositeModel {
            classifier,
            segments,
            min_value,
            max_value,
            models,
            cv_scores: None,
            validation: None,
            assignment: None,
        })
    }

    /// The classifier the per-bin models belong to.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Cut points.
    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    /// Cut points capped by the lowest and highest training value; one longer
    /// than the number of bins.
    pub fn boundaries(&self) -> Vec<Value> {
        let mut bounds = Vec::with_capacity(self.segments.len() + 2);
        bounds.push(self.min_value);
        bounds.extend_from_slice(self.segments.as_slice());
        bounds.push(self.max_value);
        bounds
    }

    /// Lowest training value.
    pub fn min_value(&self) -> Value {
        self.min_value
    }

    /// Highest training value.
    pub fn max_value(&self) -> Value {
        self.max_value
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.segments.num_bins()
    }

    /// Number of per-bin models; equal to [`num_bins`](Self::num_bins).
    pub fn num_models(&self) -> usize {
        self.models.len()
    }

    /// All per-bin models, in bin order.
    pub fn models(&self) -> &[C::Model] {
        &self.models
    }

    /// Model of bin `bin`.
    pub fn model(&self, bin: BinIndex) -> Option<&C::Model> {
        self.models.get(bin)
    }

    /// Value range `[low, high]` of a bin, bounded by the training extremes.
    pub fn bin_range(&self, bin: BinIndex) -> Option<(Value, Value)> {
        let bounds = self.boundaries();
        Some((*bounds.get(bin)?, *bounds.get(bin + 1)?))
    }

    /// Bin a value falls into.
    pub fn bin_of(&self, value: Value) -> BinIndex {
        self.segments.bin_of(value)
    }

    /// Assign an entry set to this model's bins.
    pub fn assign(&self, entries: &EntrySet) -> BinAssignment {
        self.segments.assign(entries.entries())
    }

    /// Training bin assignment; `None` for reconstructed models.
    pub fn assigned_bins(&self) -> Option<&BinAssignment> {
        self.assignment.as_ref()
    }

    /// Cross-validation ROC-AUC of every per-bin model; `None` for
    /// reconstructed models.
    pub fn cv_scores(&self) -> Option<&[f64]> {
        self.cv_scores.as_deref()
    }

    /// Training validation matrix; `None` for reconstructed models.
    pub fn validation_matrix(&self) -> Option<&ValidationMatrix> {
        self.validation.as_ref()
    }

    /// Off-by-N report of the training validation matrix.
    pub fn off_by_stats(&self) -> Option<Vec<OffByStat>> {
        self.validation.as_ref().map(ValidationMatrix::off_by_stats)
    }

    /// Score an independent entry set into its own validation matrix.
    pub fn validate(&self, entries: &EntrySet) -> Result<ValidationMatrix> {
        let assignment = self.assign(entries);
        let matrix = build_validation_matrix(&self.classifier, &self.models, entries.entries(), assignment.bins())?;
        log::info!(
            "validated {} held-out entries: {:.1}% in the true bin",
            matrix.total(),
            matrix.accuracy() * 100.0
        );
        Ok(matrix)
    }

    /// Calibrated score of every bin for a feature set.
    pub fn predict_bins(&self, features: &FeatureSet) -> Result<BinPrediction> {
        let scores = score_bins(&self.classifier, &self.models, features)?;
        Ok(BinPrediction::from_scores(scores))
    }

    /// Extract features from a raw sample and predict its bins.
    pub fn predict_sample<X: FeatureExtractor>(&self, extractor: &X, sample: &X::Sample) -> Result<BinPrediction> {
        let features = extractor.extract(sample)?;
        self.predict_bins(&features)
    }
}
