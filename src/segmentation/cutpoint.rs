//! Separability of a threshold, measured by a cross-validated classifier.

use crate::core::error::Result;
use crate::core::traits::Classifier;
use crate::core::types::{ValidationKind, Value};
use crate::dataset::{Entry, FeatureSet};

/// Scores how well a classifier tells two sides of a split apart, as the
/// leave-one-out ROC-AUC of a model trained on the split.
#[derive(Debug, Clone, Copy)]
pub struct CutpointScorer<'a, C> {
    classifier: &'a C,
}

impl<'a, C: Classifier> CutpointScorer<'a, C> {
    /// Create a scorer around a classifier.
    pub fn new(classifier: &'a C) -> Self {
        CutpointScorer { classifier }
    }

    /// ROC-AUC of "value >= threshold" over `sample`.
    pub fn score<E: AsRef<Entry>>(&self, threshold: Value, sample: &[E]) -> Result<f64> {
        let training: Vec<(&FeatureSet, bool)> = sample
            .iter()
            .map(|e| {
                let entry = e.as_ref();
                (entry.features(), entry.value() >= threshold)
            })
            .collect();
        self.evaluate(&training)
    }

    /// ROC-AUC of telling `low` (negative) from `high` (positive).
    pub fn score_partitions<E: AsRef<Entry>>(&self, low: &[E], high: &[E]) -> Result<f64> {
        let training: Vec<(&FeatureSet, bool)> = low
            .iter()
            .map(|e| (e.as_ref().features(), false))
            .chain(high.iter().map(|e| (e.as_ref().features(), true)))
            .collect();
        self.evaluate(&training)
    }

    fn evaluate(&self, training: &[(&FeatureSet, bool)]) -> Result<f64> {
        let model = self.classifier.build(training)?;
        self.classifier.cross_validate(&model, ValidationKind::LeaveOneOut)
    }
}
