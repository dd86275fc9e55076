//! One-vs-rest classifier ensemble over the bins of a segmentation.
//!
//! Every bin gets a classifier trained to tell its own entries from all the
//! others. Scoring an entry with every classifier and taking the highest
//! calibrated score predicts its bin; counting those predictions against the
//! true bins gives the [`ValidationMatrix`].

use crate::core::error::{CompositeError, Result};
use crate::core::traits::Classifier;
use crate::core::types::{BinIndex, Score, ValidationKind};
use crate::dataset::{Entry, FeatureSet};
use crate::metrics::ValidationMatrix;
use crate::prediction::argmax;
use crate::segmentation::BinAssignment;
use rayon::prelude::*;

/// Trained per-bin models and their cross-validation ROC-AUC.
#[derive(Debug, Clone)]
pub struct BinEnsemble<M> {
    /// One model per bin
    pub models: Vec<M>,
    /// Cross-validated ROC-AUC of each model
    pub cv_scores: Vec<f64>,
}

/// Train one bin-membership classifier per bin of `assignment`.
///
/// Bins are trained in parallel; the result is in bin order.
pub fn train_bin_models<C: Classifier>(
    classifier: &C,
    entries: &[Entry],
    assignment: &BinAssignment,
    validation: ValidationKind,
) -> Result<BinEnsemble<C::Model>> {
    if assignment.num_entries() != entries.len() {
        return Err(CompositeError::internal(format!(
            "bin assignment covers {} entries, expected {}",
            assignment.num_entries(),
            entries.len()
        )));
    }

    let trained: Vec<(C::Model, f64)> = (0..assignment.num_bins())
        .into_par_iter()
        .map(|bin| {
            let training: Vec<(&FeatureSet, bool)> = entries
                .iter()
                .zip(assignment.bins())
                .map(|(entry, &b)| (entry.features(), b == bin))
                .collect();
            let model = classifier.build(&training)?;
            let roc = classifier.cross_validate(&model, validation)?;
            log::debug!(
                "bin {}: {} members, {} ROC-AUC {:.4}",
                bin,
                assignment.members(bin).len(),
                validation,
                roc
            );
            Ok((model, roc))
        })
        .collect::<Result<_>>()?;

    let (models, cv_scores) = trained.into_iter().unzip();
    Ok(BinEnsemble { models, cv_scores })
}

/// Calibrated score of every model for one feature set.
pub fn score_bins<C: Classifier>(classifier: &C, models: &[C::Model], features: &FeatureSet) -> Result<Vec<Score>> {
    models
        .iter()
        .map(|model| classifier.predict(model, features))
        .collect()
}

/// Score every entry with every model and count the argmax bin against the
/// true bin given in `true_bins`.
pub fn build_validation_matrix<C: Classifier>(
    classifier: &C,
    models: &[C::Model],
    entries: &[Entry],
    true_bins: &[BinIndex],
) -> Result<ValidationMatrix> {
    if true_bins.len() != entries.len() {
        return Err(CompositeError::internal(format!(
            "{} true bins supplied for {} entries",
            true_bins.len(),
            entries.len()
        )));
    }
    let num_bins = models.len();
    if let Some(&bad) = true_bins.iter().find(|&&b| b >= num_bins) {
        return Err(CompositeError::internal(format!(
            "true bin {} out of range for {} models",
            bad, num_bins
        )));
    }

    let predicted: Vec<BinIndex> = entries
        .par_iter()
        .map(|entry| score_bins(classifier, models, entry.features()).map(|scores| argmax(&scores)))
        .collect::<Result<_>>()?;

    let mut matrix = ValidationMatrix::new(num_bins);
    for (&truth, guess) in true_bins.iter().zip(predicted) {
        matrix.record(truth, guess);
    }
    Ok(matrix)
}
