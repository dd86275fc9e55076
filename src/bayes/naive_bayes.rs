//! Laplacian-corrected naive Bayes over sparse binary features.
//!
//! Each feature contributes `ln((AT + 1) / (T * R + 1))`, where `AT` is the
//! number of positive training entries carrying it, `T` the number of entries
//! carrying it and `R` the overall positive rate. The raw score of a sample is
//! the sum of the contributions of its features. Raw scores are calibrated so
//! that the median training negative maps to 0 and the median training
//! positive to 1.

use crate::core::error::{CompositeError, Result};
use crate::core::traits::Classifier;
use crate::core::types::{FeatureId, Score, ValidationKind};
use crate::dataset::FeatureSet;
use crate::metrics::roc_auc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Reference [`Classifier`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaiveBayesClassifier {
    feature_space: Option<String>,
}

impl NaiveBayesClassifier {
    /// Classifier for an unnamed feature space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier whose models are tagged with a feature space, e.g. the
    /// [`NgramExtractor::feature_space`](crate::dataset::NgramExtractor::feature_space)
    /// tag. Models built for another tag are rejected as incompatible.
    pub fn for_feature_space<S: Into<String>>(tag: S) -> Self {
        NaiveBayesClassifier {
            feature_space: Some(tag.into()),
        }
    }

    /// Feature-space tag, if any.
    pub fn feature_space(&self) -> Option<&str> {
        self.feature_space.as_deref()
    }
}

/// Trained naive Bayes model.
///
/// The training data is kept for cross-validation but is not serialized; a
/// deserialized model predicts normally and refuses to cross-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    feature_space: Option<String>,
    contributions: BTreeMap<FeatureId, f64>,
    calibration_low: f64,
    calibration_range: f64,
    num_positive: usize,
    num_total: usize,
    #[serde(skip)]
    training: Vec<(FeatureSet, bool)>,
}

impl NaiveBayesModel {
    /// Feature-space tag the model was built for.
    pub fn feature_space(&self) -> Option<&str> {
        self.feature_space.as_deref()
    }

    /// Log-odds contribution of a feature; 0 for features never seen.
    pub fn contribution(&self, id: FeatureId) -> f64 {
        self.contributions.get(&id).copied().unwrap_or(0.0)
    }

    /// Number of distinct features seen in training.
    pub fn num_features(&self) -> usize {
        self.contributions.len()
    }

    /// Positive training entries.
    pub fn num_positive(&self) -> usize {
        self.num_positive
    }

    /// All training entries.
    pub fn num_total(&self) -> usize {
        self.num_total
    }

    /// Whether the training data needed for cross-validation is present.
    pub fn has_training_data(&self) -> bool {
        !self.training.is_empty()
    }

    /// Uncalibrated score: the sum of the contributions of `features`.
    pub fn raw_score(&self, features: &FeatureSet) -> f64 {
        features.iter().map(|&id| self.contribution(id)).sum()
    }

    /// Map a raw score onto the calibrated scale.
    pub fn calibrate(&self, raw: f64) -> f64 {
        if self.calibration_range > 0.0 {
            (raw - self.calibration_low) / self.calibration_range
        } else if raw >= self.calibration_low {
            1.0
        } else {
            0.0
        }
    }
}

/// Per-feature `(entries carrying it, positives carrying it)`.
type FeatureCounts = HashMap<FeatureId, (usize, usize)>;

fn tally<'a, I>(entries: I) -> FeatureCounts
where
    I: IntoIterator<Item = (&'a FeatureSet, bool)>,
{
    let mut counts = FeatureCounts::new();
    for (features, label) in entries {
        for &id in features {
            let slot = counts.entry(id).or_insert((0, 0));
            slot.0 += 1;
            if label {
                slot.1 += 1;
            }
        }
    }
    counts
}

fn contribution(active: usize, positive: usize, rate: f64) -> f64 {
    ((positive as f64 + 1.0) / (active as f64 * rate + 1.0)).ln()
}

fn positive_rate(positive: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        positive as f64 / total as f64
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 1 {
        values[mid]
    } else {
        0.5 * (values[mid - 1] + values[mid])
    })
}

/// Stratified round-robin assignment of entries to `k` folds.
fn stratified_folds(labels: &[bool], k: usize) -> Vec<Vec<usize>> {
    let mut folds = vec![Vec::new(); k];
    let (mut next_positive, mut next_negative) = (0, 0);
    for (i, &label) in labels.iter().enumerate() {
        let counter = if label {
            &mut next_positive
        } else {
            &mut next_negative
        };
        folds[*counter % k].push(i);
        *counter += 1;
    }
    folds.retain(|fold| !fold.is_empty());
    folds
}

impl NaiveBayesClassifier {
    /// Raw scores of every training entry, each computed from counts with its
    /// own fold removed.
    fn held_out_scores(&self, model: &NaiveBayesModel, folds: &[Vec<usize>]) -> Vec<f64> {
        let training = &model.training;
        let counts = tally(training.iter().map(|(f, l)| (f, *l)));
        let mut scores = vec![0.0; training.len()];

        for fold in folds {
            let removed = tally(fold.iter().map(|&i| (&training[i].0, training[i].1)));
            let fold_positive = fold.iter().filter(|&&i| training[i].1).count();
            let rate = positive_rate(
                model.num_positive - fold_positive,
                model.num_total - fold.len(),
            );

            for &i in fold {
                scores[i] = training[i]
                    .0
                    .iter()
                    .map(|id| {
                        let (active, positive) = counts.get(id).copied().unwrap_or((0, 0));
                        let (gone_active, gone_positive) = removed.get(id).copied().unwrap_or((0, 0));
                        contribution(active - gone_active, positive - gone_positive, rate)
                    })
                    .sum();
            }
        }
        scores
    }
}

impl Classifier for NaiveBayesClassifier {
    type Model = NaiveBayesModel;

    fn build(&self, training: &[(&FeatureSet, bool)]) -> Result<NaiveBayesModel> {
        if training.is_empty() {
            return Err(CompositeError::classifier(
                "cannot build a naive Bayes model without training entries",
            ));
        }

        let num_total = training.len();
        let num_positive = training.iter().filter(|(_, label)| *label).count();
        let rate = positive_rate(num_positive, num_total);

        let contributions: BTreeMap<FeatureId, f64> = tally(training.iter().copied())
            .into_iter()
            .map(|(id, (active, positive))| (id, contribution(active, positive, rate)))
            .collect();

        let mut model = NaiveBayesModel {
            feature_space: self.feature_space.clone(),
            contributions,
            calibration_low: 0.0,
            calibration_range: 0.0,
            num_positive,
            num_total,
            training: training.iter().map(|&(f, l)| (f.clone(), l)).collect(),
        };

        let (mut positives, mut negatives): (Vec<f64>, Vec<f64>) = (Vec::new(), Vec::new());
        for &(features, label) in training {
            let raw = model.raw_score(features);
            if label {
                positives.push(raw);
            } else {
                negatives.push(raw);
            }
        }

        // Extremes stand in for a missing class so the model stays serializable
        let (low, high) = match (median(&mut negatives), median(&mut positives)) {
            (Some(low), Some(high)) => (low, high),
            (Some(_), None) => (f64::MAX, f64::MAX),
            (None, _) => (f64::MIN, f64::MIN),
        };
        model.calibration_low = low;
        model.calibration_range = high - low;

        log::trace!(
            "naive Bayes model: {} of {} positive, {} features",
            num_positive,
            num_total,
            model.contributions.len()
        );
        Ok(model)
    }

    fn predict_raw(&self, model: &NaiveBayesModel, features: &FeatureSet) -> Result<Score> {
        Ok(model.raw_score(features))
    }

    fn scale_predictor(&self, model: &NaiveBayesModel, raw: Score) -> Score {
        model.calibrate(raw)
    }

    fn cross_validate(&self, model: &NaiveBayesModel, kind: ValidationKind) -> Result<f64> {
        if !model.has_training_data() {
            return Err(CompositeError::classifier(
                "model carries no training data to cross-validate",
            ));
        }

        let labels: Vec<bool> = model.training.iter().map(|(_, label)| *label).collect();
        let folds = match kind.num_folds() {
            Some(k) => stratified_folds(&labels, k),
            None => (0..labels.len()).map(|i| vec![i]).collect(),
        };

        let scores = self.held_out_scores(model, &folds);
        Ok(roc_auc(&scores, &labels))
    }

    fn is_compatible(&self, model: &NaiveBayesModel) -> bool {
        model.feature_space == self.feature_space
    }
}
