//! Entry point for building a [`CompositeModel`] from an entry set.

use crate::config::SegmentationConfig;
use crate::core::error::{CompositeError, Result};
use crate::core::traits::Classifier;
use crate::dataset::EntrySet;
use crate::ensemble::{build_validation_matrix, train_bin_models};
use crate::model::composite::CompositeModel;
use crate::segmentation::{SegmentationSearch, Segments};
use crate::{ensure, insufficient_data, invalid_configuration};

/// Builds a composite model over a frozen entry set.
///
/// Segments are either supplied with [`ModelTrainer::with_segments`] or
/// searched for by [`ModelTrainer::calculate`]. They can also be searched for
/// ahead of time with [`ModelTrainer::determine_segments`], inspected or
/// edited, and supplied back.
#[derive(Debug, Clone)]
pub struct ModelTrainer<C: Classifier> {
    classifier: C,
    config: SegmentationConfig,
    entries: EntrySet,
    segments: Option<Vec<f64>>,
}

impl<C: Classifier> ModelTrainer<C> {
    /// Create a trainer; the configuration is validated up front.
    pub fn new(classifier: C, config: SegmentationConfig, entries: EntrySet) -> Result<Self> {
        config.validate()?;
        Ok(ModelTrainer {
            classifier,
            config,
            entries,
            segments: None,
        })
    }

    /// Use a fixed segment list instead of searching for one. It is checked
    /// when [`calculate`](Self::calculate) runs.
    pub fn with_segments(mut self, segments: Vec<f64>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Replace or clear the fixed segment list.
    pub fn set_segments(&mut self, segments: Option<Vec<f64>>) {
        self.segments = segments;
    }

    /// Fixed segment list, if one was supplied.
    pub fn segments(&self) -> Option<&[f64]> {
        self.segments.as_deref()
    }

    /// The entries the model is trained on.
    pub fn entries(&self) -> &EntrySet {
        &self.entries
    }

    /// The active configuration.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// The classifier used for every model.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Search for segments without training the ensemble.
    pub fn determine_segments(&self) -> Result<Segments> {
        self.check_entries()?;
        let search = SegmentationSearch::new(&self.classifier, &self.config);
        self.config.install(|| search.determine(&self.entries))?
    }

    /// Segment the entries (unless segments were supplied), train one model
    /// per bin and score the training entries into a validation matrix.
    pub fn calculate(self) -> Result<CompositeModel<C>> {
        self.check_entries()?;
        let supplied = self.checked_segments()?;

        let segments = match supplied {
            Some(segments) => segments,
            None => self.determine_segments()?,
        };

        let range = self
            .entries
            .value_range()
            .ok_or_else(|| CompositeError::insufficient_data("no entries provided"))?;
        let assignment = segments.assign(self.entries.entries());
        log::info!(
            "training {} bin models on {} entries (bin sizes {:?})",
            segments.num_bins(),
            self.entries.len(),
            assignment.sizes()
        );

        let (ensemble, matrix) = self.config.install(|| -> Result<_> {
            let ensemble = train_bin_models(
                &self.classifier,
                self.entries.entries(),
                &assignment,
                self.config.ensemble_validation,
            )?;
            let matrix = build_validation_matrix(
                &self.classifier,
                &ensemble.models,
                self.entries.entries(),
                assignment.bins(),
            )?;
            Ok((ensemble, matrix))
        })??;

        log::info!(
            "composite model ready: {:.1}% of training entries in the true bin",
            matrix.accuracy() * 100.0
        );

        Ok(CompositeModel::from_training(
            self.classifier,
            segments,
            range,
            ensemble.models,
            ensemble.cv_scores,
            matrix,
            assignment,
        ))
    }

    fn check_entries(&self) -> Result<()> {
        let num = self.entries.len();
        ensure!(num > 0, insufficient_data!("no entries provided"));
        ensure!(
            num >= self.config.min_bins,
            insufficient_data!("min bins = {} but only {} entries", self.config.min_bins, num)
        );
        Ok(())
    }

    /// Validate the supplied segment list against the entries.
    fn checked_segments(&self) -> Result<Option<Segments>> {
        let Some(cuts) = &self.segments else {
            return Ok(None);
        };

        let num = self.entries.len();
        ensure!(
            cuts.len() + 1 < num,
            invalid_configuration!("{} segments supplied for only {} entries", cuts.len(), num)
        );

        let segments = Segments::new(cuts.clone())?;
        let sizes = segments.bin_sizes(self.entries.entries());
        if let Some(bin) = sizes.iter().position(|&n| n == 0) {
            return Err(invalid_configuration!("supplied segments leave bin {} empty", bin));
        }
        Ok(Some(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bayes::NaiveBayesClassifier;
    use crate::dataset::{Entry, FeatureSet};

    fn entries(values: &[f64]) -> EntrySet {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Entry::new(FeatureSet::new(vec![(v / 10.0) as i32, 500 + i as i32]), v).unwrap())
            .collect()
    }

    fn trainer(values: &[f64]) -> ModelTrainer<NaiveBayesClassifier> {
        ModelTrainer::new(NaiveBayesClassifier::new(), SegmentationConfig::default(), entries(values)).unwrap()
    }

    #[test]
    fn test_no_entries() {
        let result = trainer(&[]).calculate();
        assert!(matches!(result, Err(CompositeError::InsufficientData { .. })));
    }

    #[test]
    fn test_fewer_entries_than_bins() {
        let result = trainer(&[1.0, 2.0]).calculate();
        assert!(matches!(result, Err(CompositeError::InsufficientData { .. })));
    }

    #[test]
    fn test_too_many_supplied_segments() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = trainer(&values).with_segments(vec![1.5, 2.5, 3.5, 4.5]).calculate();
        assert!(matches!(result, Err(CompositeError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_unsorted_or_emptying_segments() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = trainer(&values).with_segments(vec![4.5, 2.5]).calculate();
        assert!(matches!(result, Err(CompositeError::InvalidConfiguration { .. })));

        // nothing lies in [2.1, 2.2)
        let result = trainer(&values).with_segments(vec![2.1, 2.2]).calculate();
        assert!(matches!(result, Err(CompositeError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_supplied_segments_are_used() {
        let values: Vec<f64> = (0..12).map(|i| (i / 4) as f64 * 10.0 + (i % 4) as f64).collect();
        let model = trainer(&values).with_segments(vec![5.0, 15.0]).calculate().unwrap();

        assert_eq!(model.segments().as_slice(), &[5.0, 15.0]);
        assert_eq!(model.boundaries(), vec![0.0, 5.0, 15.0, 23.0]);
        assert_eq!(model.num_models(), 3);
        assert_eq!(model.cv_scores().map(<[f64]>::len), Some(3));

        let matrix = model.validation_matrix().unwrap();
        assert_eq!(matrix.row_sums(), vec![4, 4, 4]);
        assert_eq!(matrix.total(), 12);
        assert_eq!(model.assigned_bins().unwrap().sizes(), vec![4, 4, 4]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SegmentationConfig {
            min_bins: 6,
            max_bins: 4,
            ..SegmentationConfig::default()
        };
        assert!(ModelTrainer::new(NaiveBayesClassifier::new(), config, entries(&[1.0])).is_err());
    }
}
