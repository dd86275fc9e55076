//! Search for the number and position of cut points.
//!
//! Candidate cuts are the midpoints between adjacent distinct values of a
//! diversified subsample. Each candidate is ranked by a desirability that
//! combines three terms, lower being better:
//!
//! * `1 - roc`: how poorly a classifier separates the two sides
//! * `1 - curvature`: how far the cut is from a valley of the value density
//! * `balance`: how lopsided the split of the full entry set is
//!
//! The best candidate becomes the first cut. Further cuts are added greedily
//! from the runners-up, each time choosing the one whose two new sub-bins a
//! classifier separates best, until the bin cap is reached, no candidate
//! keeps every bin large enough, or separability drops below
//! [`SegmentationConfig::min_roc_split`].

use crate::config::SegmentationConfig;
use crate::core::error::{CompositeError, Result};
use crate::core::traits::Classifier;
use crate::core::types::Value;
use crate::dataset::{Entry, EntrySet};
use crate::sampling::DiversitySubsampler;
use crate::segmentation::cutpoint::CutpointScorer;
use crate::segmentation::density::DensityProfile;
use crate::segmentation::{midpoints, normalize_min_max, Segments};
use rayon::prelude::*;

/// A candidate cut with the terms of its desirability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCut {
    /// Cut value
    pub cut: Value,
    /// Normalized separability, 1 = most separable candidate
    pub roc: f64,
    /// Normalized density curvature at the cut, 1 = deepest valley
    pub curvature: f64,
    /// Rescaled class-balance ratio
    pub balance: f64,
    /// Combined score, lower is better
    pub desirability: f64,
}

/// Determines segments for an entry set with a given classifier.
#[derive(Debug)]
pub struct SegmentationSearch<'a, C> {
    classifier: &'a C,
    config: &'a SegmentationConfig,
}

impl<'a, C: Classifier> SegmentationSearch<'a, C> {
    /// Create a search over `classifier` tuned by `config`.
    pub fn new(classifier: &'a C, config: &'a SegmentationConfig) -> Self {
        SegmentationSearch { classifier, config }
    }

    /// Choose the segments for `entries`.
    pub fn determine(&self, entries: &EntrySet) -> Result<Segments> {
        let ranked = self.rank_candidates(entries)?;
        let Some(best) = ranked.first() else {
            return Err(CompositeError::insufficient_data("no cut-point candidates survived"));
        };

        let pool: Vec<Value> = ranked
            .iter()
            .skip(1)
            .take(self.config.max_candidates)
            .map(|c| c.cut)
            .collect();
        log::debug!(
            "primary cut {:.4} (desirability {:.4}), {} refinement candidates",
            best.cut,
            best.desirability,
            pool.len()
        );

        let segments = self.refine(entries, Segments::new(vec![best.cut])?, pool)?;
        log::info!(
            "selected {} segments ({} bins) for {} entries",
            segments.len(),
            segments.num_bins(),
            entries.len()
        );
        Ok(segments)
    }

    /// Every admissible cut for `entries`, best first.
    ///
    /// Fails with `InsufficientData` when the entry set is empty or smaller
    /// than `min_bins`, or when fewer than `min_bins` candidates exist before
    /// or after discarding those that would leave a side below the minimum
    /// bin size.
    pub fn rank_candidates(&self, entries: &EntrySet) -> Result<Vec<RankedCut>> {
        let total = entries.len();
        let min_bins = self.config.min_bins;
        if total == 0 {
            return Err(CompositeError::insufficient_data("no entries provided"));
        }
        if total < min_bins {
            return Err(CompositeError::insufficient_data(format!(
                "{} entries cannot fill {} bins",
                total, min_bins
            )));
        }

        let subset = DiversitySubsampler::from_config(self.config).subsample(entries.entries());
        let sample = entries.select(&subset);
        let mut values: Vec<Value> = sample.iter().map(|e| e.value()).collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let cuts = midpoints(&values);
        if cuts.len() < min_bins {
            return Err(CompositeError::insufficient_data(format!(
                "only {} cut-point candidates for at least {} bins",
                cuts.len(),
                min_bins
            )));
        }
        log::debug!(
            "scoring {} candidate cuts over a subsample of {} of {} entries",
            cuts.len(),
            sample.len(),
            total
        );

        let scorer = CutpointScorer::new(self.classifier);
        let mut rocs: Vec<f64> = cuts
            .par_iter()
            .map(|&cut| scorer.score(cut, &sample))
            .collect::<Result<_>>()?;
        normalize_min_max(&mut rocs);

        let profile = DensityProfile::from_config(&values, self.config)?;

        let mut all_values = entries.values();
        all_values.sort_by(|a, b| a.total_cmp(b));
        let min_size = self.config.min_bin_size(total);

        let mut candidates: Vec<RankedCut> = cuts
            .iter()
            .zip(rocs)
            .filter_map(|(&cut, roc)| {
                let below = all_values.partition_point(|&v| v < cut);
                let above = total - below;
                if below.min(above) < min_size {
                    return None;
                }
                let (a, b) = (above as f64 + 1.0, below as f64 + 1.0);
                Some(RankedCut {
                    cut,
                    roc,
                    curvature: profile.curvature_at(cut),
                    balance: (a / b).max(b / a),
                    desirability: 0.0,
                })
            })
            .collect();

        if candidates.is_empty() || candidates.len() < min_bins {
            return Err(CompositeError::insufficient_data(format!(
                "only {} cut-point candidates leave bins of at least {} entries",
                candidates.len(),
                min_size
            )));
        }

        self.rescale_balance(&mut candidates);
        for c in candidates.iter_mut() {
            c.desirability = (1.0 - c.roc) + (1.0 - c.curvature) + c.balance;
        }
        candidates.sort_by(|a, b| a.desirability.total_cmp(&b.desirability));

        for c in candidates.iter().take(5) {
            log::trace!(
                "cut {:.4}: roc {:.3} curvature {:.3} balance {:.3} -> {:.3}",
                c.cut,
                c.roc,
                c.curvature,
                c.balance,
                c.desirability
            );
        }
        Ok(candidates)
    }

    /// Divide balance ratios by their configured percentile.
    fn rescale_balance(&self, candidates: &mut [RankedCut]) {
        if candidates.is_empty() {
            return;
        }
        let mut ratios: Vec<f64> = candidates.iter().map(|c| c.balance).collect();
        ratios.sort_by(|a, b| a.total_cmp(b));
        let index = ((self.config.balance_percentile * ratios.len() as f64) as usize).min(ratios.len() - 1);
        let divisor = ratios[index];

        if !(divisor > 0.0 && divisor.is_finite()) {
            log::warn!("balance ratio percentile is {}, leaving ratios unscaled", divisor);
            return;
        }
        for c in candidates.iter_mut() {
            c.balance /= divisor;
        }
    }

    /// Greedily add cuts from `pool` to `segments`.
    fn refine(&self, entries: &EntrySet, mut segments: Segments, mut pool: Vec<Value>) -> Result<Segments> {
        let min_size = self.config.min_bin_size(entries.len());
        let max_segments = self.config.max_segments();
        let subsampler = DiversitySubsampler::from_config(self.config);

        while !pool.is_empty() && segments.len() < max_segments {
            // Decide every candidate first, then rebuild the pool from the survivors
            let proposals: Vec<Option<(Segments, usize)>> = pool
                .iter()
                .map(|&cut| {
                    segments
                        .insert(cut)
                        .filter(|(finer, _)| finer.bin_sizes(entries.entries()).iter().all(|&n| n >= min_size))
                })
                .collect();

            let mut survivors = Vec::with_capacity(pool.len());
            let mut viable = Vec::with_capacity(pool.len());
            for (cut, proposal) in pool.into_iter().zip(proposals) {
                if let Some(proposal) = proposal {
                    survivors.push(cut);
                    viable.push(proposal);
                }
            }
            pool = survivors;
            if viable.is_empty() {
                log::debug!("no refinement candidate keeps every bin at {} entries", min_size);
                break;
            }

            let rocs: Vec<f64> = viable
                .par_iter()
                .map(|(finer, index)| self.split_roc(entries, finer, *index, &subsampler))
                .collect::<Result<_>>()?;

            let mut best = 0;
            for (i, &roc) in rocs.iter().enumerate().skip(1) {
                if roc > rocs[best] {
                    best = i;
                }
            }
            let best_roc = rocs[best];

            if segments.len() > 1 && best_roc < self.config.min_roc_split {
                log::debug!(
                    "stopping refinement: best split ROC {:.4} below {}",
                    best_roc,
                    self.config.min_roc_split
                );
                break;
            }

            log::debug!("adding cut {:.4} with split ROC {:.4}", pool[best], best_roc);
            segments = viable.swap_remove(best).0;
            pool.remove(best);
        }

        Ok(segments)
    }

    /// ROC-AUC of separating the two bins on either side of the cut at
    /// `index`, each diversified on its own when larger than the subsample
    /// size.
    fn split_roc(
        &self,
        entries: &EntrySet,
        segments: &Segments,
        index: usize,
        subsampler: &DiversitySubsampler,
    ) -> Result<f64> {
        let assignment = segments.assign(entries.entries());
        let low = diversify(entries.select(assignment.members(index)), subsampler);
        let high = diversify(entries.select(assignment.members(index + 1)), subsampler);
        CutpointScorer::new(self.classifier).score_partitions(&low, &high)
    }
}

fn diversify<'e>(partition: Vec<&'e Entry>, subsampler: &DiversitySubsampler) -> Vec<&'e Entry> {
    if partition.len() <= subsampler.target_size() {
        return partition;
    }
    subsampler
        .subsample(&partition)
        .into_iter()
        .map(|i| partition[i])
        .collect()
}
