//! Per-bin scores for a sample, with the winning bin and a confidence.

use crate::core::types::{BinIndex, Score};
use serde::{Deserialize, Serialize};

/// Calibrated score of every bin's classifier for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinPrediction {
    scores: Vec<Score>,
    best_bin: BinIndex,
    confidence: f64,
}

/// Score clamped to `[0, 1]`; NaN counts as 0.
fn clamp_unit(score: Score) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Index of the first highest score, ignoring NaN. 0 when nothing compares.
pub fn argmax(scores: &[Score]) -> BinIndex {
    let mut best = 0;
    let mut highest = f64::NEG_INFINITY;
    for (i, &score) in scores.iter().enumerate() {
        if score > highest {
            best = i;
            highest = score;
        }
    }
    best
}

impl BinPrediction {
    /// Derive the best bin and confidence from raw per-bin scores.
    ///
    /// Confidence is `c[best]² / Σ c[i]` over the scores clamped to `[0, 1]`,
    /// and 0 when the clamped best score is 0.
    pub fn from_scores(scores: Vec<Score>) -> Self {
        let best_bin = argmax(&scores);
        let best = scores.get(best_bin).copied().map_or(0.0, clamp_unit);
        let confidence = if best > 0.0 {
            let sum: f64 = scores.iter().copied().map(clamp_unit).sum();
            best * best / sum
        } else {
            0.0
        };

        BinPrediction {
            scores,
            best_bin,
            confidence,
        }
    }

    /// Score per bin.
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// Number of bins scored.
    pub fn num_bins(&self) -> usize {
        self.scores.len()
    }

    /// Bin with the highest score.
    pub fn best_bin(&self) -> BinIndex {
        self.best_bin
    }

    /// Score of the best bin.
    pub fn best_score(&self) -> Score {
        self.scores.get(self.best_bin).copied().unwrap_or(0.0)
    }

    /// Confidence in the best bin, in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Bins ordered from highest to lowest score.
    pub fn ranked_bins(&self) -> Vec<BinIndex> {
        let mut bins: Vec<BinIndex> = (0..self.scores.len()).collect();
        bins.sort_by(|&a, &b| self.scores[b].total_cmp(&self.scores[a]));
        bins
    }
}
