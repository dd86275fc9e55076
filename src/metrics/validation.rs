//! Confusion matrix of true against predicted bins, and the off-by-N
//! enrichment report derived from it.

use crate::core::error::{CompositeError, Result};
use crate::core::types::BinIndex;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Square count matrix indexed `[true_bin][predicted_bin]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMatrix {
    counts: Array2<usize>,
}

/// Cumulative accuracy when predictions up to `distance` bins away count as
/// hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffByStat {
    /// Distance between true and predicted bin
    pub distance: usize,
    /// Predictions exactly `distance` bins away
    pub count: usize,
    /// Fraction of predictions at most `distance` bins away
    pub portion: f64,
    /// Same fraction expected from uniformly random predictions
    pub random: f64,
    /// `portion / random`
    pub enrichment: f64,
}

impl ValidationMatrix {
    /// Zero matrix for `num_bins` bins.
    pub fn new(num_bins: usize) -> Self {
        ValidationMatrix {
            counts: Array2::zeros((num_bins, num_bins)),
        }
    }

    /// Wrap an existing count matrix, which must be square.
    pub fn from_counts(counts: Array2<usize>) -> Result<Self> {
        if counts.nrows() != counts.ncols() {
            return Err(CompositeError::invalid_configuration(format!(
                "validation matrix must be square, got {}x{}",
                counts.nrows(),
                counts.ncols()
            )));
        }
        Ok(ValidationMatrix { counts })
    }

    /// Count one prediction.
    ///
    /// # Panics
    ///
    /// Panics if either bin is out of range.
    pub fn record(&mut self, true_bin: BinIndex, predicted_bin: BinIndex) {
        self.counts[[true_bin, predicted_bin]] += 1;
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.counts.nrows()
    }

    /// Count at `[true_bin][predicted_bin]`, or 0 out of range.
    pub fn get(&self, true_bin: BinIndex, predicted_bin: BinIndex) -> usize {
        self.counts.get([true_bin, predicted_bin]).copied().unwrap_or(0)
    }

    /// The underlying count matrix.
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Entries scored per true bin.
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts.rows().into_iter().map(|row| row.sum()).collect()
    }

    /// Predictions landing in each bin.
    pub fn column_sums(&self) -> Vec<usize> {
        self.counts.columns().into_iter().map(|col| col.sum()).collect()
    }

    /// Total number of scored entries.
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Fraction of entries predicted in their true bin.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts.diag().sum() as f64 / total as f64
    }

    /// Predictions exactly `d` bins away from the truth, for every `d`.
    pub fn off_counts(&self) -> Vec<usize> {
        let n = self.num_bins();
        let mut off = vec![0; n];
        for ((i, j), &count) in self.counts.indexed_iter() {
            off[i.abs_diff(j)] += count;
        }
        off
    }

    /// Cumulative off-by-N report against the random-guess baseline.
    ///
    /// The baseline for distance 0 is `1 / n`, and `2 (n - d) / n²` for
    /// every further distance `d`; both observed and baseline fractions
    /// accumulate with distance, so the last row always reaches 1.
    pub fn off_by_stats(&self) -> Vec<OffByStat> {
        let n = self.num_bins();
        let total = self.total();
        let nf = n as f64;

        let mut portion = 0.0;
        let mut random = 0.0;
        self.off_counts()
            .into_iter()
            .enumerate()
            .map(|(distance, count)| {
                if total > 0 {
                    portion += count as f64 / total as f64;
                }
                random += if distance == 0 {
                    1.0 / nf
                } else {
                    2.0 * (nf - distance as f64) / (nf * nf)
                };
                OffByStat {
                    distance,
                    count,
                    portion,
                    random,
                    enrichment: portion / random,
                }
            })
            .collect()
    }
}
