//! Cut points and the bins they define.
//!
//! Bins are right-open: bin 0 holds values below the first cut, bin `k`
//! holds `[cuts[k - 1], cuts[k])`, and the last bin holds everything at or
//! above the last cut.

use crate::core::error::{CompositeError, Result};
use crate::core::types::{BinIndex, Value};
use crate::dataset::Entry;
use serde::{Deserialize, Serialize};

/// Strictly ascending, finite cut values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Segments {
    cuts: Vec<Value>,
}

impl Segments {
    /// Validate a list of cut values.
    pub fn new(cuts: Vec<Value>) -> Result<Self> {
        if let Some(bad) = cuts.iter().find(|c| !c.is_finite()) {
            return Err(CompositeError::invalid_configuration(format!(
                "segment value {} is not finite",
                bad
            )));
        }
        if let Some(w) = cuts.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CompositeError::invalid_configuration(format!(
                "segments must be strictly ascending, found {} before {}",
                w[0], w[1]
            )));
        }
        Ok(Segments { cuts })
    }

    /// No cuts: a single bin.
    pub fn empty() -> Self {
        Segments { cuts: Vec::new() }
    }

    /// Cut values in ascending order.
    pub fn as_slice(&self) -> &[Value] {
        &self.cuts
    }

    /// Number of cuts.
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Whether there are no cuts.
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Number of bins, one more than the number of cuts.
    pub fn num_bins(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Bin of a value: the number of cuts it is greater than or equal to.
    pub fn bin_of(&self, value: Value) -> BinIndex {
        self.cuts.partition_point(|&cut| value >= cut)
    }

    /// The segment list with `cut` inserted in order, plus the insertion
    /// index. The two bins split by the new cut are `index` and `index + 1`.
    ///
    /// Returns `None` when `cut` is not finite or already present.
    pub fn insert(&self, cut: Value) -> Option<(Segments, usize)> {
        if !cut.is_finite() {
            return None;
        }
        let index = self.cuts.partition_point(|&c| c < cut);
        if self.cuts.get(index) == Some(&cut) {
            return None;
        }
        let mut cuts = self.cuts.clone();
        cuts.insert(index, cut);
        Some((Segments { cuts }, index))
    }

    /// Assign every entry to its bin.
    pub fn assign<E: AsRef<Entry>>(&self, entries: &[E]) -> BinAssignment {
        let mut members = vec![Vec::new(); self.num_bins()];
        let bin_of_entry = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let bin = self.bin_of(e.as_ref().value());
                members[bin].push(i);
                bin
            })
            .collect();
        BinAssignment {
            bin_of_entry,
            members,
        }
    }

    /// Population of every bin, without keeping the membership lists.
    pub fn bin_sizes<E: AsRef<Entry>>(&self, entries: &[E]) -> Vec<usize> {
        let mut sizes = vec![0; self.num_bins()];
        for e in entries {
            sizes[self.bin_of(e.as_ref().value())] += 1;
        }
        sizes
    }
}

impl TryFrom<Vec<f64>> for Segments {
    type Error = CompositeError;

    fn try_from(cuts: Vec<f64>) -> Result<Self> {
        Segments::new(cuts)
    }
}

impl From<Segments> for Vec<f64> {
    fn from(segments: Segments) -> Self {
        segments.cuts
    }
}

/// Bin of every entry, and the entries of every bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinAssignment {
    bin_of_entry: Vec<BinIndex>,
    members: Vec<Vec<usize>>,
}

impl BinAssignment {
    /// Number of bins, empty ones included.
    pub fn num_bins(&self) -> usize {
        self.members.len()
    }

    /// Number of assigned entries.
    pub fn num_entries(&self) -> usize {
        self.bin_of_entry.len()
    }

    /// Bin index per entry, in entry order.
    pub fn bins(&self) -> &[BinIndex] {
        &self.bin_of_entry
    }

    /// Bin of the entry at `index`.
    pub fn bin_of(&self, index: usize) -> Option<BinIndex> {
        self.bin_of_entry.get(index).copied()
    }

    /// Entry indices (ascending) that fall into bin `bin`.
    pub fn members(&self, bin: BinIndex) -> &[usize] {
        self.members.get(bin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Membership lists of all bins.
    pub fn all_members(&self) -> &[Vec<usize>] {
        &self.members
    }

    /// Population of every bin.
    pub fn sizes(&self) -> Vec<usize> {
        self.members.iter().map(Vec::len).collect()
    }

    /// Population of the smallest bin.
    pub fn smallest(&self) -> usize {
        self.members.iter().map(Vec::len).min().unwrap_or(0)
    }
}
