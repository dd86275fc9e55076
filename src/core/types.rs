//! Core data types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single binary feature (for example a hashed n-gram).
pub type FeatureId = i32;

/// Continuous label value attached to each entry.
pub type Value = f64;

/// Raw or calibrated classifier output.
pub type Score = f64;

/// Index of a bin, `0..num_bins`.
pub type BinIndex = usize;

/// Cross-validation protocol requested from a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationKind {
    /// Each entry is predicted by a model trained on all other entries
    LeaveOneOut,
    /// Entries are split into five stratified folds
    FiveFold,
}

impl ValidationKind {
    /// Number of folds for fold-based protocols.
    pub fn num_folds(&self) -> Option<usize> {
        match self {
            ValidationKind::LeaveOneOut => None,
            ValidationKind::FiveFold => Some(5),
        }
    }
}

impl Default for ValidationKind {
    fn default() -> Self {
        ValidationKind::FiveFold
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::LeaveOneOut => write!(f, "leave_one_out"),
            ValidationKind::FiveFold => write!(f, "five_fold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kind() {
        assert_eq!(ValidationKind::default(), ValidationKind::FiveFold);
        assert_eq!(ValidationKind::FiveFold.num_folds(), Some(5));
        assert_eq!(ValidationKind::LeaveOneOut.num_folds(), None);
        assert_eq!(ValidationKind::LeaveOneOut.to_string(), "leave_one_out");
    }
}
