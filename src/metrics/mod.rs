//! Evaluation metrics for per-bin classifiers and the whole ensemble.
//!
//! - [`roc`]: rank-based ROC-AUC used by cross-validation and cut-point scoring
//! - [`validation`]: the true-versus-predicted bin matrix and its off-by-N report

pub mod roc;
pub mod validation;

pub use roc::roc_auc;
pub use validation::{OffByStat, ValidationMatrix};
