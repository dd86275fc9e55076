//! Adaptive discretization of the label range.
//!
//! - [`density`]: smoothed value density and its normalized curvature
//! - [`cutpoint`]: classifier separability of a threshold or of two partitions
//! - [`search`]: the desirability ranking and iterative refinement of cut points
//! - [`bins`]: validated [`Segments`] and the resulting [`BinAssignment`]

pub mod bins;
pub mod cutpoint;
pub mod density;
pub mod search;

pub use bins::{BinAssignment, Segments};
pub use cutpoint::CutpointScorer;
pub use density::DensityProfile;
pub use search::{RankedCut, SegmentationSearch};

/// Rescale `values` in place so the smallest maps to 0 and the largest to 1.
///
/// A flat (or non-finite) range maps every value to 0.
pub(crate) fn normalize_min_max(values: &mut [f64]) {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;

    if !(range > 0.0 && range.is_finite()) {
        values.iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    for v in values.iter_mut() {
        *v = (*v - lo) / range;
    }
}

/// Midpoints between adjacent distinct values of an ascending slice.
pub(crate) fn midpoints(sorted: &[f64]) -> Vec<f64> {
    sorted
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| 0.5 * (w[0] + w[1]))
        .collect()
}
