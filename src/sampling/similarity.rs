//! Set similarity over sorted, duplicate-free feature ids.

use crate::core::types::FeatureId;

/// Tanimoto coefficient `|A ∩ B| / |A ∪ B|` of two sorted, duplicate-free
/// id slices, computed with a single merge walk.
///
/// Two empty sets have an empty union; the coefficient is 0 in that case.
pub fn tanimoto(a: &[FeatureId], b: &[FeatureId]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut shared = 0usize;
    let mut total = 0usize;

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            shared += 1;
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
        total += 1;
    }
    total += (a.len() - i) + (b.len() - j);

    if total == 0 {
        0.0
    } else {
        shared as f64 / total as f64
    }
}
