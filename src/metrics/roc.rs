//! Rank-based area under the ROC curve.

/// ROC-AUC of `scores` against binary `labels`.
///
/// Walks the predictions in descending score order and credits every
/// negative with the positives ranked above it; tied scores count half.
/// Returns 0.5 when only one class is present.
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> f64 {
    let mut pairs: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();

    let total_positive = pairs.iter().filter(|(_, label)| *label).count() as f64;
    let total_negative = pairs.len() as f64 - total_positive;
    if total_positive == 0.0 || total_negative == 0.0 {
        return 0.5;
    }

    // Sort by predictions in descending order
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut auc = 0.0;
    let mut tp = 0.0;
    let mut start = 0;
    while start < pairs.len() {
        let score = pairs[start].0;
        let end = start + pairs[start..].iter().take_while(|(s, _)| *s == score).count();

        let tied_positive = pairs[start..end].iter().filter(|(_, label)| *label).count() as f64;
        let tied_negative = (end - start) as f64 - tied_positive;
        auc += tied_negative * (tp + 0.5 * tied_positive);
        tp += tied_positive;

        start = end.max(start + 1);
    }

    auc / (total_positive * total_negative)
}
