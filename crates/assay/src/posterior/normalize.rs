//! Log-domain normalization of per-value scores.

use tracing::debug;

/// Numerically stable `ln(sum(exp(x)))`.
///
/// Returns `-inf` for an empty slice or when every score is `-inf`.
pub fn log_sum_exp(scores: &[f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY || max.is_nan() {
        return max;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let sum: f64 = scores.iter().map(|s| (s - max).exp()).sum();
    max + sum.ln()
}

/// Turn unnormalized log scores into probabilities that sum to one.
///
/// When no score carries mass (all `-inf`, or any NaN/`+inf` that makes the
/// normalizer undefined) the result is uniform. Every output lies in [0, 1].
pub fn normalize_log_scores(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let z = log_sum_exp(scores);
    if !z.is_finite() || scores.iter().any(|s| s.is_nan()) {
        debug!(candidates = scores.len(), "degenerate scores, posterior is uniform");
        let uniform = 1.0 / scores.len() as f64;
        return vec![uniform; scores.len()];
    }

    scores
        .iter()
        .map(|s| (s - z).exp().clamp(0.0, 1.0))
        .collect()
}
