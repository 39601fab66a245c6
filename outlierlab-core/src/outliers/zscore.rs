//! Z-score rule: `|x - mean| / σ > threshold` with the population σ.

use crate::stats::{mean, population_std_dev};

/// Default z-score threshold in standard deviations.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Standard scores of every value.
///
/// `None` for an empty series or one with zero spread.
pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
    let m = mean(values)?;
    let sigma = population_std_dev(values)?;
    if sigma == 0.0 || !sigma.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| (v - m) / sigma).collect())
}

pub fn z_score_outlier_mask(values: &[f64], threshold: f64) -> Vec<bool> {
    match z_scores(values) {
        Some(scores) => scores.into_iter().map(|z| z.abs() > threshold).collect(),
        None => vec![false; values.len()],
    }
}

pub fn count_z_score_outliers(values: &[f64], threshold: f64) -> usize {
    z_score_outlier_mask(values, threshold)
        .into_iter()
        .filter(|&f| f)
        .count()
}
