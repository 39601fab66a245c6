//! Interquartile-range rule: Tukey fences at 1.5·IQR.

use super::Bounds;
use crate::stats::StatsError;

/// Fixed fence multiplier of the IQR rule.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Q1, Q3, IQR and the 1.5·IQR fences.
pub fn compute_iqr_bounds(values: &[f64]) -> Result<Bounds, StatsError> {
    Bounds::with_multiplier(values, IQR_MULTIPLIER)
}

/// Flags values strictly below the lower fence or above the upper fence.
pub fn iqr_outlier_mask(values: &[f64]) -> Vec<bool> {
    match compute_iqr_bounds(values) {
        Ok(bounds) => values.iter().map(|&v| bounds.is_outside(v)).collect(),
        Err(_) => vec![false; values.len()],
    }
}

pub fn count_iqr_outliers(values: &[f64]) -> usize {
    iqr_outlier_mask(values).into_iter().filter(|&f| f).count()
}
