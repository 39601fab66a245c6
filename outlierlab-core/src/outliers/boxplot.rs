//! Box-and-whisker rule, matplotlib `boxplot_stats` convention.
//!
//! Reported bounds are the theoretical fences `Q1 - k·IQR` / `Q3 + k·IQR`.
//! Fliers are counted against the whiskers: the most extreme data points
//! still inside the fences. A whisker never retreats inside the box; when no
//! datum qualifies it sits on the quartile.

use serde::{Deserialize, Serialize};

use super::{check_coefficient, Bounds};
use crate::stats::{quantile_sorted, sorted, StatsError};

/// Default whisker length in IQR units.
pub const DEFAULT_WHISKER_COEF: f64 = 1.5;

/// Box statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotStats {
    pub whisker_coef: f64,
    pub bounds: Bounds,
    pub median: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// Flier values, ascending.
    pub fliers: Vec<f64>,
}

impl BoxplotStats {
    pub fn is_flier(&self, value: f64) -> bool {
        value < self.whisker_low || value > self.whisker_high
    }
}

/// Theoretical fence tuple at `k·IQR`.
pub fn compute_boxplot_bounds(values: &[f64], whisker_coef: f64) -> Result<Bounds, StatsError> {
    Bounds::with_multiplier(values, whisker_coef)
}

pub fn boxplot_stats(values: &[f64], whisker_coef: f64) -> Result<BoxplotStats, StatsError> {
    check_coefficient("whisker coefficient", whisker_coef)?;
    let bounds = compute_boxplot_bounds(values, whisker_coef)?;
    let sorted = sorted(values);
    let median = quantile_sorted(&sorted, 0.5)?;

    let whisker_high = sorted
        .iter()
        .copied()
        .filter(|&v| v <= bounds.upper_fence)
        .last()
        .filter(|&v| v >= bounds.q3)
        .unwrap_or(bounds.q3);

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= bounds.lower_fence)
        .filter(|&v| v <= bounds.q1)
        .unwrap_or(bounds.q1);

    let fliers = sorted
        .into_iter()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    Ok(BoxplotStats {
        whisker_coef,
        bounds,
        median,
        whisker_low,
        whisker_high,
        fliers,
    })
}

pub fn boxplot_outlier_mask(values: &[f64], whisker_coef: f64) -> Vec<bool> {
    match boxplot_stats(values, whisker_coef) {
        Ok(stats) => values.iter().map(|&v| stats.is_flier(v)).collect(),
        Err(_) => vec![false; values.len()],
    }
}

pub fn count_boxplot_outliers(values: &[f64], whisker_coef: f64) -> usize {
    boxplot_outlier_mask(values, whisker_coef)
        .into_iter()
        .filter(|&f| f)
        .count()
}
