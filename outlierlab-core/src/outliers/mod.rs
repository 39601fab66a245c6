//! Outlier rules: interquartile range, z-score, box-and-whisker.
//!
//! Each rule exposes the same three shapes of result:
//! - bounds (where the rule has a fence tuple),
//! - a per-value mask (`true` = outlier), aligned with the input order,
//! - a count.
//!
//! [`OutlierRule`] wraps the three rules so region ranking and the runner can
//! apply any of them through one code path.

pub mod boxplot;
pub mod iqr;
pub mod zscore;

pub use boxplot::{
    boxplot_outlier_mask, boxplot_stats, compute_boxplot_bounds, count_boxplot_outliers,
    BoxplotStats, DEFAULT_WHISKER_COEF,
};
pub use iqr::{compute_iqr_bounds, count_iqr_outliers, iqr_outlier_mask, IQR_MULTIPLIER};
pub use zscore::{
    count_z_score_outliers, z_score_outlier_mask, z_scores, DEFAULT_Z_THRESHOLD,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::{quantile_sorted, sorted, StatsError};

/// Quartiles, interquartile range, and the fences derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

impl Bounds {
    /// Fences at `Q1 - k·IQR` and `Q3 + k·IQR`.
    pub fn with_multiplier(values: &[f64], multiplier: f64) -> Result<Self, StatsError> {
        check_coefficient("fence multiplier", multiplier)?;
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Ok(Self {
            q1,
            q3,
            iqr,
            lower_fence: q1 - multiplier * iqr,
            upper_fence: q3 + multiplier * iqr,
        })
    }

    /// True when `value` lies strictly outside the fences.
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.lower_fence || value > self.upper_fence
    }
}

pub(crate) fn check_coefficient(name: &'static str, value: f64) -> Result<(), StatsError> {
    if !value.is_finite() {
        return Err(StatsError::InvalidCoefficient {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(StatsError::InvalidCoefficient {
            name,
            value,
            reason: "must be non-negative",
        });
    }
    Ok(())
}

/// The three outlier detection methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    Iqr,
    ZScore,
    Boxplot,
}

impl OutlierMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iqr => "iqr",
            Self::ZScore => "z_score",
            Self::Boxplot => "boxplot",
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A method together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierRule {
    /// Tukey fences with the fixed 1.5 multiplier.
    Iqr,
    /// `|z| > threshold`, population standard deviation.
    ZScore { threshold: f64 },
    /// Matplotlib whiskers at `k·IQR`; fliers are the outliers.
    Boxplot { whisker_coef: f64 },
}

impl OutlierRule {
    pub fn method(&self) -> OutlierMethod {
        match self {
            Self::Iqr => OutlierMethod::Iqr,
            Self::ZScore { .. } => OutlierMethod::ZScore,
            Self::Boxplot { .. } => OutlierMethod::Boxplot,
        }
    }

    /// Per-value outlier flags, aligned with `values`.
    pub fn mask(&self, values: &[f64]) -> Vec<bool> {
        match *self {
            Self::Iqr => iqr_outlier_mask(values),
            Self::ZScore { threshold } => z_score_outlier_mask(values, threshold),
            Self::Boxplot { whisker_coef } => boxplot_outlier_mask(values, whisker_coef),
        }
    }

    pub fn count(&self, values: &[f64]) -> usize {
        self.mask(values).into_iter().filter(|&f| f).count()
    }

    /// Short human-readable description, e.g. `boxplot (k=1.5)`.
    pub fn label(&self) -> String {
        match self {
            Self::Iqr => format!("iqr (k={IQR_MULTIPLIER})"),
            Self::ZScore { threshold } => format!("z_score (|z|>{threshold})"),
            Self::Boxplot { whisker_coef } => format!("boxplot (k={whisker_coef})"),
        }
    }
}

impl fmt::Display for OutlierRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_match_worked_example() {
        let b = Bounds::with_multiplier(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5).unwrap();
        assert!((b.q1 - 2.25).abs() < 1e-12);
        assert!((b.q3 - 4.75).abs() < 1e-12);
        assert!((b.iqr - 2.5).abs() < 1e-12);
        assert!((b.lower_fence - (-1.5)).abs() < 1e-12);
        assert!((b.upper_fence - 8.5).abs() < 1e-12);
        assert!(b.is_outside(100.0));
        assert!(!b.is_outside(8.5));
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let err = Bounds::with_multiplier(&[1.0, 2.0], -1.0).unwrap_err();
        assert!(matches!(err, StatsError::InvalidCoefficient { .. }));
    }

    #[test]
    fn rule_dispatch_agrees_with_free_functions() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert_eq!(OutlierRule::Iqr.count(&values), count_iqr_outliers(&values));
        assert_eq!(
            OutlierRule::ZScore { threshold: 2.0 }.count(&values),
            count_z_score_outliers(&values, 2.0)
        );
        assert_eq!(
            OutlierRule::Boxplot { whisker_coef: 1.5 }.count(&values),
            count_boxplot_outliers(&values, 1.5)
        );
    }

    #[test]
    fn rule_reports_method_and_label() {
        let rule = OutlierRule::Boxplot { whisker_coef: 3.0 };
        assert_eq!(rule.method(), OutlierMethod::Boxplot);
        assert_eq!(rule.label(), "boxplot (k=3)");
    }
}
