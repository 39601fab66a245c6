//! Moderate / extreme tiers of IQR outliers.
//!
//! A value is graded only if the IQR fence rule flags it. Its grade is the
//! absolute deviation from the **mean**, in IQR units:
//!
//! ```text
//! d = |x - mean| / IQR
//! moderate:  moderate_coef < d <= extreme_coef
//! extreme:   d > extreme_coef
//! ```
//!
//! Fence outliers with `d <= moderate_coef` stay ungraded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::outliers::{check_coefficient, compute_iqr_bounds};
use crate::stats::{mean, StatsError};

/// Tier of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    None,
    Moderate,
    Extreme,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Moderate => "moderate",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier thresholds in IQR units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCoefficients {
    pub moderate: f64,
    pub extreme: f64,
}

impl Default for TierCoefficients {
    fn default() -> Self {
        Self {
            moderate: 2.0,
            extreme: 3.5,
        }
    }
}

impl TierCoefficients {
    pub fn new(moderate: f64, extreme: f64) -> Result<Self, StatsError> {
        let coefs = Self { moderate, extreme };
        coefs.validate()?;
        Ok(coefs)
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        check_coefficient("moderate coefficient", self.moderate)?;
        check_coefficient("extreme coefficient", self.extreme)?;
        if self.moderate > self.extreme {
            return Err(StatsError::InvalidCoefficient {
                name: "moderate coefficient",
                value: self.moderate,
                reason: "must not exceed the extreme coefficient",
            });
        }
        Ok(())
    }

    /// Tier for a deviation measured in IQR units.
    pub fn tier_for(&self, deviation_iqr: f64) -> Tier {
        if deviation_iqr > self.extreme {
            Tier::Extreme
        } else if deviation_iqr > self.moderate {
            Tier::Moderate
        } else {
            Tier::None
        }
    }
}

/// A graded outlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedOutlier {
    /// Position in the classified series.
    pub index: usize,
    pub value: f64,
    /// `|value - mean| / IQR`; infinite when IQR is zero.
    pub deviation_iqr: f64,
}

/// Result of grading one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub coefficients: TierCoefficients,
    pub mean: Option<f64>,
    pub iqr: Option<f64>,
    pub moderate: Vec<GradedOutlier>,
    pub extreme: Vec<GradedOutlier>,
}

impl Classification {
    /// Tier of every position of the classified series.
    pub fn tiers(&self, len: usize) -> Vec<Tier> {
        let mut tiers = vec![Tier::None; len];
        for o in &self.moderate {
            tiers[o.index] = Tier::Moderate;
        }
        for o in &self.extreme {
            tiers[o.index] = Tier::Extreme;
        }
        tiers
    }

    pub fn moderate_indices(&self) -> Vec<usize> {
        self.moderate.iter().map(|o| o.index).collect()
    }

    pub fn extreme_indices(&self) -> Vec<usize> {
        self.extreme.iter().map(|o| o.index).collect()
    }
}

/// Grade the IQR outliers of `values` into moderate and extreme tiers.
pub fn classify_iqr_outliers(
    values: &[f64],
    coefficients: TierCoefficients,
) -> Result<Classification, StatsError> {
    coefficients.validate()?;

    let (Some(m), Ok(bounds)) = (mean(values), compute_iqr_bounds(values)) else {
        return Ok(Classification {
            coefficients,
            mean: None,
            iqr: None,
            moderate: Vec::new(),
            extreme: Vec::new(),
        });
    };

    let mut moderate = Vec::new();
    let mut extreme = Vec::new();

    for (index, &value) in values.iter().enumerate() {
        if !bounds.is_outside(value) {
            continue;
        }
        // IQR = 0: every value off the box is extreme, including one at the mean.
        let deviation_iqr = if bounds.iqr > 0.0 {
            (value - m).abs() / bounds.iqr
        } else {
            f64::INFINITY
        };
        let graded = GradedOutlier {
            index,
            value,
            deviation_iqr,
        };
        match coefficients.tier_for(deviation_iqr) {
            Tier::Extreme => extreme.push(graded),
            Tier::Moderate => moderate.push(graded),
            Tier::None => {}
        }
    }

    Ok(Classification {
        coefficients,
        mean: Some(m),
        iqr: Some(bounds.iqr),
        moderate,
        extreme,
    })
}

/// Per-value flags for one tier, aligned with `values`.
pub fn tier_mask(
    values: &[f64],
    coefficients: TierCoefficients,
    tier: Tier,
) -> Result<Vec<bool>, StatsError> {
    let classification = classify_iqr_outliers(values, coefficients)?;
    Ok(classification
        .tiers(values.len())
        .into_iter()
        .map(|t| t == tier)
        .collect())
}
