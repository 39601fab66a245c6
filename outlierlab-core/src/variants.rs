//! Summary statistics across four cleaning variants.
//!
//! - original data
//! - A: without extreme outliers
//! - B: without moderate outliers
//! - C: without both
//!
//! Removal is by position, so duplicate values outside a tier survive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::{classify_iqr_outliers, Tier, TierCoefficients};
use crate::stats::{StatsError, SummaryStats};

/// One of the four views of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Original,
    WithoutExtreme,
    WithoutModerate,
    WithoutBoth,
}

impl VariantKind {
    pub const ALL: [VariantKind; 4] = [
        Self::Original,
        Self::WithoutExtreme,
        Self::WithoutModerate,
        Self::WithoutBoth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "Original data",
            Self::WithoutExtreme => "Variant A (no extreme)",
            Self::WithoutModerate => "Variant B (no moderate)",
            Self::WithoutBoth => "Variant C (clean data)",
        }
    }

    fn keeps(&self, tier: Tier) -> bool {
        match (self, tier) {
            (Self::Original, _) | (_, Tier::None) => true,
            (Self::WithoutExtreme, t) => t != Tier::Extreme,
            (Self::WithoutModerate, t) => t != Tier::Moderate,
            (Self::WithoutBoth, _) => false,
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary statistics of one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantStats {
    pub kind: VariantKind,
    pub stats: SummaryStats,
}

/// Mean / mode / median for all four variants, in [`VariantKind::ALL`] order.
pub fn stats_variants(
    values: &[f64],
    coefficients: TierCoefficients,
) -> Result<Vec<VariantStats>, StatsError> {
    let tiers = classify_iqr_outliers(values, coefficients)?.tiers(values.len());

    Ok(VariantKind::ALL
        .iter()
        .map(|&kind| {
            let kept: Vec<f64> = values
                .iter()
                .zip(&tiers)
                .filter(|(_, tier)| kind.keeps(**tier))
                .map(|(&v, _)| v)
                .collect();
            VariantStats {
                kind,
                stats: SummaryStats::from_values(&kept),
            }
        })
        .collect())
}
