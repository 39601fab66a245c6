//! Region ranking by share of outliers.
//!
//! For a criterion (an outlier rule or a classification tier), each region
//! gets an outlier count, and that count is expressed as a percentage of the
//! total across regions. Counting happens either inside each region's own
//! distribution ([`RegionScope::WithinRegion`]) or on the whole column with
//! flags attributed back to regions ([`RegionScope::Global`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::classify::{tier_mask, Tier, TierCoefficients};
use crate::domain::Observation;
use crate::outliers::OutlierRule;
use crate::stats::StatsError;

/// Where outliers are detected before being attributed to regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionScope {
    /// Apply the rule to each region's values separately.
    #[default]
    WithinRegion,
    /// Apply the rule to the full column, then count flags per region.
    Global,
}

impl fmt::Display for RegionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WithinRegion => "within_region",
            Self::Global => "global",
        })
    }
}

/// What counts as an outlier for a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingCriterion {
    Rule { rule: OutlierRule },
    Tier { tier: Tier, coefficients: TierCoefficients },
}

impl RankingCriterion {
    pub fn label(&self) -> String {
        match self {
            Self::Rule { rule } => rule.label(),
            Self::Tier { tier, .. } => format!("{tier} outliers"),
        }
    }

    fn mask(&self, values: &[f64]) -> Result<Vec<bool>, StatsError> {
        match self {
            Self::Rule { rule } => Ok(rule.mask(values)),
            Self::Tier { tier, coefficients } => tier_mask(values, *coefficients, *tier),
        }
    }
}

/// One region's row in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionShare {
    pub region: String,
    pub observations: usize,
    pub outliers: usize,
    /// Share of all outliers, in percent. `None` when no region has outliers.
    pub percent: Option<f64>,
}

/// Regions ordered by outlier share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRanking {
    pub criterion: RankingCriterion,
    pub scope: RegionScope,
    pub total_outliers: usize,
    /// Descending by percent, ties by region name. Alphabetical when there
    /// are no outliers at all.
    pub shares: Vec<RegionShare>,
}

impl RegionRanking {
    /// The first `n` regions. Empty when no outliers exist.
    pub fn top(&self, n: usize) -> &[RegionShare] {
        if self.total_outliers == 0 {
            return &[];
        }
        &self.shares[..n.min(self.shares.len())]
    }

    pub fn percent_sum(&self) -> f64 {
        self.shares.iter().filter_map(|s| s.percent).sum()
    }
}

/// Observations grouped by region label, sorted by label.
///
/// Each entry holds `(position in input, value)` pairs in input order.
pub fn group_by_region(observations: &[Observation]) -> BTreeMap<&str, Vec<(usize, f64)>> {
    let mut groups: BTreeMap<&str, Vec<(usize, f64)>> = BTreeMap::new();
    for (i, obs) in observations.iter().enumerate() {
        groups.entry(obs.region.as_str()).or_default().push((i, obs.value));
    }
    groups
}

/// Rank regions by their share of outliers under `criterion`.
pub fn rank_regions(
    observations: &[Observation],
    criterion: RankingCriterion,
    scope: RegionScope,
) -> Result<RegionRanking, StatsError> {
    let groups = group_by_region(observations);

    let global_mask = match scope {
        RegionScope::Global => {
            let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
            Some(criterion.mask(&values)?)
        }
        RegionScope::WithinRegion => None,
    };

    let mut shares = Vec::with_capacity(groups.len());
    for (region, members) in &groups {
        let outliers = match &global_mask {
            Some(mask) => members.iter().filter(|(i, _)| mask[*i]).count(),
            None => {
                let values: Vec<f64> = members.iter().map(|(_, v)| *v).collect();
                criterion.mask(&values)?.into_iter().filter(|&f| f).count()
            }
        };
        shares.push(RegionShare {
            region: region.to_string(),
            observations: members.len(),
            outliers,
            percent: None,
        });
    }

    let total_outliers: usize = shares.iter().map(|s| s.outliers).sum();
    if total_outliers > 0 {
        for share in &mut shares {
            share.percent = Some(share.outliers as f64 / total_outliers as f64 * 100.0);
        }
        // BTreeMap order is already by name; a stable sort keeps it for ties.
        shares.sort_by(|a, b| b.outliers.cmp(&a.outliers));
    } else {
        tracing::debug!(criterion = %criterion.label(), %scope, "no outliers in any region");
    }

    Ok(RegionRanking {
        criterion,
        scope,
        total_outliers,
        shares,
    })
}
