//! Analysis runner: wires ingestion, outlier rules, grading, rankings,
//! variants, and distribution diagnostics into one report.
//!
//! Two entry points:
//! - `run_analysis()`: loads the dataset named by the config, then analyzes it. Used by the CLI.
//! - `analyze_dataset()`: takes a pre-loaded dataset. No I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use outlierlab_core::classify::{classify_iqr_outliers, Tier, TierCoefficients};
use outlierlab_core::data::{load_dataset_from_path, DataError};
use outlierlab_core::distribution::{pp_points, qq_points, PpPlotData, QqPlotData};
use outlierlab_core::domain::{Dataset, DatasetProvenance};
use outlierlab_core::outliers::{boxplot_stats, compute_iqr_bounds, Bounds, OutlierRule};
use outlierlab_core::regions::{rank_regions, RankingCriterion, RegionRanking};
use outlierlab_core::stats::{mean, population_std_dev, StatsError};
use outlierlab_core::variants::{stats_variants, VariantStats};

use crate::config::{AnalysisConfig, ConfigError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Whisker positions of the box-and-whisker rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Whiskers {
    pub low: f64,
    pub high: f64,
}

/// Result of one outlier rule on the whole column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub rule: OutlierRule,
    /// Fence tuple; `None` for the z-score rule and for an empty column.
    pub bounds: Option<Bounds>,
    /// Box-and-whisker only.
    pub whiskers: Option<Whiskers>,
    /// Mean and population σ; z-score only.
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub outliers: usize,
}

/// Moderate / extreme grading of the whole column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub coefficients: TierCoefficients,
    pub mean: Option<f64>,
    pub iqr: Option<f64>,
    pub moderate: Vec<f64>,
    pub extreme: Vec<f64>,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub provenance: DatasetProvenance,
    pub observations: usize,
    pub top_n: usize,
    /// IQR, z-score, box-and-whisker, in that order.
    pub methods: Vec<MethodSummary>,
    pub tiers: TierSummary,
    /// One ranking per rule, then moderate and extreme tiers.
    pub rankings: Vec<RegionRanking>,
    pub variants: Vec<VariantStats>,
    /// `None` when the working set is empty.
    pub qq: Option<QqPlotData>,
    /// `None` when the working set is empty or has no spread.
    pub pp: Option<PpPlotData>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisReport {
    pub fn method(&self, rule: &OutlierRule) -> Option<&MethodSummary> {
        self.methods.iter().find(|m| m.rule.method() == rule.method())
    }

    /// Ranking for a tier, if present.
    pub fn tier_ranking(&self, tier: Tier) -> Option<&RegionRanking> {
        self.rankings.iter().find(
            |r| matches!(r.criterion, RankingCriterion::Tier { tier: t, .. } if t == tier),
        )
    }
}

/// Load the configured dataset and analyze it.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let dataset = load_dataset_from_path(
        &config.input.path,
        config.input.sheet.clone(),
        &config.columns(),
    )?;
    analyze_dataset(&dataset, config)
}

/// Run every analysis stage on a pre-loaded dataset.
pub fn analyze_dataset(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, RunError> {
    config.validate()?;
    let values = dataset.values();
    let coefficients = config.tier_coefficients();
    let scope = config.outliers.scope;

    if values.is_empty() {
        tracing::warn!("working set is empty after dropping zero values");
    }

    let methods: Vec<MethodSummary> = config
        .rules()
        .iter()
        .map(|rule| summarize_rule(&values, *rule))
        .collect();
    for m in &methods {
        tracing::info!(rule = %m.rule, outliers = m.outliers, "outlier rule applied");
    }

    let classification = classify_iqr_outliers(&values, coefficients)?;
    let tiers = TierSummary {
        coefficients,
        mean: classification.mean,
        iqr: classification.iqr,
        moderate: classification.moderate.iter().map(|o| o.value).collect(),
        extreme: classification.extreme.iter().map(|o| o.value).collect(),
    };
    tracing::info!(
        moderate = tiers.moderate.len(),
        extreme = tiers.extreme.len(),
        "outliers graded"
    );

    let mut criteria: Vec<RankingCriterion> = config
        .rules()
        .into_iter()
        .map(|rule| RankingCriterion::Rule { rule })
        .collect();
    criteria.extend([Tier::Moderate, Tier::Extreme].map(|tier| RankingCriterion::Tier {
        tier,
        coefficients,
    }));
    let rankings = criteria
        .into_iter()
        .map(|criterion| rank_regions(&dataset.observations, criterion, scope))
        .collect::<Result<Vec<_>, _>>()?;

    let variants = stats_variants(&values, coefficients)?;

    let (qq, pp) = if values.is_empty() {
        (None, None)
    } else {
        let qq = qq_points(&values)?;
        let pp = match pp_points(&values, config.report.pp_reference) {
            Ok(pp) => Some(pp),
            Err(StatsError::ZeroSpread(what)) => {
                tracing::warn!(what, "skipping P-P plot: values have no spread");
                None
            }
            Err(e) => return Err(e.into()),
        };
        (Some(qq), pp)
    };

    Ok(AnalysisReport {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        provenance: dataset.provenance.clone(),
        observations: values.len(),
        top_n: config.report.top_n,
        methods,
        tiers,
        rankings,
        variants,
        qq,
        pp,
    })
}

fn summarize_rule(values: &[f64], rule: OutlierRule) -> MethodSummary {
    let mut summary = MethodSummary {
        rule,
        bounds: None,
        whiskers: None,
        mean: None,
        std_dev: None,
        outliers: rule.count(values),
    };
    match rule {
        OutlierRule::Iqr => summary.bounds = compute_iqr_bounds(values).ok(),
        OutlierRule::ZScore { .. } => {
            summary.mean = mean(values);
            summary.std_dev = population_std_dev(values);
        }
        OutlierRule::Boxplot { whisker_coef } => {
            if let Ok(stats) = boxplot_stats(values, whisker_coef) {
                summary.bounds = Some(stats.bounds);
                summary.whiskers = Some(Whiskers {
                    low: stats.whisker_low,
                    high: stats.whisker_high,
                });
            }
        }
    }
    if let Some(b) = &summary.bounds {
        tracing::debug!(rule = %rule, q1 = b.q1, q3 = b.q3, lower = b.lower_fence, upper = b.upper_fence, "bounds");
    }
    summary
}
