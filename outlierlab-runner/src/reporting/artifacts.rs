//! Machine-readable artifacts: the JSON report and the region rankings CSV.
//!
//! The JSON report carries a `schema_version` field. Newer versions than
//! this build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use outlierlab_core::regions::RegionRanking;

use crate::runner::{AnalysisReport, SCHEMA_VERSION};

pub const REPORT_FILE: &str = "report.json";
pub const REGIONS_FILE: &str = "regions.csv";

/// Files written by [`save_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub report: PathBuf,
    pub regions: PathBuf,
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisReport` to pretty JSON.
pub fn export_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Deserialize an `AnalysisReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Every ranking row as CSV.
///
/// Columns: criterion, scope, rank, region, observations, outliers, percent.
/// `percent` is empty when the ranking has no outliers at all.
pub fn export_regions_csv(rankings: &[RegionRanking]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "criterion",
        "scope",
        "rank",
        "region",
        "observations",
        "outliers",
        "percent",
    ])?;

    for ranking in rankings {
        let criterion = ranking.criterion.label();
        let scope = ranking.scope.to_string();
        for (i, share) in ranking.shares.iter().enumerate() {
            wtr.write_record([
                criterion.as_str(),
                scope.as_str(),
                &(i + 1).to_string(),
                &share.region,
                &share.observations.to_string(),
                &share.outliers.to_string(),
                &share.percent.map(|p| format!("{p:.4}")).unwrap_or_default(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `report.json` and `regions.csv` into `output_dir`, creating it if needed.
pub fn save_artifacts(report: &AnalysisReport, output_dir: &Path) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let paths = ArtifactPaths {
        report: output_dir.join(REPORT_FILE),
        regions: output_dir.join(REGIONS_FILE),
    };

    std::fs::write(&paths.report, export_json(report)?)
        .with_context(|| format!("failed to write {}", paths.report.display()))?;
    std::fs::write(&paths.regions, export_regions_csv(&report.rankings)?)
        .with_context(|| format!("failed to write {}", paths.regions.display()))?;

    tracing::info!(dir = %output_dir.display(), "artifacts saved");
    Ok(paths)
}

/// Load an `AnalysisReport` from a results directory's report.json.
pub fn load_report(dir: &Path) -> Result<AnalysisReport> {
    let path = dir.join(REPORT_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
