//! Analysis configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. CLI flags are applied on top of the loaded values and the
//! result is validated once before the analysis starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use outlierlab_core::classify::TierCoefficients;
use outlierlab_core::data::{ColumnSpec, DEFAULT_REGION_COLUMN, DEFAULT_VALUE_COLUMN};
use outlierlab_core::distribution::PpReference;
use outlierlab_core::outliers::{OutlierRule, DEFAULT_WHISKER_COEF, DEFAULT_Z_THRESHOLD};
use outlierlab_core::regions::RegionScope;

/// Errors from reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: InputConfig,
    pub outliers: OutlierConfig,
    pub classification: ClassificationConfig,
    pub report: ReportConfig,
}

/// `[input]`: where the dataset lives and which columns to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    /// Workbook sheet; the first sheet when absent.
    pub sheet: Option<String>,
    pub region_column: String,
    pub value_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/data.xlsx"),
            sheet: None,
            region_column: DEFAULT_REGION_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

/// `[outliers]`: rule parameters and how region counts are taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub z_threshold: f64,
    pub whisker_coef: f64,
    pub scope: RegionScope,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            z_threshold: DEFAULT_Z_THRESHOLD,
            whisker_coef: DEFAULT_WHISKER_COEF,
            scope: RegionScope::WithinRegion,
        }
    }
}

/// `[classification]`: tier thresholds in IQR units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub moderate_coef: f64,
    pub extreme_coef: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        let coefs = TierCoefficients::default();
        Self {
            moderate_coef: coefs.moderate,
            extreme_coef: coefs.extreme,
        }
    }
}

/// `[report]`: output location and what gets written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub plots: bool,
    pub artifacts: bool,
    pub pp_reference: PpReference,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            top_n: 3,
            plots: true,
            artifacts: true,
            pp_reference: PpReference::Fitted,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check parameter ranges. Called by the runner before any work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.region_column.trim().is_empty() {
            return Err(ConfigError::Invalid("input.region_column is empty".into()));
        }
        if self.input.value_column.trim().is_empty() {
            return Err(ConfigError::Invalid("input.value_column is empty".into()));
        }
        if !(self.outliers.z_threshold.is_finite() && self.outliers.z_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "outliers.z_threshold must be a positive number, got {}",
                self.outliers.z_threshold
            )));
        }
        if !(self.outliers.whisker_coef.is_finite() && self.outliers.whisker_coef >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "outliers.whisker_coef must be non-negative, got {}",
                self.outliers.whisker_coef
            )));
        }
        TierCoefficients::new(
            self.classification.moderate_coef,
            self.classification.extreme_coef,
        )
        .map_err(|e| ConfigError::Invalid(format!("classification: {e}")))?;
        if self.report.top_n == 0 {
            return Err(ConfigError::Invalid("report.top_n must be at least 1".into()));
        }
        Ok(())
    }

    pub fn columns(&self) -> ColumnSpec {
        ColumnSpec {
            region_column: self.input.region_column.clone(),
            value_column: self.input.value_column.clone(),
        }
    }

    pub fn tier_coefficients(&self) -> TierCoefficients {
        TierCoefficients {
            moderate: self.classification.moderate_coef,
            extreme: self.classification.extreme_coef,
        }
    }

    /// The three rules in report order: IQR, z-score, box-and-whisker.
    pub fn rules(&self) -> [OutlierRule; 3] {
        [
            OutlierRule::Iqr,
            OutlierRule::ZScore {
                threshold: self.outliers.z_threshold,
            },
            OutlierRule::Boxplot {
                whisker_coef: self.outliers.whisker_coef,
            },
        ]
    }
}
