//! Dataset source trait and structured error types.
//!
//! The `DatasetSource` trait abstracts over input formats (Excel workbooks,
//! CSV, Parquet) so the loader does not care where rows come from, and tests
//! can feed rows directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default region column header of the amortization dataset.
pub const DEFAULT_REGION_COLUMN: &str = "Субъект РФ";

/// Default value column header of the amortization dataset.
pub const DEFAULT_VALUE_COLUMN: &str = "Амортизация в растениеводстве, тыс. руб.";

/// Structured error types for ingestion.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported input format '{extension}' (expected xlsx, xlsm, xls, ods, csv or parquet)")]
    UnsupportedFormat { extension: String },

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    #[error("table read error: {0}")]
    Table(String),

    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("no numeric values in column '{column}'")]
    NoNumericValues { column: String },
}

/// Which columns hold the region label and the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub region_column: String,
    pub value_column: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            region_column: DEFAULT_REGION_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

/// One data row before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub region: Option<String>,
    pub value: Option<f64>,
}

/// Shape of a source, for `inspect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub format: String,
    /// Sheet names for workbooks; empty for flat files.
    pub sheets: Vec<String>,
    /// Sheet actually read, if any.
    pub active_sheet: Option<String>,
    pub headers: Vec<String>,
    pub rows: usize,
}

/// A readable tabular input.
pub trait DatasetSource {
    /// Human-readable format name.
    fn name(&self) -> &str;

    /// Sheet that `read` uses, for workbook formats.
    fn sheet(&self) -> Option<String> {
        None
    }

    /// Read the two requested columns, one `RawRow` per data row.
    fn read(&self, columns: &ColumnSpec) -> Result<Vec<RawRow>, DataError>;

    /// Headers, sheets, and row count.
    fn describe(&self) -> Result<SourceSummary, DataError>;
}

/// Rows held in memory. Used by tests and by callers that build data
/// programmatically.
pub struct InMemorySource {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl InMemorySource {
    pub fn new(columns: &ColumnSpec, rows: Vec<RawRow>) -> Self {
        Self {
            headers: vec![columns.region_column.clone(), columns.value_column.clone()],
            rows,
        }
    }
}

impl DatasetSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, columns: &ColumnSpec) -> Result<Vec<RawRow>, DataError> {
        for column in [&columns.region_column, &columns.value_column] {
            if !self.headers.contains(column) {
                return Err(missing_column(column, &self.headers));
            }
        }
        Ok(self.rows.clone())
    }

    fn describe(&self) -> Result<SourceSummary, DataError> {
        Ok(SourceSummary {
            format: self.name().to_string(),
            sheets: Vec::new(),
            active_sheet: None,
            headers: self.headers.clone(),
            rows: self.rows.len(),
        })
    }
}

pub(crate) fn missing_column(column: &str, headers: &[String]) -> DataError {
    DataError::MissingColumn {
        column: column.to_string(),
        available: headers.join(", "),
    }
}

/// Parse a numeric cell given as text.
///
/// Spaces are thousands separators. With both `,` and `.` present, the
/// one that comes last is the decimal point. A lone comma is a decimal
/// comma, except `1,234`-shaped cells, which could be either and are
/// rejected.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (None, _) => cleaned,
        (Some(comma), Some(dot)) if comma < dot => cleaned.replace(',', ""),
        (Some(_), Some(_)) => cleaned.replace('.', "").replace(',', "."),
        (Some(comma), None) => {
            if cleaned.matches(',').count() > 1 {
                cleaned.replace(',', "")
            } else if is_ambiguous_grouping(&cleaned, comma) {
                return None;
            } else {
                cleaned.replace(',', ".")
            }
        }
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `1,234` or `-12,500`: one to three non-zero-led digits, a comma, then
/// exactly three digits.
fn is_ambiguous_grouping(text: &str, comma: usize) -> bool {
    let (int_part, frac_part) = (&text[..comma], &text[comma + 1..]);
    let int_digits = int_part.strip_prefix(['-', '+']).unwrap_or(int_part);
    frac_part.len() == 3
        && frac_part.bytes().all(|b| b.is_ascii_digit())
        && (1..=3).contains(&int_digits.len())
        && int_digits.bytes().all(|b| b.is_ascii_digit())
        && !int_digits.starts_with('0')
}

/// Normalize a region cell: trimmed, `None` when blank.
pub(crate) fn clean_label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_local_formats() {
        assert_eq!(parse_number("1234.5"), Some(1234.5));
        assert_eq!(parse_number(" 1 234,5 "), Some(1234.5));
        assert_eq!(parse_number("-0"), Some(0.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn parse_number_picks_the_decimal_separator() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_number("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number("0,125"), Some(0.125));
        assert_eq!(parse_number("1234,567"), Some(1234.567));
    }

    #[test]
    fn parse_number_rejects_ambiguous_grouping() {
        assert_eq!(parse_number("1,234"), None);
        assert_eq!(parse_number("-12,500"), None);
        assert_eq!(parse_number("999,000"), None);
    }

    #[test]
    fn clean_label_trims_and_rejects_blank() {
        assert_eq!(clean_label("  Omsk "), Some("Omsk".to_string()));
        assert_eq!(clean_label("   "), None);
    }

    #[test]
    fn in_memory_source_checks_columns() {
        let spec = ColumnSpec::default();
        let source = InMemorySource::new(&spec, vec![]);
        assert!(source.read(&spec).is_ok());

        let other = ColumnSpec {
            region_column: "region".into(),
            value_column: "value".into(),
        };
        let err = source.read(&other).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }
}
