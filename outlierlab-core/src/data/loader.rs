//! Dataset loading: source selection, row validation, zero filtering.

use std::path::Path;

use super::excel::ExcelSource;
use super::preprocess::drop_zero_values;
use super::source::{ColumnSpec, DataError, DatasetSource};
use super::tabular::{TabularFormat, TabularSource};
use crate::domain::{Dataset, DatasetProvenance, Observation, UNKNOWN_REGION};

/// Pick a source implementation from the file extension.
///
/// `sheet` only applies to workbook formats.
pub fn open_source(path: &Path, sheet: Option<String>) -> Result<Box<dyn DatasetSource>, DataError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(ExcelSource::new(path, sheet))),
        "csv" => Ok(Box::new(TabularSource::new(path, TabularFormat::Csv))),
        "parquet" => Ok(Box::new(TabularSource::new(path, TabularFormat::Parquet))),
        _ => Err(DataError::UnsupportedFormat { extension }),
    }
}

/// Read, validate, and zero-filter a dataset.
///
/// Rows without a numeric value are skipped and counted; rows without a
/// region label are kept under [`UNKNOWN_REGION`]. Fails when no numeric
/// row remains before zero filtering.
pub fn load_dataset(
    source: &dyn DatasetSource,
    source_label: &str,
    columns: &ColumnSpec,
) -> Result<Dataset, DataError> {
    let rows = source.read(columns)?;
    let rows_read = rows.len();

    let mut observations = Vec::with_capacity(rows_read);
    let mut rows_skipped = 0;
    for row in rows {
        match row.value {
            Some(value) => observations.push(Observation::new(
                row.region.unwrap_or_else(|| UNKNOWN_REGION.to_string()),
                value,
            )),
            None => rows_skipped += 1,
        }
    }

    if observations.is_empty() {
        return Err(DataError::NoNumericValues {
            column: columns.value_column.clone(),
        });
    }
    if rows_skipped > 0 {
        tracing::warn!(rows_skipped, "skipped rows without a numeric value");
    }

    let before = observations.len();
    let observations = drop_zero_values(observations);
    let zero_rows_dropped = before - observations.len();

    tracing::info!(
        source = source_label,
        format = source.name(),
        rows_read,
        zero_rows_dropped,
        kept = observations.len(),
        "loaded dataset"
    );

    let content_hash = compute_content_hash(&observations);
    Ok(Dataset {
        observations,
        provenance: DatasetProvenance {
            source: source_label.to_string(),
            sheet: source.sheet(),
            region_column: columns.region_column.clone(),
            value_column: columns.value_column.clone(),
            rows_read,
            rows_skipped,
            zero_rows_dropped,
            content_hash,
        },
    })
}

/// Open `path` by extension and load it.
pub fn load_dataset_from_path(
    path: &Path,
    sheet: Option<String>,
    columns: &ColumnSpec,
) -> Result<Dataset, DataError> {
    let source = open_source(path, sheet)?;
    load_dataset(source.as_ref(), &path.display().to_string(), columns)
}

/// Deterministic BLAKE3 hash over region labels and value bits, in order.
fn compute_content_hash(observations: &[Observation]) -> String {
    let mut hasher = blake3::Hasher::new();
    for obs in observations {
        hasher.update(obs.region.as_bytes());
        hasher.update(&[0]);
        hasher.update(&obs.value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
