//! Flat-file source (CSV with header, Parquet) backed by Polars.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::source::{
    clean_label, missing_column, parse_number, ColumnSpec, DataError, DatasetSource, RawRow,
    SourceSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Parquet,
}

pub struct TabularSource {
    path: PathBuf,
    format: TabularFormat,
}

impl TabularSource {
    pub fn new(path: impl Into<PathBuf>, format: TabularFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_frame(&self) -> Result<DataFrame, DataError> {
        if !self.path.exists() {
            return Err(DataError::NotFound(self.path.clone()));
        }
        match self.format {
            TabularFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(0))
                .try_into_reader_with_file_path(Some(self.path.clone()))
                .and_then(|reader| reader.finish())
                .map_err(|e| DataError::Table(format!("csv: {e}"))),
            TabularFormat::Parquet => {
                let file = fs::File::open(&self.path)
                    .map_err(|e| DataError::Table(format!("open: {e}")))?;
                ParquetReader::new(file)
                    .finish()
                    .map_err(|e| DataError::Table(format!("parquet: {e}")))
            }
        }
    }
}

impl DatasetSource for TabularSource {
    fn name(&self) -> &str {
        match self.format {
            TabularFormat::Csv => "csv",
            TabularFormat::Parquet => "parquet",
        }
    }

    fn read(&self, columns: &ColumnSpec) -> Result<Vec<RawRow>, DataError> {
        let df = self.load_frame()?;
        let headers = header_names(&df);

        let regions = string_column(&df, &columns.region_column, &headers)?;
        let values = value_column(&df, &columns.value_column, &headers)?;

        let rows: Vec<RawRow> = regions
            .into_iter()
            .zip(values)
            .map(|(region, value)| RawRow { region, value })
            .collect();

        tracing::debug!(format = self.name(), rows = rows.len(), "read table rows");
        Ok(rows)
    }

    fn describe(&self) -> Result<SourceSummary, DataError> {
        let df = self.load_frame()?;
        Ok(SourceSummary {
            format: self.name().to_string(),
            sheets: Vec::new(),
            active_sheet: None,
            headers: header_names(&df),
            rows: df.height(),
        })
    }
}

fn header_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Region labels as trimmed strings.
fn string_column(
    df: &DataFrame,
    name: &str,
    headers: &[String],
) -> Result<Vec<Option<String>>, DataError> {
    let column = df.column(name).map_err(|_| missing_column(name, headers))?;
    let as_text = column
        .cast(&DataType::String)
        .map_err(|e| DataError::Table(format!("column '{name}': {e}")))?;
    let ca = as_text
        .str()
        .map_err(|e| DataError::Table(format!("column '{name}': {e}")))?;
    Ok(ca.into_iter().map(|v| v.and_then(clean_label)).collect())
}

/// Values of a numeric column, or of a text column parsed leniently.
fn value_column(
    df: &DataFrame,
    name: &str,
    headers: &[String],
) -> Result<Vec<Option<f64>>, DataError> {
    let column = df.column(name).map_err(|_| missing_column(name, headers))?;
    let table_err = |e: PolarsError| DataError::Table(format!("column '{name}': {e}"));

    if column.dtype() != &DataType::String {
        let as_float = column.cast(&DataType::Float64).map_err(table_err)?;
        let ca = as_float.f64().map_err(table_err)?;
        return Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }

    let as_text = column.cast(&DataType::String).map_err(table_err)?;
    let ca = as_text.str().map_err(table_err)?;
    Ok(ca.into_iter().map(|v| v.and_then(parse_number)).collect())
}
