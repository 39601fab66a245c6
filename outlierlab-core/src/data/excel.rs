//! Workbook source (xlsx, xlsm, xls, ods) backed by calamine.
//!
//! The first row of the sheet is the header. Numeric cells are read as-is;
//! text cells go through the same lenient number parser as CSV input.

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

use super::source::{
    clean_label, missing_column, parse_number, ColumnSpec, DataError, DatasetSource, RawRow,
    SourceSummary,
};

pub struct ExcelSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl ExcelSource {
    /// `sheet = None` reads the first sheet of the workbook.
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        Self {
            path: path.into(),
            sheet,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_range(&self) -> Result<(Vec<String>, String, Range<Data>), DataError> {
        if !self.path.exists() {
            return Err(DataError::NotFound(self.path.clone()));
        }
        let mut workbook =
            open_workbook_auto(&self.path).map_err(|e| DataError::Workbook(e.to_string()))?;
        let sheets = workbook.sheet_names();

        let sheet = match &self.sheet {
            Some(name) if sheets.contains(name) => name.clone(),
            Some(name) => {
                return Err(DataError::SheetNotFound {
                    sheet: name.clone(),
                    available: sheets.join(", "),
                })
            }
            None => sheets
                .first()
                .cloned()
                .ok_or_else(|| DataError::Workbook("workbook has no sheets".into()))?,
        };

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| DataError::Workbook(format!("sheet '{sheet}': {e}")))?;
        Ok((sheets, sheet, range))
    }
}

impl DatasetSource for ExcelSource {
    fn name(&self) -> &str {
        "workbook"
    }

    fn sheet(&self) -> Option<String> {
        self.sheet.clone()
    }

    fn read(&self, columns: &ColumnSpec) -> Result<Vec<RawRow>, DataError> {
        let (_, sheet, range) = self.open_range()?;
        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|r| r.iter().map(header_text).collect())
            .unwrap_or_default();

        let region_idx = column_index(&headers, &columns.region_column)?;
        let value_idx = column_index(&headers, &columns.value_column)?;

        let raw: Vec<RawRow> = rows
            .map(|row| RawRow {
                region: row.get(region_idx).and_then(cell_label),
                value: row.get(value_idx).and_then(cell_number),
            })
            .collect();

        tracing::debug!(sheet = %sheet, rows = raw.len(), "read workbook rows");
        Ok(raw)
    }

    fn describe(&self) -> Result<SourceSummary, DataError> {
        let (sheets, sheet, range) = self.open_range()?;
        let headers = range
            .rows()
            .next()
            .map(|r| r.iter().map(header_text).collect())
            .unwrap_or_default();
        Ok(SourceSummary {
            format: self.name().to_string(),
            sheets,
            active_sheet: Some(sheet),
            headers,
            rows: range.height().saturating_sub(1),
        })
    }
}

fn column_index(headers: &[String], column: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| missing_column(column, headers))
}

fn header_text(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

pub(crate) fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

pub(crate) fn cell_label(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        other => clean_label(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells() {
        assert_eq!(cell_number(&Data::Float(12.5)), Some(12.5));
        assert_eq!(cell_number(&Data::Int(7)), Some(7.0));
        assert_eq!(cell_number(&Data::String("3,25".into())), Some(3.25));
        assert_eq!(cell_number(&Data::Empty), None);
        assert_eq!(cell_number(&Data::Bool(true)), None);
        assert_eq!(cell_number(&Data::Float(f64::NAN)), None);
    }

    #[test]
    fn label_cells() {
        assert_eq!(
            cell_label(&Data::String(" Алтайский край ".into())),
            Some("Алтайский край".to_string())
        );
        assert_eq!(cell_label(&Data::Empty), None);
        assert_eq!(cell_label(&Data::Int(42)), Some("42".to_string()));
    }

    #[test]
    fn missing_workbook_is_reported() {
        let source = ExcelSource::new("does/not/exist.xlsx", None);
        let err = source.read(&ColumnSpec::default()).unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }
}
