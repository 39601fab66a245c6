//! Dataset ingestion: workbook and flat-file sources, loading, preprocessing.

pub mod excel;
pub mod loader;
pub mod preprocess;
pub mod source;
pub mod tabular;

pub use excel::ExcelSource;
pub use loader::{load_dataset, load_dataset_from_path, open_source};
pub use preprocess::drop_zero_values;
pub use source::{
    ColumnSpec, DataError, DatasetSource, InMemorySource, RawRow, SourceSummary,
    DEFAULT_REGION_COLUMN, DEFAULT_VALUE_COLUMN,
};
pub use tabular::{TabularFormat, TabularSource};
