use serde::{Deserialize, Serialize};

use super::Observation;

/// Where a dataset came from and what loading did to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProvenance {
    /// Path of the source file as given.
    pub source: String,
    /// Sheet name for workbook sources.
    pub sheet: Option<String>,
    pub region_column: String,
    pub value_column: String,
    /// Data rows read from the source (header excluded).
    pub rows_read: usize,
    /// Rows without a numeric value.
    pub rows_skipped: usize,
    /// Rows removed because their value was exactly zero.
    pub zero_rows_dropped: usize,
    /// BLAKE3 hash over the retained observations.
    pub content_hash: String,
}

/// The working set of observations, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub provenance: DatasetProvenance,
}

impl Dataset {
    /// The value column as a plain series.
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
