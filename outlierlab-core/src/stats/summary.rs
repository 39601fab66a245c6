use serde::{Deserialize, Serialize};

use super::{mean, median, mode};

/// Structural statistics of a series: mean, mode, median.
///
/// Empty series produce `None` for every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub mode: Option<f64>,
    pub median: Option<f64>,
}

impl SummaryStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            mode: mode(values),
            median: median(values),
        }
    }
}
