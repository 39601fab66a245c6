use serde::{Deserialize, Serialize};

/// Region label used when the region cell of a row is empty.
pub const UNKNOWN_REGION: &str = "(unknown)";

/// One amortization value and the region it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub region: String,
    pub value: f64,
}

impl Observation {
    pub fn new(region: impl Into<String>, value: f64) -> Self {
        Self {
            region: region.into(),
            value,
        }
    }

    /// True when the value is exactly zero (either sign).
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}
