//! Working-set preparation.

use crate::domain::Observation;

/// Remove observations whose value is exactly zero. Idempotent.
pub fn drop_zero_values(observations: Vec<Observation>) -> Vec<Observation> {
    observations.into_iter().filter(|o| !o.is_zero()).collect()
}
