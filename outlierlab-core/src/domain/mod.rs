//! Domain types: observations and the loaded dataset.

mod dataset;
mod observation;

pub use dataset::{Dataset, DatasetProvenance};
pub use observation::{Observation, UNKNOWN_REGION};
