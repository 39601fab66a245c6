//! OutlierLab Core: descriptive outlier analysis of a regional value column.
//!
//! This crate contains the analysis itself:
//! - Dataset ingestion (workbooks, CSV, Parquet) and zero-value filtering
//! - Quantiles, mean/mode/median, standard deviations
//! - IQR fences, z-scores, and box-and-whisker fliers
//! - Moderate/extreme grading of IQR outliers
//! - Per-region outlier shares and rankings
//! - Summary statistics across cleaning variants
//! - Q-Q and P-P plot coordinates

pub mod classify;
pub mod data;
pub mod distribution;
pub mod domain;
pub mod outliers;
pub mod regions;
pub mod stats;
pub mod variants;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: analysis results can move to a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Observation>();
        require_sync::<domain::Observation>();
        require_send::<domain::Dataset>();
        require_sync::<domain::Dataset>();

        require_send::<outliers::Bounds>();
        require_sync::<outliers::Bounds>();
        require_send::<outliers::OutlierRule>();
        require_sync::<outliers::OutlierRule>();
        require_send::<outliers::BoxplotStats>();
        require_sync::<outliers::BoxplotStats>();

        require_send::<classify::Classification>();
        require_sync::<classify::Classification>();
        require_send::<regions::RegionRanking>();
        require_sync::<regions::RegionRanking>();
        require_send::<variants::VariantStats>();
        require_sync::<variants::VariantStats>();
        require_send::<distribution::QqPlotData>();
        require_sync::<distribution::QqPlotData>();
        require_send::<distribution::PpPlotData>();
        require_sync::<distribution::PpPlotData>();

        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<stats::StatsError>();
        require_sync::<stats::StatsError>();
    }

    /// Sources are used behind `Box<dyn DatasetSource>`.
    #[test]
    fn dataset_source_is_object_safe() {
        let spec = data::ColumnSpec::default();
        let source: Box<dyn data::DatasetSource> =
            Box::new(data::InMemorySource::new(&spec, Vec::new()));
        assert_eq!(source.name(), "memory");
        assert!(source.read(&spec).unwrap().is_empty());
    }
}
