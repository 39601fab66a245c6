//! OutlierLab Runner: analysis orchestration, configuration, plots, reporting.
//!
//! This crate builds on `outlierlab-core` to provide:
//! - TOML analysis configuration with defaults and validation
//! - A runner that loads a dataset and produces an `AnalysisReport`
//! - Q-Q and P-P plots rendered to SVG
//! - Console tables and JSON/CSV artifacts
//! - Tracing setup for the binary

pub mod config;
pub mod logging;
pub mod plots;
pub mod reporting;
pub mod runner;

pub use config::{AnalysisConfig, ConfigError};
pub use logging::init_tracing;
pub use plots::{write_plots, PlotError};
pub use reporting::{load_report, render_report, save_artifacts, ArtifactPaths};
pub use runner::{
    analyze_dataset, run_analysis, AnalysisReport, MethodSummary, RunError, TierSummary,
    SCHEMA_VERSION,
};
