//! Console tables and artifact export.

pub mod artifacts;
pub mod console;

pub use artifacts::{
    export_json, export_regions_csv, import_json, load_report, save_artifacts, ArtifactPaths,
    REGIONS_FILE, REPORT_FILE,
};
pub use console::render_report;
