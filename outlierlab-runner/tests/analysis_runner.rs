//! Runner integration: config → dataset file → report → plots → console.

use std::io::Write;
use std::path::Path;

use proptest::prelude::*;

use outlierlab_core::classify::Tier;
use outlierlab_core::data::DataError;
use outlierlab_core::regions::RegionScope;
use outlierlab_runner::plots::{PP_PLOT_FILE, QQ_PLOT_FILE};
use outlierlab_runner::{render_report, run_analysis, write_plots, AnalysisConfig, RunError};

const HEADER: &str = "Субъект РФ,\"Амортизация в растениеводстве, тыс. руб.\"";

fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("amortization.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    let rows: &[(&str, &str)] = &[
        ("Алтайский край", "1 200"),
        ("Алтайский край", "1 350"),
        ("Алтайский край", "1 280"),
        ("Алтайский край", "0"),
        ("Алтайский край", "9 800"),
        ("Омская область", "900"),
        ("Омская область", "950"),
        ("Омская область", "1 010"),
        ("Омская область", "48 000"),
        ("Курская область", "1 100"),
        ("Курская область", "1 150"),
        ("Курская область", "1 090"),
        ("Курская область", "1 120"),
    ];
    for (region, value) in rows {
        writeln!(file, "{region},{value}").unwrap();
    }
    path
}

fn config_for(input: &Path, output_dir: &Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.input.path = input.to_path_buf();
    config.report.output_dir = output_dir.to_path_buf();
    config
}

#[test]
fn csv_input_produces_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_dataset(dir.path());
    let mut config = config_for(&input, dir.path());
    config.outliers.scope = RegionScope::Global;

    let report = run_analysis(&config).unwrap();
    assert_eq!(report.observations, 12);
    assert_eq!(report.provenance.zero_rows_dropped, 1);
    assert_eq!(report.provenance.content_hash.len(), 64);

    // Both spikes sit far above the fences of the pooled column.
    assert_eq!(report.methods[0].outliers, 2);
    assert_eq!(report.tiers.extreme.len(), 2);
    let extreme = report.tier_ranking(Tier::Extreme).unwrap();
    assert_eq!(extreme.total_outliers, 2);
    assert_eq!(extreme.shares[0].percent, Some(50.0));
    // Equal shares are ordered by region name.
    assert_eq!(extreme.shares[0].region, "Алтайский край");
    assert_eq!(extreme.shares[1].region, "Омская область");
    assert_eq!(extreme.shares[2].outliers, 0);

    let original = &report.variants[0].stats;
    let clean = &report.variants[3].stats;
    assert_eq!(original.count, 12);
    assert_eq!(clean.count, 10);
    assert!(clean.mean.unwrap() < original.mean.unwrap());
}

#[test]
fn within_region_scope_counts_per_region() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_dataset(dir.path());
    let config = config_for(&input, dir.path());

    let report = run_analysis(&config).unwrap();
    let iqr = &report.rankings[0];
    assert_eq!(iqr.scope, RegionScope::WithinRegion);
    let percent_sum: f64 = iqr.shares.iter().filter_map(|s| s.percent).sum();
    assert!((percent_sum - 100.0).abs() < 1e-9);
    let kursk = iqr
        .shares
        .iter()
        .find(|s| s.region == "Курская область")
        .unwrap();
    assert_eq!(kursk.outliers, 0);
}

#[test]
fn plots_and_console_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_dataset(dir.path());
    let out = dir.path().join("results");
    let config = config_for(&input, &out);

    let report = run_analysis(&config).unwrap();
    let written = write_plots(&report, &out).unwrap();
    assert_eq!(written, vec![out.join(QQ_PLOT_FILE), out.join(PP_PLOT_FILE)]);
    assert!(written.iter().all(|p| p.exists()));

    let text = render_report(&report);
    assert!(text.contains("a) Interquartile range (IQR) outliers"));
    assert!(text.contains("b) Z-score outliers"));
    assert!(text.contains("c) Box-and-whisker outliers"));
    assert!(text.contains("Moderate outliers:"));
    assert!(text.contains("Variant C (clean data)"));
    assert!(text.contains("Омская область"));
}

#[test]
fn missing_input_is_a_data_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("absent.xlsx"), dir.path());
    match run_analysis(&config) {
        Err(RunError::Data(DataError::NotFound(path))) => {
            assert!(path.ends_with("absent.xlsx"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("data.json"), dir.path());
    assert!(matches!(
        run_analysis(&config),
        Err(RunError::Data(DataError::UnsupportedFormat { .. }))
    ));
}

proptest! {
    /// Any valid parameter set survives a TOML round trip and still validates.
    #[test]
    fn config_toml_round_trip(
        moderate in 0.0..5.0_f64,
        gap in 0.0..5.0_f64,
        whisker in 0.0..4.0_f64,
        z in 0.5..6.0_f64,
        top_n in 1usize..20,
        global in any::<bool>(),
    ) {
        let mut config = AnalysisConfig::default();
        config.classification.moderate_coef = moderate;
        config.classification.extreme_coef = moderate + gap;
        config.outliers.whisker_coef = whisker;
        config.outliers.z_threshold = z;
        config.outliers.scope = if global { RegionScope::Global } else { RegionScope::WithinRegion };
        config.report.top_n = top_n;

        prop_assert!(config.validate().is_ok());
        let parsed = AnalysisConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
