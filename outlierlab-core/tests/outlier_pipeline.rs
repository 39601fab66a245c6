//! End-to-end core pipeline: load, detect, grade, rank, summarize.

use std::io::Write;

use outlierlab_core::classify::{classify_iqr_outliers, Tier, TierCoefficients};
use outlierlab_core::data::{load_dataset_from_path, ColumnSpec, DataError};
use outlierlab_core::distribution::{pp_points, qq_points, PpReference};
use outlierlab_core::outliers::{
    boxplot_stats, compute_iqr_bounds, count_boxplot_outliers, count_iqr_outliers,
    count_z_score_outliers, DEFAULT_Z_THRESHOLD,
};
use outlierlab_core::regions::{rank_regions, RankingCriterion, RegionScope};
use outlierlab_core::variants::{stats_variants, VariantKind};

const WORKED: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn worked_example_through_every_rule() {
    let bounds = compute_iqr_bounds(&WORKED).unwrap();
    assert!(approx(bounds.lower_fence, -1.5));
    assert!(approx(bounds.upper_fence, 8.5));
    assert_eq!(count_iqr_outliers(&WORKED), 1);
    assert_eq!(count_boxplot_outliers(&WORKED, 1.5), 1);

    // Six values cannot reach |z| > 3: the bound is sqrt(n - 1).
    assert_eq!(count_z_score_outliers(&WORKED, DEFAULT_Z_THRESHOLD), 0);
    assert_eq!(count_z_score_outliers(&WORKED, 2.0), 1);

    let bp = boxplot_stats(&WORKED, 1.5).unwrap();
    assert_eq!(bp.whisker_low, 1.0);
    assert_eq!(bp.whisker_high, 5.0);
    assert_eq!(bp.fliers, vec![100.0]);

    let c = classify_iqr_outliers(&WORKED, TierCoefficients::default()).unwrap();
    assert_eq!(c.extreme_indices(), vec![5]);
    assert!(c.moderate.is_empty());
}

#[test]
fn worked_example_variants() {
    let rows = stats_variants(&WORKED, TierCoefficients::default()).unwrap();
    let get = |kind: VariantKind| rows.iter().find(|r| r.kind == kind).unwrap();

    let original = &get(VariantKind::Original).stats;
    assert!(approx(original.mean.unwrap(), 115.0 / 6.0));
    assert_eq!(original.median, Some(3.5));
    assert_eq!(original.mode, Some(1.0));

    let clean = &get(VariantKind::WithoutExtreme).stats;
    assert_eq!(clean.count, 5);
    assert_eq!(clean.mean, Some(3.0));
    assert_eq!(clean.median, Some(3.0));

    // No moderate outliers: variant B equals the original.
    assert_eq!(&get(VariantKind::WithoutModerate).stats, original);
    assert_eq!(&get(VariantKind::WithoutBoth).stats, clean);
}

#[test]
fn csv_dataset_end_to_end() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Субъект РФ,\"Амортизация в растениеводстве, тыс. руб.\",Год").unwrap();
    for (region, value) in [
        ("Алтайский край", "120"),
        ("Алтайский край", "130"),
        ("Алтайский край", "125"),
        ("Алтайский край", "0"),
        ("Омская область", "90"),
        ("Омская область", "95"),
        ("Омская область", "5000"),
        ("Омская область", ""),
        ("Курская область", "110"),
        ("Курская область", "115"),
    ] {
        writeln!(file, "{region},{value},2021").unwrap();
    }
    file.flush().unwrap();

    let ds = load_dataset_from_path(file.path(), None, &ColumnSpec::default()).unwrap();
    assert_eq!(ds.len(), 8);
    assert_eq!(ds.provenance.rows_read, 10);
    assert_eq!(ds.provenance.rows_skipped, 1);
    assert_eq!(ds.provenance.zero_rows_dropped, 1);

    let values = ds.values();
    assert_eq!(count_iqr_outliers(&values), 1);

    let ranking = rank_regions(
        &ds.observations,
        RankingCriterion::Rule {
            rule: outlierlab_core::outliers::OutlierRule::Iqr,
        },
        RegionScope::Global,
    )
    .unwrap();
    assert_eq!(ranking.total_outliers, 1);
    assert_eq!(ranking.top(3).len(), 3);
    assert_eq!(ranking.shares[0].region, "Омская область");
    assert_eq!(ranking.shares[0].percent, Some(100.0));

    let extreme = rank_regions(
        &ds.observations,
        RankingCriterion::Tier {
            tier: Tier::Extreme,
            coefficients: TierCoefficients::default(),
        },
        RegionScope::Global,
    )
    .unwrap();
    assert_eq!(extreme.shares[0].region, "Омская область");

    let qq = qq_points(&values).unwrap();
    assert_eq!(qq.points.len(), 8);
    let pp = pp_points(&values, PpReference::Fitted).unwrap();
    assert!(pp.max_deviation > 0.0 && pp.max_deviation < 1.0);
}

#[test]
fn missing_value_column_is_reported() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Субъект РФ,Другое").unwrap();
    writeln!(file, "Омская область,1").unwrap();
    file.flush().unwrap();

    let err = load_dataset_from_path(file.path(), None, &ColumnSpec::default()).unwrap_err();
    match err {
        DataError::MissingColumn { column, available } => {
            assert_eq!(column, "Амортизация в растениеводстве, тыс. руб.");
            assert!(available.contains("Другое"));
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}
