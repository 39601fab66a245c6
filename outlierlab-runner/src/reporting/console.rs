//! Fixed-width console tables. Numbers are rounded to two decimals;
//! statistics of an empty series print as `NaN`.

use std::fmt::Write;

use outlierlab_core::classify::Tier;
use outlierlab_core::outliers::{Bounds, OutlierMethod};
use outlierlab_core::regions::{RankingCriterion, RegionRanking};

use crate::runner::{AnalysisReport, MethodSummary};

const REGION_WIDTH: usize = 44;

/// Render the whole report as console text.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::with_capacity(4096);
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let p = &report.provenance;
    writeln!(out, "=== Outlier Analysis ===")?;
    match &p.sheet {
        Some(sheet) => writeln!(out, "Source:         {} [{sheet}]", p.source)?,
        None => writeln!(out, "Source:         {}", p.source)?,
    }
    writeln!(out, "Column:         {}", p.value_column)?;
    writeln!(
        out,
        "Observations:   {} ({} rows read, {} skipped, {} zero dropped)",
        report.observations, p.rows_read, p.rows_skipped, p.zero_rows_dropped
    )?;
    writeln!(out, "Dataset Hash:   {}", p.content_hash)?;

    for (letter, method) in ["a", "b", "c"].iter().zip(&report.methods) {
        writeln!(out)?;
        write_method(out, letter, method)?;
        if let Some(ranking) = report.rankings.iter().find(
            |r| matches!(r.criterion, RankingCriterion::Rule { rule } if rule == method.rule),
        ) {
            writeln!(out)?;
            write_ranking(out, ranking, report.top_n)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "d) Q-Q and P-P plots")?;
    match &report.qq {
        Some(qq) => writeln!(
            out,
            "  Q-Q fit:        slope {:.2}, intercept {:.2}, r {}",
            qq.slope,
            qq.intercept,
            fmt_opt(qq.r)
        )?,
        None => writeln!(out, "  Q-Q fit:        no data")?,
    }
    match &report.pp {
        Some(pp) => writeln!(out, "  P-P max |F_n - F|: {:.4}", pp.max_deviation)?,
        None => writeln!(out, "  P-P:            no data or no spread")?,
    }

    let t = &report.tiers;
    writeln!(out)?;
    writeln!(
        out,
        "Moderate ({} < d <= {}) and extreme (d > {}) outliers, d = |x - mean| / IQR",
        t.coefficients.moderate, t.coefficients.extreme, t.coefficients.extreme
    )?;
    writeln!(out, "  Moderate outliers: {}", t.moderate.len())?;
    writeln!(out, "  Extreme outliers:  {}", t.extreme.len())?;
    for tier in [Tier::Moderate, Tier::Extreme] {
        if let Some(ranking) = report.tier_ranking(tier) {
            writeln!(out)?;
            write_ranking(out, ranking, report.top_n)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary statistics by variant")?;
    writeln!(
        out,
        "  {:<26} {:>6} {:>14} {:>14} {:>14}",
        "Variant", "Count", "Mean", "Mode", "Median"
    )?;
    writeln!(out, "  {}", "-".repeat(78))?;
    for v in &report.variants {
        writeln!(
            out,
            "  {:<26} {:>6} {:>14} {:>14} {:>14}",
            v.kind.label(),
            v.stats.count,
            fmt_opt(v.stats.mean),
            fmt_opt(v.stats.mode),
            fmt_opt(v.stats.median)
        )?;
    }
    Ok(())
}

fn write_method(out: &mut String, letter: &str, m: &MethodSummary) -> std::fmt::Result {
    let title = match m.rule.method() {
        OutlierMethod::Iqr => "Interquartile range (IQR) outliers",
        OutlierMethod::ZScore => "Z-score outliers",
        OutlierMethod::Boxplot => "Box-and-whisker outliers",
    };
    writeln!(out, "{letter}) {title}: {}", m.rule)?;

    if let Some(b) = &m.bounds {
        write_bounds(out, b)?;
    }
    if let Some(w) = &m.whiskers {
        writeln!(out, "  {:<14} {:>14.2}", "Lower whisker", w.low)?;
        writeln!(out, "  {:<14} {:>14.2}", "Upper whisker", w.high)?;
    }
    if m.rule.method() == OutlierMethod::ZScore {
        writeln!(out, "  {:<14} {:>14}", "Mean", fmt_opt(m.mean))?;
        writeln!(out, "  {:<14} {:>14}", "Std dev (pop)", fmt_opt(m.std_dev))?;
    }
    writeln!(out, "  Total outliers: {}", m.outliers)
}

fn write_bounds(out: &mut String, b: &Bounds) -> std::fmt::Result {
    for (name, value) in [
        ("Q1", b.q1),
        ("Q3", b.q3),
        ("IQR", b.iqr),
        ("Lower fence", b.lower_fence),
        ("Upper fence", b.upper_fence),
    ] {
        writeln!(out, "  {name:<14} {value:>14.2}")?;
    }
    Ok(())
}

fn write_ranking(out: &mut String, ranking: &RegionRanking, top_n: usize) -> std::fmt::Result {
    writeln!(
        out,
        "  Top {top_n} regions by {} ({} scope, share of {} outliers):",
        ranking.criterion.label(),
        ranking.scope,
        ranking.total_outliers
    )?;
    let top = ranking.top(top_n);
    if top.is_empty() {
        return writeln!(out, "  (no outliers)");
    }
    for share in top {
        writeln!(
            out,
            "  {:<width$} {:>8}",
            share.region,
            fmt_opt(share.percent),
            width = REGION_WIDTH
        )?;
    }
    Ok(())
}

/// Two-decimal number, or `NaN` for a missing statistic.
pub(crate) fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_print_as_nan() {
        assert_eq!(fmt_opt(None), "NaN");
        assert_eq!(fmt_opt(Some(19.166_666)), "19.17");
        assert_eq!(fmt_opt(Some(3.0)), "3.00");
    }
}
