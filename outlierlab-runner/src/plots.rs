//! Q-Q and P-P plots rendered to SVG with plotters.

use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

use outlierlab_core::distribution::{PpPlotData, PpReference, QqPlotData};

use crate::runner::AnalysisReport;

pub const QQ_PLOT_FILE: &str = "qq-plot.svg";
pub const PP_PLOT_FILE: &str = "pp-plot.svg";

const SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to create plot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

/// Render both plots into `output_dir`. Returns the written paths; a plot
/// without data is skipped.
pub fn write_plots(report: &AnalysisReport, output_dir: &Path) -> Result<Vec<PathBuf>, PlotError> {
    std::fs::create_dir_all(output_dir).map_err(|source| PlotError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    if let Some(qq) = &report.qq {
        let path = output_dir.join(QQ_PLOT_FILE);
        render_qq_plot(qq, &path)?;
        written.push(path);
    }
    if let Some(pp) = &report.pp {
        let path = output_dir.join(PP_PLOT_FILE);
        render_pp_plot(pp, &path)?;
        written.push(path);
    }
    for path in &written {
        tracing::info!(path = %path.display(), "plot saved");
    }
    Ok(written)
}

/// Ordered values against normal quantiles, with the least-squares line in red.
pub fn render_qq_plot(data: &QqPlotData, path: &Path) -> Result<(), PlotError> {
    let (x_range, y_range) = padded_ranges(&data.points);
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Q-Q plot vs norm", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)
        .map_err(|e| render_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Theoretical quantiles")
        .y_desc("Ordered values")
        .draw()
        .map_err(|e| render_error(path, e))?;

    chart
        .draw_series(
            data.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(|e| render_error(path, e))?;

    let line = [x_range.start, x_range.end].map(|x| (x, data.slope * x + data.intercept));
    chart
        .draw_series(LineSeries::new(line, &RED))
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}

/// Empirical against theoretical probabilities, with the dashed diagonal.
pub fn render_pp_plot(data: &PpPlotData, path: &Path) -> Result<(), PlotError> {
    let caption = match data.reference {
        PpReference::Fitted => "P-P plot vs fitted norm",
        PpReference::Standard => "P-P plot vs norm",
    };

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(|e| render_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Theoretical probabilities")
        .y_desc("Empirical probabilities")
        .draw()
        .map_err(|e| render_error(path, e))?;

    // Diagonal drawn as short segments to read as a dashed line.
    chart
        .draw_series((0..20).filter(|i| i % 2 == 0).map(|i| {
            let a = i as f64 / 20.0;
            let b = (i + 1) as f64 / 20.0;
            PathElement::new(vec![(a, a), (b, b)], BLACK)
        }))
        .map_err(|e| render_error(path, e))?;

    chart
        .draw_series(
            data.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}

fn render_error(path: &Path, e: impl std::fmt::Display) -> PlotError {
    PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Axis ranges covering all points with 5% padding on each side.
fn padded_ranges(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    (
        padded_range(points.iter().map(|p| p.0)),
        padded_range(points.iter().map(|p| p.1)),
    )
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}
