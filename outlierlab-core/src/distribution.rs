//! Normality diagnostics: Q-Q and P-P plot coordinates.
//!
//! Q-Q follows the `probplot` convention: the sorted sample is plotted
//! against normal quantiles of Filliben's estimate of the uniform
//! order-statistic medians, with a least-squares reference line.
//!
//! P-P plots the empirical CDF `(i - 0.5) / n` against the theoretical
//! normal CDF at each sorted value.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::{mean, population_std_dev, sorted, StatsError};

/// Coordinates and fit for a Q-Q plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QqPlotData {
    /// `(theoretical quantile, ordered value)` pairs.
    pub points: Vec<(f64, f64)>,
    pub slope: f64,
    pub intercept: f64,
    /// Correlation of the points; `None` when either axis has no spread.
    pub r: Option<f64>,
}

/// Normal distribution the P-P plot compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PpReference {
    /// Normal with the sample mean and population σ.
    #[default]
    Fitted,
    /// N(0, 1) evaluated at the raw values.
    Standard,
}

/// Coordinates for a P-P plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpPlotData {
    pub reference: PpReference,
    /// `(theoretical probability, empirical probability)` pairs.
    pub points: Vec<(f64, f64)>,
    /// Largest vertical distance from the diagonal.
    pub max_deviation: f64,
}

/// Filliben's approximation of the uniform order-statistic medians.
pub fn filliben_medians(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let nf = n as f64;
    let last = 0.5_f64.powf(1.0 / nf);
    let mut m: Vec<f64> = (1..=n).map(|i| (i as f64 - 0.3175) / (nf + 0.365)).collect();
    m[n - 1] = last;
    m[0] = 1.0 - last;
    m
}

fn standard_normal() -> Result<Normal, StatsError> {
    Normal::new(0.0, 1.0).map_err(|_| StatsError::ZeroSpread("standard normal"))
}

pub fn qq_points(values: &[f64]) -> Result<QqPlotData, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput("Q-Q plot"));
    }
    let ordered = sorted(values);
    let normal = standard_normal()?;
    let theoretical: Vec<f64> = filliben_medians(ordered.len())
        .into_iter()
        .map(|p| normal.inverse_cdf(p))
        .collect();

    let (slope, intercept, r) = least_squares(&theoretical, &ordered);

    Ok(QqPlotData {
        points: theoretical.into_iter().zip(ordered).collect(),
        slope,
        intercept,
        r,
    })
}

pub fn pp_points(values: &[f64], reference: PpReference) -> Result<PpPlotData, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput("P-P plot"));
    }
    let normal = match reference {
        PpReference::Standard => standard_normal()?,
        PpReference::Fitted => {
            let m = mean(values).ok_or(StatsError::EmptyInput("P-P plot"))?;
            let sigma = population_std_dev(values).ok_or(StatsError::EmptyInput("P-P plot"))?;
            Normal::new(m, sigma).map_err(|_| StatsError::ZeroSpread("fitted normal"))?
        }
    };

    let ordered = sorted(values);
    let n = ordered.len() as f64;
    let points: Vec<(f64, f64)> = ordered
        .iter()
        .enumerate()
        .map(|(i, &x)| (normal.cdf(x), (i as f64 + 0.5) / n))
        .collect();
    let max_deviation = points
        .iter()
        .map(|(t, e)| (e - t).abs())
        .fold(0.0, f64::max);

    Ok(PpPlotData {
        reference,
        points,
        max_deviation,
    })
}

/// Ordinary least squares `y = slope·x + intercept` and Pearson r.
fn least_squares(x: &[f64], y: &[f64]) -> (f64, f64, Option<f64>) {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let syy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();

    if sxx == 0.0 {
        return (0.0, my, None);
    }
    let slope = sxy / sxx;
    let r = (syy > 0.0).then(|| sxy / (sxx * syy).sqrt());
    (slope, my - slope * mx, r)
}
