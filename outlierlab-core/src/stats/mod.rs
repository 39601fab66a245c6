//! Descriptive statistics: pure functions over a numeric column.
//!
//! Quantiles use linear interpolation between closest ranks (Hyndman–Fan
//! type 7), the default of pandas and numpy. Every bound and fence in the
//! crate is derived from these functions, so the convention is fixed here.

mod summary;

pub use summary::SummaryStats;

use thiserror::Error;

/// Errors from statistical computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("cannot compute {0} of an empty series")]
    EmptyInput(&'static str),

    #[error("quantile level {0} is outside [0, 1]")]
    InvalidQuantile(f64),

    #[error("invalid coefficient {name} = {value}: {reason}")]
    InvalidCoefficient {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("series has zero spread; {0} is undefined")]
    ZeroSpread(&'static str),
}

/// Sort a copy of `values` ascending. NaN sorts last.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of already-sorted values with linear interpolation.
///
/// `h = (n - 1) * p`, `Q = x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Result<f64, StatsError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidQuantile(p));
    }
    if sorted.is_empty() {
        return Err(StatsError::EmptyInput("quantile"));
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;

    Ok(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Quantile of unsorted values with linear interpolation.
pub fn quantile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    quantile_sorted(&sorted(values), p)
}

/// First quartile, median, third quartile.
pub fn quartiles(values: &[f64]) -> Result<(f64, f64, f64), StatsError> {
    let sorted = sorted(values);
    Ok((
        quantile_sorted(&sorted, 0.25)?,
        quantile_sorted(&sorted, 0.5)?,
        quantile_sorted(&sorted, 0.75)?,
    ))
}

/// Arithmetic mean. `None` for an empty series.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median: the average of the two middle values for an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5).ok()
}

/// Most frequent value; the smallest one when several tie.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let mut best: Option<(f64, usize)> = None;

    let mut i = 0;
    while i < sorted.len() {
        let v = sorted[i];
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == v {
            j += 1;
        }
        let run = j - i;
        // Strictly greater keeps the smallest value among equal runs.
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((v, run));
        }
        i = j;
    }

    best.map(|(v, _)| v)
}

/// Population standard deviation (divisor N).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Sample standard deviation (divisor N - 1). `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
