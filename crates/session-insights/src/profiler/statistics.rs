//! Statistical functions over observed (non-missing) column values.

use std::cmp::Ordering;

/// Arithmetic mean; NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); NaN for fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

/// Sort a copy of the values ascending.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile of pre-sorted values, interpolating linearly between closest ranks.
pub(crate) fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

/// Median; NaN for an empty slice.
pub(crate) fn median(values: &[f64]) -> f64 {
    quantile_sorted(&sorted(values), 0.5)
}

/// Adjusted Fisher-Pearson sample skewness.
///
/// `G1 = n * sqrt(n - 1) / (n - 2) * M3 / M2^1.5` over the summed central
/// moments. NaN for fewer than three values, zero for a constant column.
pub(crate) fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }

    let nf = n as f64;
    let mean = mean(values);
    let m2 = zero_rounding_noise(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>());
    let m3 = zero_rounding_noise(values.iter().map(|v| (v - mean).powi(3)).sum::<f64>());

    if m2 == 0.0 {
        return 0.0;
    }

    nf * (nf - 1.0).sqrt() / (nf - 2.0) * m3 / m2.powf(1.5)
}

/// Summed moments below this magnitude are floating point error.
const MOMENT_EPSILON: f64 = 1e-14;

fn zero_rounding_noise(moment: f64) -> f64 {
    if moment.abs() < MOMENT_EPSILON { 0.0 } else { moment }
}

/// Pearson correlation of paired observations.
///
/// NaN for fewer than two pairs or when either side is constant.
pub(crate) fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Interquartile bounds `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`.
pub(crate) fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}
