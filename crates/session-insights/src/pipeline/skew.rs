//! Skewness correction for numeric columns.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::profiler::statistics::skewness;
use crate::utils::float_values;
use polars::prelude::*;
use tracing::debug;

/// Log-transforms heavily skewed numeric columns.
pub struct SkewCorrector;

impl SkewCorrector {
    /// Apply `ln(1 + x)` to every numeric column whose absolute sample
    /// skewness exceeds `threshold`.
    ///
    /// Missing values stay missing; values below -1 become NaN. Returns the
    /// names of the transformed columns.
    pub fn fix_skew(
        dataset: &mut Dataset,
        threshold: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "Skew threshold must be a finite, non-negative number (got {})",
                threshold
            )));
        }

        let mut frame = dataset.frame().clone();
        let mut corrected = Vec::new();
        let mut steps = Vec::new();

        for col_name in dataset.numeric_columns() {
            let values = float_values(dataset.series(&col_name)?)?;
            let observed: Vec<f64> = values.iter().flatten().copied().collect();
            let skew = skewness(&observed);

            // NaN for fewer than three observed values.
            if skew.is_nan() || skew.abs() <= threshold {
                continue;
            }

            let transformed: Vec<Option<f64>> =
                values.iter().map(|v| v.map(f64::ln_1p)).collect();
            frame
                .replace(&col_name, Series::new(col_name.as_str().into(), transformed))
                .context(format!("Log-transforming column '{}'", col_name))?;

            debug!(
                "Applied log1p to '{}' (skewness {:.4} > {})",
                col_name, skew, threshold
            );
            steps.push(format!(
                "Applied log(1 + x) to '{}' (skewness: {:.2})",
                col_name, skew
            ));
            corrected.push(col_name);
        }

        dataset.commit(frame);
        processing_steps.extend(steps);
        Ok(corrected)
    }
}
