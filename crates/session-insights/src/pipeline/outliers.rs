//! Outlier handling module.
//!
//! Contains functions for detecting and removing IQR outliers in numeric columns.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::profiler::statistics::iqr_bounds;
use crate::types::ColumnKind;
use crate::utils::float_values;
use polars::prelude::*;
use tracing::debug;

/// Removes rows holding outliers.
pub struct OutlierFilter;

impl OutlierFilter {
    /// Remove rows containing outliers using the IQR method.
    ///
    /// Columns are processed in the given order and each column's bounds are
    /// computed over the rows left by the previous columns. Missing values
    /// are always kept. Every column is validated before any row is dropped.
    pub fn remove_outliers(
        dataset: &mut Dataset,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        for col_name in columns {
            if dataset.kind(col_name)? != ColumnKind::Numeric {
                return Err(AnalysisError::InvalidArgument(format!(
                    "Outlier column '{}' is not numeric",
                    col_name
                )));
            }
        }

        let original_rows = dataset.height();
        let mut df = dataset.frame().clone();
        let mut steps = Vec::new();

        for col_name in columns {
            let series = df.column(col_name)?.as_materialized_series();
            let values = float_values(series)?;
            let observed: Vec<f64> = values.iter().flatten().copied().collect();

            let Some((lower_bound, upper_bound)) = iqr_bounds(&observed) else {
                continue;
            };

            let mask_values: Vec<bool> = values
                .iter()
                .map(|v| v.is_none_or(|val| val >= lower_bound && val <= upper_bound))
                .collect();
            let removed = mask_values.iter().filter(|keep| !**keep).count();
            if removed == 0 {
                continue;
            }

            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            df = df.filter(&mask)?;

            debug!(
                "Removed {} outlier rows from '{}' (bounds [{:.4}, {:.4}])",
                removed, col_name, lower_bound, upper_bound
            );
            steps.push(format!(
                "Removed {} rows with '{}' outside [{:.2}, {:.2}]",
                removed, col_name, lower_bound, upper_bound
            ));
        }

        dataset.commit(df);

        let rows_removed = original_rows - dataset.height();
        if rows_removed > 0 {
            processing_steps.extend(steps);
            processing_steps.push(format!("Removed {} rows containing outliers", rows_removed));
            debug!("Removed {} outlier rows", rows_removed);
        }

        Ok(rows_removed)
    }
}
