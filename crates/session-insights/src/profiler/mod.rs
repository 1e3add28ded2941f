//! Data profiling module for dataset analysis.
//!
//! This module provides descriptive summaries of a dataset:
//! - Semantic type per column
//! - Descriptive statistics for numeric columns
//! - Missing-value counts

pub(crate) mod statistics;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{ColumnDescription, ColumnKind, DatasetProfile, NullCount, NumericSummary};
use crate::utils::{missing_count, observed_values};
use statistics::{mean, quantile_sorted, sample_std, sorted};
use tracing::debug;

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DatasetProfiler;

impl DatasetProfiler {
    /// Profile an entire dataset.
    pub fn profile(dataset: &Dataset) -> Result<DatasetProfile> {
        let profile = DatasetProfile {
            shape: Self::shape(dataset),
            columns: Self::describe_columns(dataset)?,
            statistics: Self::get_statistics(dataset)?,
            null_counts: Self::count_nulls(dataset)?,
        };
        debug!(
            "Profiled dataset: {} rows, {} columns",
            profile.shape.0, profile.shape.1
        );
        Ok(profile)
    }

    /// `(rows, columns)`
    pub fn shape(dataset: &Dataset) -> (usize, usize) {
        dataset.shape()
    }

    /// Name, semantic type and physical dtype of every column, in order.
    pub fn describe_columns(dataset: &Dataset) -> Result<Vec<ColumnDescription>> {
        dataset
            .column_names()
            .into_iter()
            .map(|name| {
                let kind = dataset.kind(&name)?;
                let dtype = format!("{:?}", dataset.series(&name)?.dtype());
                Ok(ColumnDescription { name, kind, dtype })
            })
            .collect()
    }

    /// Count, mean, sample std, min, quartiles and max for every numeric
    /// column, computed over non-missing values.
    pub fn get_statistics(dataset: &Dataset) -> Result<Vec<NumericSummary>> {
        let mut summaries = Vec::new();

        for (name, kind) in dataset.schema() {
            if kind != ColumnKind::Numeric {
                continue;
            }
            let values = sorted(&observed_values(dataset.series(&name)?)?);
            let (min, max) = match (values.first(), values.last()) {
                (Some(min), Some(max)) => (*min, *max),
                _ => (f64::NAN, f64::NAN),
            };

            summaries.push(NumericSummary {
                count: values.len(),
                mean: mean(&values),
                std: sample_std(&values),
                min,
                q1: quantile_sorted(&values, 0.25),
                median: quantile_sorted(&values, 0.5),
                q3: quantile_sorted(&values, 0.75),
                max,
                name,
            });
        }

        Ok(summaries)
    }

    /// Missing values per column. NaN counts as missing in numeric columns.
    pub fn count_nulls(dataset: &Dataset) -> Result<Vec<NullCount>> {
        dataset
            .column_names()
            .into_iter()
            .map(|name| {
                let nulls = missing_count(dataset.series(&name)?)?;
                Ok(NullCount { name, nulls })
            })
            .collect()
    }
}
