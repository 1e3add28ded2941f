//! Type conversion functions for column normalization.

use crate::error::{AnalysisError, Result};
use crate::utils::{is_boolean_dtype, is_numeric_dtype, is_truthy_str};
use polars::prelude::*;

/// Calendar month labels, in order.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Validate a column of month labels, returning it as a string Series.
///
/// Missing entries stay missing; any other value outside [`MONTH_LABELS`]
/// fails with `InvalidCategory`.
pub(crate) fn validate_month_labels(series: &Series) -> Result<Series> {
    let casted = series.cast(&DataType::String)?;
    let str_series = casted.str()?;
    let mut result_vec: Vec<Option<&str>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                if !MONTH_LABELS.iter().any(|label| *label == val) {
                    return Err(AnalysisError::InvalidCategory {
                        column: series.name().to_string(),
                        value: val.to_string(),
                    });
                }
                result_vec.push(Some(val));
            }
            None => result_vec.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Coerce any column to boolean using truthiness.
///
/// Booleans pass through, numbers are true when nonzero, strings are true
/// when true-like or a nonzero number. Missing values become false.
pub(crate) fn truthy_to_boolean(series: &Series) -> Result<Series> {
    let result_vec: Vec<bool> = if is_boolean_dtype(series.dtype()) {
        series
            .bool()?
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect()
    } else if is_numeric_dtype(series.dtype()) {
        let casted = series.cast(&DataType::Float64)?;
        casted
            .f64()?
            .into_iter()
            .map(|v| v.is_some_and(|x| x != 0.0 && !x.is_nan()))
            .collect()
    } else {
        let casted = series.cast(&DataType::String)?;
        casted
            .str()?
            .into_iter()
            .map(|v| v.is_some_and(is_truthy_str))
            .collect()
    };

    Ok(Series::new(series.name().clone(), result_vec))
}
