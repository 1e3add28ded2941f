//! Shared utilities for session analysis.
//!
//! This module contains common helper functions used across the cleaning
//! stages and the aggregation queries.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_boolean_dtype(dtype) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Value Extraction Utilities
// =============================================================================

/// Check if a numeric cell counts as missing (null or NaN).
#[inline]
pub fn is_missing(value: Option<f64>) -> bool {
    value.is_none_or(f64::is_nan)
}

/// Read a numeric or boolean Series as `f64` cells, booleans counting as 0/1.
///
/// NaN cells are reported as `None` so that callers treat them as missing.
pub fn float_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    if is_boolean_dtype(series.dtype()) {
        return Ok(series
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
            .collect());
    }

    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Collect the observed (non-missing) values of a numeric Series.
pub fn observed_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(float_values(series)?.into_iter().flatten().collect())
}

/// Read any Series as optional strings.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill missing cells (null or NaN) in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let result_vec: Vec<Option<f64>> = casted
        .f64()?
        .into_iter()
        .map(|v| if is_missing(v) { Some(fill_value) } else { v })
        .collect();

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Count missing cells in a Series; NaN counts as missing for numeric columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if is_numeric_dtype(series.dtype()) {
        let casted = series.cast(&DataType::Float64)?;
        Ok(casted.f64()?.into_iter().filter(|v| is_missing(*v)).count())
    } else {
        Ok(series.null_count())
    }
}

// =============================================================================
// Boolean Coercion Utilities
// =============================================================================

/// Textual tokens coerced to `true`. Any other non-numeric text is `false`.
pub const BOOLEAN_TRUE_VALUES: [&str; 4] = ["true", "t", "yes", "y"];

/// Check if a string is truthy: a true-like token or a nonzero number.
pub fn is_truthy_str(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    if BOOLEAN_TRUE_VALUES.iter().any(|&v| v == lower) {
        return true;
    }
    lower
        .parse::<f64>()
        .map(|num| num != 0.0 && !num.is_nan())
        .unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_is_integer_dtype() {
        assert!(is_integer_dtype(&DataType::Int32));
        assert!(is_integer_dtype(&DataType::UInt8));
        assert!(!is_integer_dtype(&DataType::Float64));
        assert!(!is_integer_dtype(&DataType::String));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Other);
    }

    #[test]
    fn test_float_values_treats_nan_as_missing() {
        let series = Series::new("x".into(), &[Some(1.0), None, Some(f64::NAN)]);
        let values = float_values(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None, None]);
    }

    #[test]
    fn test_float_values_booleans_as_indicator() {
        let series = Series::new("flag".into(), &[Some(true), Some(false), None]);
        let values = float_values(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), Some(0.0), None]);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(f64::NAN)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 0.0);
    }

    #[test]
    fn test_missing_count() {
        let numeric = Series::new("n".into(), &[Some(1.0), None, Some(f64::NAN)]);
        assert_eq!(missing_count(&numeric).unwrap(), 2);

        let text = Series::new("s".into(), &[Some("a"), None]);
        assert_eq!(missing_count(&text).unwrap(), 1);
    }

    #[test]
    fn test_is_truthy_str() {
        assert!(is_truthy_str("true"));
        assert!(is_truthy_str(" TRUE "));
        assert!(is_truthy_str("yes"));
        assert!(is_truthy_str("1"));
        assert!(is_truthy_str("2.5"));
        assert!(!is_truthy_str("false"));
        assert!(!is_truthy_str("0"));
        assert!(!is_truthy_str("0.0"));
        assert!(!is_truthy_str(""));
        assert!(!is_truthy_str("maybe"));
    }
}
