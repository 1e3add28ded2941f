//! In-memory session dataset.
//!
//! A [`Dataset`] wraps a polars [`DataFrame`] and records which string
//! columns are ordered categoricals together with their label order. All
//! other semantic types are derived from the column dtype.

use crate::error::{AnalysisError, Result};
use crate::types::ColumnKind;
use crate::utils::{DtypeCategory, get_dtype_category, string_values};
use polars::prelude::*;
use std::collections::HashMap;

/// Tabular dataset shared by every cleaning stage and query.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    categories: HashMap<String, Vec<String>>,
}

impl Dataset {
    /// Wrap a raw DataFrame. No column is categorical until normalized.
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            categories: HashMap::new(),
        }
    }

    /// Borrow the backing DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the dataset and return the backing DataFrame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Borrow one column as a Series.
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|col| col.as_materialized_series())
            .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
    }

    /// Semantic type of one column.
    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        let series = self.series(name)?;
        if self.categories.contains_key(name) {
            return Ok(ColumnKind::OrderedCategorical);
        }
        Ok(match get_dtype_category(series.dtype()) {
            DtypeCategory::Numeric => ColumnKind::Numeric,
            DtypeCategory::Boolean => ColumnKind::Boolean,
            DtypeCategory::String | DtypeCategory::Other => ColumnKind::NominalString,
        })
    }

    /// Semantic types of all columns, in column order.
    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.column_names()
            .into_iter()
            .filter_map(|name| self.kind(&name).ok().map(|kind| (name, kind)))
            .collect()
    }

    /// Names of all numeric columns, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.schema()
            .into_iter()
            .filter(|(_, kind)| *kind == ColumnKind::Numeric)
            .map(|(name, _)| name)
            .collect()
    }

    /// Ordered label set of a categorical column.
    pub fn category_labels(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Position of each value in the label order of a categorical column.
    pub fn category_codes(&self, name: &str) -> Result<Vec<Option<usize>>> {
        let labels = self.category_labels(name).ok_or_else(|| {
            AnalysisError::InvalidArgument(format!(
                "Column '{}' is not an ordered categorical",
                name
            ))
        })?;
        let values = string_values(self.series(name)?)?;
        Ok(values
            .into_iter()
            .map(|v| v.and_then(|v| labels.iter().position(|l| *l == v)))
            .collect())
    }

    /// Swap in a fully transformed frame.
    pub(crate) fn commit(&mut self, frame: DataFrame) {
        self.categories
            .retain(|name, _| frame.column(name.as_str()).is_ok());
        self.frame = frame;
    }

    /// Declare a string column as ordered categorical.
    pub(crate) fn set_categories(&mut self, name: &str, labels: Vec<String>) {
        self.categories.insert(name.to_string(), labels);
    }
}

impl From<DataFrame> for Dataset {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            df![
                "revenue" => [1.0, 2.0],
                "traffic_type" => [1i64, 2],
                "weekend" => [true, false],
                "region" => ["North", "South"],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_kind_from_dtype() {
        let ds = sample();
        assert_eq!(ds.kind("revenue").unwrap(), ColumnKind::Numeric);
        assert_eq!(ds.kind("traffic_type").unwrap(), ColumnKind::Numeric);
        assert_eq!(ds.kind("weekend").unwrap(), ColumnKind::Boolean);
        assert_eq!(ds.kind("region").unwrap(), ColumnKind::NominalString);
    }

    #[test]
    fn test_missing_column() {
        let ds = sample();
        let err = ds.kind("month").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_numeric_columns() {
        let ds = sample();
        assert_eq!(ds.numeric_columns(), vec!["revenue", "traffic_type"]);
    }

    #[test]
    fn test_categories() {
        let mut ds = sample();
        ds.set_categories("region", vec!["South".to_string(), "North".to_string()]);
        assert_eq!(ds.kind("region").unwrap(), ColumnKind::OrderedCategorical);
        assert_eq!(ds.category_codes("region").unwrap(), vec![Some(1), Some(0)]);
        assert!(ds.category_codes("revenue").is_err());
    }

    #[test]
    fn test_commit_drops_stale_categories() {
        let mut ds = sample();
        ds.set_categories("region", vec!["North".to_string(), "South".to_string()]);
        let frame = ds.frame().drop("region").unwrap();
        ds.commit(frame);
        assert!(ds.category_labels("region").is_none());
        assert_eq!(ds.width(), 3);
    }
}
