//! Type normalization for the raw session columns.

use super::converters::{MONTH_LABELS, truthy_to_boolean, validate_month_labels};
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use tracing::debug;

/// Column holding the visit month label.
pub const MONTH_COLUMN: &str = "month";
/// Column flagging weekend sessions.
pub const WEEKEND_COLUMN: &str = "weekend";
/// Column flagging sessions that generated revenue.
pub const REVENUE_COLUMN: &str = "revenue";

/// Coerces the raw `month`, `weekend` and `revenue` columns into their
/// canonical semantic types.
pub struct TypeNormalizer;

impl TypeNormalizer {
    /// Normalize column types in place.
    ///
    /// `month` becomes an ordered categorical over the calendar labels;
    /// `weekend` and `revenue` become boolean. Every conversion is computed
    /// before anything is written, so a failure leaves the dataset as it was.
    pub fn convert_columns(
        dataset: &mut Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let month = validate_month_labels(dataset.series(MONTH_COLUMN)?)?;
        let weekend = truthy_to_boolean(dataset.series(WEEKEND_COLUMN)?)?;
        let revenue = truthy_to_boolean(dataset.series(REVENUE_COLUMN)?)?;

        let mut frame = dataset.frame().clone();
        frame
            .replace(MONTH_COLUMN, month)
            .context("Replacing month column")?;
        frame
            .replace(WEEKEND_COLUMN, weekend)
            .context("Replacing weekend column")?;
        frame
            .replace(REVENUE_COLUMN, revenue)
            .context("Replacing revenue column")?;

        dataset.commit(frame);
        dataset.set_categories(
            MONTH_COLUMN,
            MONTH_LABELS.iter().map(|l| l.to_string()).collect(),
        );

        processing_steps.push(format!(
            "Converted '{}' to ordered categorical ({} labels)",
            MONTH_COLUMN,
            MONTH_LABELS.len()
        ));
        processing_steps.push(format!(
            "Converted '{}' and '{}' to boolean",
            WEEKEND_COLUMN, REVENUE_COLUMN
        ));
        debug!("Normalized month, weekend and revenue column types");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;
    use polars::prelude::*;

    fn raw_sessions() -> Dataset {
        Dataset::new(
            df![
                "month" => ["Feb", "Mar", "Nov", "Dec"],
                "weekend" => [0i64, 1, 0, 1],
                "revenue" => ["False", "True", "True", "False"],
                "bounce_rates" => [0.2, 0.0, 0.05, 0.02],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_convert_columns_sets_semantic_types() {
        let mut ds = raw_sessions();
        let mut steps = Vec::new();

        TypeNormalizer::convert_columns(&mut ds, &mut steps).unwrap();

        assert_eq!(ds.kind("month").unwrap(), ColumnKind::OrderedCategorical);
        assert_eq!(ds.kind("weekend").unwrap(), ColumnKind::Boolean);
        assert_eq!(ds.kind("revenue").unwrap(), ColumnKind::Boolean);
        assert_eq!(ds.kind("bounce_rates").unwrap(), ColumnKind::Numeric);
        assert_eq!(ds.height(), 4);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_month_labels_are_calendar_ordered() {
        let mut ds = raw_sessions();
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();

        let expected: Vec<String> = MONTH_LABELS.iter().map(|l| l.to_string()).collect();
        assert_eq!(ds.category_labels("month").unwrap(), expected.as_slice());
        assert_eq!(
            ds.category_codes("month").unwrap(),
            vec![Some(1), Some(2), Some(10), Some(11)]
        );
    }

    #[test]
    fn test_boolean_coercion() {
        let mut ds = raw_sessions();
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();

        let weekend: Vec<Option<bool>> = ds
            .series("weekend")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(weekend, vec![Some(false), Some(true), Some(false), Some(true)]);

        let revenue: Vec<Option<bool>> = ds
            .series("revenue")
            .unwrap()
            .bool()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(revenue, vec![Some(false), Some(true), Some(true), Some(false)]);
    }

    #[test]
    fn test_invalid_month_leaves_dataset_untouched() {
        let mut ds = Dataset::new(
            df![
                "month" => ["Feb", "June"],
                "weekend" => [0i64, 1],
                "revenue" => [0i64, 1],
            ]
            .unwrap(),
        );
        let mut steps = Vec::new();

        let err = TypeNormalizer::convert_columns(&mut ds, &mut steps).unwrap_err();

        assert_eq!(err.error_code(), "INVALID_CATEGORY");
        assert_eq!(ds.kind("month").unwrap(), ColumnKind::NominalString);
        assert_eq!(ds.kind("weekend").unwrap(), ColumnKind::Numeric);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_missing_required_column() {
        let mut ds = Dataset::new(
            df![
                "month" => ["Feb"],
                "revenue" => [true],
            ]
            .unwrap(),
        );

        let err = TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let mut ds = raw_sessions();
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();

        assert_eq!(ds.kind("month").unwrap(), ColumnKind::OrderedCategorical);
        assert_eq!(ds.kind("revenue").unwrap(), ColumnKind::Boolean);
    }
}
