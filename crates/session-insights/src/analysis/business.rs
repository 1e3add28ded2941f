//! Business metrics over a cleaned session dataset.

use super::grouping::{aggregate, group_rows, observed_at, sort_descending_by, sum, value_column};
use crate::cleaner::{REVENUE_COLUMN, WEEKEND_COLUMN};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::statistics::mean;
use crate::types::{AggregationResult, GroupEntry, TrafficSummary};
use tracing::debug;

/// Column holding the visitor region.
pub const REGION_COLUMN: &str = "region";
/// Column holding the traffic source code.
pub const TRAFFIC_TYPE_COLUMN: &str = "traffic_type";
/// Column holding the session bounce rate.
pub const BOUNCE_RATES_COLUMN: &str = "bounce_rates";

/// Grouped revenue metrics. None of the queries mutate the dataset.
pub struct BusinessAnalysis;

impl BusinessAnalysis {
    /// Mean revenue per weekend flag, `false` before `true`.
    pub fn weekend_sales_analysis(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        let groups = group_rows(dataset, WEEKEND_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;

        let entries = aggregate(&groups, &revenue, mean);
        debug!("Weekend sales analysis: {} groups", entries.len());
        Ok(AggregationResult::new(WEEKEND_COLUMN, entries))
    }

    /// Total revenue per region, largest first.
    pub fn regional_revenue_analysis(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        let groups = group_rows(dataset, REGION_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;

        let mut entries = aggregate(&groups, &revenue, sum);
        sort_descending_by(&mut entries, |v| *v);
        debug!("Regional revenue analysis: {} groups", entries.len());
        Ok(AggregationResult::new(REGION_COLUMN, entries))
    }

    /// Total revenue and mean bounce rate per traffic type, by revenue descending.
    pub fn traffic_analysis(dataset: &Dataset) -> Result<AggregationResult<TrafficSummary>> {
        let groups = group_rows(dataset, TRAFFIC_TYPE_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;
        let bounce_rates = value_column(dataset, BOUNCE_RATES_COLUMN)?;

        let mut entries: Vec<GroupEntry<TrafficSummary>> = groups
            .iter()
            .map(|(key, rows)| GroupEntry {
                key: key.clone(),
                value: TrafficSummary {
                    revenue: sum(&observed_at(&revenue, rows)),
                    bounce_rates: mean(&observed_at(&bounce_rates, rows)),
                },
            })
            .collect();
        sort_descending_by(&mut entries, |v| v.revenue);
        debug!("Traffic analysis: {} groups", entries.len());
        Ok(AggregationResult::new(TRAFFIC_TYPE_COLUMN, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupKey;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_regional_revenue_sorted_descending() {
        let ds = Dataset::new(
            df![
                "region" => ["A", "B", "A"],
                "revenue" => [10.0, 30.0, 5.0],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::regional_revenue_analysis(&ds).unwrap();

        assert_eq!(
            result.pairs(),
            vec![(GroupKey::from("B"), 30.0), (GroupKey::from("A"), 15.0)]
        );
        assert_eq!(result.group_column, "region");
    }

    #[test]
    fn test_regional_revenue_ties_keep_key_order() {
        let ds = Dataset::new(
            df![
                "region" => ["C", "A", "B"],
                "revenue" => [1.0, 1.0, 2.0],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::regional_revenue_analysis(&ds).unwrap();
        let keys: Vec<String> = result.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_weekend_sales_boolean_revenue() {
        let ds = Dataset::new(
            df![
                "weekend" => [true, false, true, false, false],
                "revenue" => [true, false, false, true, false],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::weekend_sales_analysis(&ds).unwrap();

        assert_eq!(result.keys(), vec![&GroupKey::Bool(false), &GroupKey::Bool(true)]);
        assert!((result.get(&GroupKey::Bool(false)).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(result.get(&GroupKey::Bool(true)), Some(&0.5));
    }

    #[test]
    fn test_weekend_sales_no_phantom_keys() {
        let ds = Dataset::new(
            df![
                "weekend" => [false, false],
                "revenue" => [1.0, 3.0],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::weekend_sales_analysis(&ds).unwrap();

        assert_eq!(result.pairs(), vec![(GroupKey::Bool(false), 2.0)]);
    }

    #[test]
    fn test_missing_keys_and_values_skipped() {
        let ds = Dataset::new(
            df![
                "region" => [Some("A"), None, Some("A")],
                "revenue" => [Some(1.0), Some(50.0), None],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::regional_revenue_analysis(&ds).unwrap();

        assert_eq!(result.pairs(), vec![(GroupKey::from("A"), 1.0)]);
    }

    #[test]
    fn test_traffic_analysis() {
        let ds = Dataset::new(
            df![
                "traffic_type" => [1i64, 2, 1, 3, 2],
                "revenue" => [true, true, false, false, true],
                "bounce_rates" => [0.1, 0.2, 0.3, 0.05, 0.0],
            ]
            .unwrap(),
        );

        let result = BusinessAnalysis::traffic_analysis(&ds).unwrap();

        let keys: Vec<&GroupKey> = result.keys();
        assert_eq!(keys, vec![&GroupKey::Int(2), &GroupKey::Int(1), &GroupKey::Int(3)]);

        let first = result.get(&GroupKey::Int(2)).unwrap();
        assert_eq!(first.revenue, 2.0);
        assert!((first.bounce_rates - 0.1).abs() < 1e-12);

        let second = result.get(&GroupKey::Int(1)).unwrap();
        assert_eq!(second.revenue, 1.0);
        assert!((second.bounce_rates - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let ds = Dataset::new(
            df![
                "region" => ["A", "B"],
                "revenue" => [1.0, 2.0],
            ]
            .unwrap(),
        );
        let before = ds.frame().clone();

        BusinessAnalysis::regional_revenue_analysis(&ds).unwrap();

        assert!(ds.frame().equals(&before));
    }

    #[test]
    fn test_missing_column() {
        let ds = Dataset::new(df!["revenue" => [1.0]].unwrap());
        let err = BusinessAnalysis::regional_revenue_analysis(&ds).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
