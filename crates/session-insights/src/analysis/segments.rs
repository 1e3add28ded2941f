//! Segment-level breakdowns of session behavior.

use super::business::{BOUNCE_RATES_COLUMN, REGION_COLUMN, TRAFFIC_TYPE_COLUMN};
use super::grouping::{
    aggregate, group_keys, group_rows, observed_at, sort_ascending_by, sum, value_column,
};
use crate::cleaner::{MONTH_COLUMN, REVENUE_COLUMN};
use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::profiler::statistics::{mean, pearson, sample_std};
use crate::types::{
    AggregationResult, ColumnKind, CorrelationMatrix, Crosstab, GroupEntry, GroupKey,
    RegionalPerformance, TrafficRoi,
};
use crate::utils::{float_values, string_values};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Column holding the visitor operating system.
pub const OPERATING_SYSTEMS_COLUMN: &str = "operating_systems";
/// Column holding the visitor browser.
pub const BROWSER_COLUMN: &str = "browser";

/// Operating systems counted as mobile devices.
pub const MOBILE_OPERATING_SYSTEMS: [&str; 2] = ["iOS", "Android"];

/// Breakdowns by month, traffic source, region and device.
pub struct SegmentAnalysis;

impl SegmentAnalysis {
    /// Total revenue per month, in calendar order.
    ///
    /// Requires `month` to be an ordered categorical; only observed months
    /// are reported.
    pub fn monthly_revenue(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        let labels = dataset.category_labels(MONTH_COLUMN).ok_or_else(|| {
            AnalysisError::InvalidArgument(format!(
                "Column '{}' must be normalized before monthly analysis",
                MONTH_COLUMN
            ))
        })?;
        let codes = dataset.category_codes(MONTH_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;

        let mut by_code: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, code) in codes.into_iter().enumerate() {
            if let Some(code) = code {
                by_code.entry(code).or_default().push(row);
            }
        }

        let entries = by_code
            .into_iter()
            .map(|(code, rows)| GroupEntry {
                key: GroupKey::from(labels[code].as_str()),
                value: sum(&observed_at(&revenue, &rows)),
            })
            .collect();
        Ok(AggregationResult::new(MONTH_COLUMN, entries))
    }

    /// Share of converting sessions per traffic type, keys ascending.
    pub fn traffic_conversion_rates(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        let groups = group_rows(dataset, TRAFFIC_TYPE_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;
        Ok(AggregationResult::new(
            TRAFFIC_TYPE_COLUMN,
            aggregate(&groups, &revenue, mean),
        ))
    }

    /// Mean bounce rate per region, lowest first.
    pub fn bounce_rate_by_region(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        Self::mean_bounce_rate(dataset, REGION_COLUMN)
    }

    /// Mean bounce rate per traffic type, lowest first.
    pub fn bounce_rate_by_traffic_type(dataset: &Dataset) -> Result<AggregationResult<f64>> {
        Self::mean_bounce_rate(dataset, TRAFFIC_TYPE_COLUMN)
    }

    fn mean_bounce_rate(dataset: &Dataset, key_column: &str) -> Result<AggregationResult<f64>> {
        let groups = group_rows(dataset, key_column)?;
        let bounce_rates = value_column(dataset, BOUNCE_RATES_COLUMN)?;
        let mut entries = aggregate(&groups, &bounce_rates, mean);
        sort_ascending_by(&mut entries, |v| *v);
        Ok(AggregationResult::new(key_column, entries))
    }

    /// Session count per device class (`Desktop`, `Mobile`).
    pub fn device_breakdown(dataset: &Dataset) -> Result<AggregationResult<usize>> {
        let systems = string_values(dataset.series(OPERATING_SYSTEMS_COLUMN)?)?;

        let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();
        for os in systems.into_iter().flatten() {
            let device = if MOBILE_OPERATING_SYSTEMS.iter().any(|m| *m == os) {
                "Mobile"
            } else {
                "Desktop"
            };
            *counts.entry(GroupKey::from(device)).or_default() += 1;
        }

        let entries = counts
            .into_iter()
            .map(|(key, value)| GroupEntry { key, value })
            .collect();
        Ok(AggregationResult::new(OPERATING_SYSTEMS_COLUMN, entries))
    }

    /// Session counts of operating system against browser.
    pub fn os_browser_crosstab(dataset: &Dataset) -> Result<Crosstab> {
        let systems = group_keys(dataset.series(OPERATING_SYSTEMS_COLUMN)?)?;
        let browsers = group_keys(dataset.series(BROWSER_COLUMN)?)?;

        let pairs: Vec<(GroupKey, GroupKey)> = systems
            .into_iter()
            .zip(browsers)
            .filter_map(|(os, browser)| Some((os?, browser?)))
            .collect();

        let row_keys: BTreeSet<&GroupKey> = pairs.iter().map(|(os, _)| os).collect();
        let col_keys: BTreeSet<&GroupKey> = pairs.iter().map(|(_, b)| b).collect();
        let row_keys: Vec<&GroupKey> = row_keys.into_iter().collect();
        let col_keys: Vec<&GroupKey> = col_keys.into_iter().collect();

        let mut counts = vec![vec![0usize; col_keys.len()]; row_keys.len()];
        for (os, browser) in &pairs {
            if let (Ok(r), Ok(c)) = (row_keys.binary_search(&os), col_keys.binary_search(&browser))
            {
                counts[r][c] += 1;
            }
        }

        debug!(
            "Crosstab {}x{} over {} sessions",
            row_keys.len(),
            col_keys.len(),
            pairs.len()
        );
        Ok(Crosstab {
            row_column: OPERATING_SYSTEMS_COLUMN.to_string(),
            col_column: BROWSER_COLUMN.to_string(),
            row_labels: row_keys.iter().map(|k| k.to_string()).collect(),
            col_labels: col_keys.iter().map(|k| k.to_string()).collect(),
            counts,
        })
    }

    /// Pearson correlations between all numeric columns, in column order.
    ///
    /// Ordered categoricals take part through their category codes; boolean
    /// and text columns are left out. Each pair uses only the rows where
    /// both values are observed.
    pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
        let mut columns = Vec::new();
        let mut data: Vec<Vec<Option<f64>>> = Vec::new();
        for (name, kind) in dataset.schema() {
            let values = match kind {
                ColumnKind::Numeric => float_values(dataset.series(&name)?)?,
                ColumnKind::OrderedCategorical => dataset
                    .category_codes(&name)?
                    .into_iter()
                    .map(|code| code.map(|c| c as f64))
                    .collect(),
                _ => continue,
            };
            columns.push(name);
            data.push(values);
        }

        let values = data
            .iter()
            .map(|xs| {
                data.iter()
                    .map(|ys| {
                        let pairs: Vec<(f64, f64)> = xs
                            .iter()
                            .zip(ys)
                            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                            .collect();
                        pearson(&pairs)
                    })
                    .collect()
            })
            .collect();

        debug!("Correlation matrix over {} columns", columns.len());
        Ok(CorrelationMatrix { columns, values })
    }

    /// Revenue, bounce rate and conversion per region, with the z-score of
    /// each region's total revenue across regions. Keys ascending.
    pub fn regional_performance(
        dataset: &Dataset,
    ) -> Result<AggregationResult<RegionalPerformance>> {
        let groups = group_rows(dataset, REGION_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;
        let bounce_rates = value_column(dataset, BOUNCE_RATES_COLUMN)?;

        let mut entries: Vec<GroupEntry<RegionalPerformance>> = groups
            .iter()
            .map(|(key, rows)| {
                let region_revenue = observed_at(&revenue, rows);
                GroupEntry {
                    key: key.clone(),
                    value: RegionalPerformance {
                        total_revenue: sum(&region_revenue),
                        avg_bounce_rate: mean(&observed_at(&bounce_rates, rows)),
                        conversion_rate: mean(&region_revenue),
                        revenue_zscore: f64::NAN,
                    },
                }
            })
            .collect();

        let totals: Vec<f64> = entries.iter().map(|e| e.value.total_revenue).collect();
        let (center, spread) = (mean(&totals), sample_std(&totals));
        for entry in &mut entries {
            entry.value.revenue_zscore = if spread > 0.0 {
                (entry.value.total_revenue - center) / spread
            } else {
                f64::NAN
            };
        }

        Ok(AggregationResult::new(REGION_COLUMN, entries))
    }

    /// Revenue, visits and conversion rate per traffic type, keys ascending.
    ///
    /// Visits count sessions with an observed revenue flag.
    pub fn traffic_roi(dataset: &Dataset) -> Result<AggregationResult<TrafficRoi>> {
        let groups = group_rows(dataset, TRAFFIC_TYPE_COLUMN)?;
        let revenue = value_column(dataset, REVENUE_COLUMN)?;

        let entries = groups
            .iter()
            .map(|(key, rows)| {
                let observed = observed_at(&revenue, rows);
                let total_revenue = sum(&observed);
                let total_visits = observed.len();
                let conversion_rate = if total_visits > 0 {
                    total_revenue / total_visits as f64
                } else {
                    f64::NAN
                };
                GroupEntry {
                    key: key.clone(),
                    value: TrafficRoi {
                        total_revenue,
                        total_visits,
                        conversion_rate,
                    },
                }
            })
            .collect();

        Ok(AggregationResult::new(TRAFFIC_TYPE_COLUMN, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::TypeNormalizer;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn sessions() -> Dataset {
        let mut ds = Dataset::new(
            df![
                "month" => ["Nov", "Feb", "Nov", "Mar", "Feb"],
                "weekend" => [false, true, false, false, true],
                "revenue" => [true, false, true, false, true],
                "region" => ["North", "South", "South", "North", "East"],
                "traffic_type" => [2i64, 1, 2, 3, 1],
                "bounce_rates" => [0.1, 0.4, 0.2, 0.3, 0.0],
                "operating_systems" => ["iOS", "Windows", "Android", "MacOSX", "Windows"],
                "browser" => ["Safari", "Chrome", "Chrome", "Safari", "Edge"],
            ]
            .unwrap(),
        );
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();
        ds
    }

    fn labels<V>(result: &AggregationResult<V>) -> Vec<String> {
        result.keys().iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_monthly_revenue_calendar_order() {
        let result = SegmentAnalysis::monthly_revenue(&sessions()).unwrap();

        assert_eq!(labels(&result), vec!["Feb", "Mar", "Nov"]);
        assert_eq!(result.get(&GroupKey::from("Feb")), Some(&1.0));
        assert_eq!(result.get(&GroupKey::from("Mar")), Some(&0.0));
        assert_eq!(result.get(&GroupKey::from("Nov")), Some(&2.0));
    }

    #[test]
    fn test_monthly_revenue_requires_normalized_month() {
        let ds = Dataset::new(
            df![
                "month" => ["Feb"],
                "revenue" => [1.0],
            ]
            .unwrap(),
        );
        let err = SegmentAnalysis::monthly_revenue(&ds).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_traffic_conversion_rates() {
        let result = SegmentAnalysis::traffic_conversion_rates(&sessions()).unwrap();

        assert_eq!(
            result.pairs(),
            vec![
                (GroupKey::Int(1), 0.5),
                (GroupKey::Int(2), 1.0),
                (GroupKey::Int(3), 0.0),
            ]
        );
    }

    #[test]
    fn test_bounce_rate_sorted_ascending() {
        let result = SegmentAnalysis::bounce_rate_by_region(&sessions()).unwrap();
        assert_eq!(labels(&result), vec!["East", "North", "South"]);

        let result = SegmentAnalysis::bounce_rate_by_traffic_type(&sessions()).unwrap();
        assert_eq!(labels(&result), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_device_breakdown() {
        let result = SegmentAnalysis::device_breakdown(&sessions()).unwrap();
        assert_eq!(
            result.pairs(),
            vec![(GroupKey::from("Desktop"), 3), (GroupKey::from("Mobile"), 2)]
        );
    }

    #[test]
    fn test_os_browser_crosstab() {
        let table = SegmentAnalysis::os_browser_crosstab(&sessions()).unwrap();

        assert_eq!(table.row_labels, vec!["Android", "MacOSX", "Windows", "iOS"]);
        assert_eq!(table.col_labels, vec!["Chrome", "Edge", "Safari"]);
        assert_eq!(table.count("Windows", "Chrome"), 1);
        assert_eq!(table.count("Windows", "Edge"), 1);
        assert_eq!(table.count("iOS", "Chrome"), 0);
        let total: usize = table.counts.iter().flatten().sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_regional_performance_zscores() {
        let result = SegmentAnalysis::regional_performance(&sessions()).unwrap();

        assert_eq!(labels(&result), vec!["East", "North", "South"]);
        let east = result.get(&GroupKey::from("East")).unwrap();
        assert_eq!(east.total_revenue, 1.0);
        assert_eq!(east.conversion_rate, 1.0);
        // every region converted exactly once
        assert!(east.revenue_zscore.is_nan());

        let north = result.get(&GroupKey::from("North")).unwrap();
        assert_eq!(north.conversion_rate, 0.5);
        assert!((north.avg_bounce_rate - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_regional_performance_spread() {
        let ds = Dataset::new(
            df![
                "region" => ["A", "B", "C"],
                "revenue" => [1.0, 2.0, 3.0],
                "bounce_rates" => [0.1, 0.1, 0.1],
            ]
            .unwrap(),
        );

        let result = SegmentAnalysis::regional_performance(&ds).unwrap();
        let zscores: Vec<f64> = result.iter().map(|e| e.value.revenue_zscore).collect();
        assert_eq!(zscores, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_correlation_matrix() {
        let mut ds = Dataset::new(
            df![
                "month" => ["Jan", "Feb", "Mar", "Apr"],
                "weekend" => [0i64, 1, 0, 1],
                "revenue" => ["False", "True", "True", "False"],
                "page_values" => [Some(10.0), Some(20.0), None, Some(40.0)],
                "exit_rates" => [0.4, 0.3, 0.2, 0.1],
                "constant" => [1.0, 1.0, 1.0, 1.0],
            ]
            .unwrap(),
        );
        TypeNormalizer::convert_columns(&mut ds, &mut Vec::new()).unwrap();

        let matrix = SegmentAnalysis::correlation_matrix(&ds).unwrap();

        assert_eq!(
            matrix.columns,
            vec!["month", "page_values", "exit_rates", "constant"]
        );
        let close = |a: &str, b: &str, expected: f64| {
            let r = matrix.get(a, b).unwrap();
            assert!((r - expected).abs() < 1e-12, "{} ~ {}: {}", a, b, r);
        };
        close("month", "month", 1.0);
        // month codes 0, 1, 3 against 10, 20, 40 once the gap is skipped
        close("month", "page_values", 1.0);
        close("month", "exit_rates", -1.0);
        close("page_values", "exit_rates", -1.0);
        close("exit_rates", "month", -1.0);
        assert!(matrix.get("constant", "month").unwrap().is_nan());
        assert!(matrix.get("constant", "constant").unwrap().is_nan());
        assert_eq!(matrix.get("weekend", "month"), None);
    }

    #[test]
    fn test_traffic_roi() {
        let result = SegmentAnalysis::traffic_roi(&sessions()).unwrap();

        let first = result.get(&GroupKey::Int(1)).unwrap();
        assert_eq!(first.total_revenue, 1.0);
        assert_eq!(first.total_visits, 2);
        assert_eq!(first.conversion_rate, 0.5);
        assert_eq!(labels(&result), vec!["1", "2", "3"]);
    }
}
