//! Group-by helpers shared by the aggregation queries.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::types::{GroupEntry, GroupKey};
use crate::utils::{DtypeCategory, float_values, get_dtype_category, is_integer_dtype};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Read a column as group keys; missing cells yield `None`.
pub(crate) fn group_keys(series: &Series) -> Result<Vec<Option<GroupKey>>> {
    let keys = match get_dtype_category(series.dtype()) {
        DtypeCategory::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map(GroupKey::Bool))
            .collect(),
        DtypeCategory::Numeric if is_integer_dtype(series.dtype()) => {
            let casted = series.cast(&DataType::Int64)?;
            casted
                .i64()?
                .into_iter()
                .map(|v| v.map(GroupKey::Int))
                .collect()
        }
        DtypeCategory::Numeric => float_values(series)?
            .into_iter()
            .map(|v| v.map(GroupKey::Float))
            .collect(),
        DtypeCategory::String | DtypeCategory::Other => {
            let casted = series.cast(&DataType::String)?;
            casted
                .str()?
                .into_iter()
                .map(|v| v.map(GroupKey::from))
                .collect()
        }
    };
    Ok(keys)
}

/// Read a numeric or boolean column as values to aggregate.
pub(crate) fn value_column(dataset: &Dataset, name: &str) -> Result<Vec<Option<f64>>> {
    let series = dataset.series(name)?;
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric | DtypeCategory::Boolean => Ok(float_values(series)?),
        _ => Err(AnalysisError::InvalidArgument(format!(
            "Column '{}' cannot be aggregated (dtype {:?})",
            name,
            series.dtype()
        ))),
    }
}

/// Partition row indices by the key column, keys ascending.
///
/// Rows with a missing key are dropped. Only observed keys appear.
pub(crate) fn group_rows(
    dataset: &Dataset,
    key_column: &str,
) -> Result<BTreeMap<GroupKey, Vec<usize>>> {
    let keys = group_keys(dataset.series(key_column)?)?;
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(row);
        }
    }
    Ok(groups)
}

/// Observed values of the given rows.
pub(crate) fn observed_at(values: &[Option<f64>], rows: &[usize]) -> Vec<f64> {
    rows.iter().filter_map(|&row| values[row]).collect()
}

/// Sum of the observed values; zero when none are observed.
pub(crate) fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Apply `agg` to the observed values of each group.
pub(crate) fn aggregate<F>(
    groups: &BTreeMap<GroupKey, Vec<usize>>,
    values: &[Option<f64>],
    agg: F,
) -> Vec<GroupEntry<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    groups
        .iter()
        .map(|(key, rows)| GroupEntry {
            key: key.clone(),
            value: agg(&observed_at(values, rows)),
        })
        .collect()
}

/// Compare two metrics, NaN after every number.
pub(crate) fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort, largest metric first, NaN last. Ties keep their order.
pub(crate) fn sort_descending_by<V, F>(entries: &mut [GroupEntry<V>], metric: F)
where
    F: Fn(&V) -> f64,
{
    entries.sort_by(|a, b| {
        let (x, y) = (metric(&a.value), metric(&b.value));
        match (x.is_nan(), y.is_nan()) {
            (false, false) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            _ => cmp_nan_last(x, y),
        }
    });
}

/// Stable sort, smallest metric first, NaN last. Ties keep their order.
pub(crate) fn sort_ascending_by<V, F>(entries: &mut [GroupEntry<V>], metric: F)
where
    F: Fn(&V) -> f64,
{
    entries.sort_by(|a, b| cmp_nan_last(metric(&a.value), metric(&b.value)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: f64) -> GroupEntry<f64> {
        GroupEntry {
            key: GroupKey::from(key),
            value,
        }
    }

    #[test]
    fn test_group_keys_by_dtype() {
        let ints = Series::new("t".into(), &[Some(2i32), None, Some(1)]);
        assert_eq!(
            group_keys(&ints).unwrap(),
            vec![Some(GroupKey::Int(2)), None, Some(GroupKey::Int(1))]
        );

        let bools = Series::new("w".into(), &[true, false]);
        assert_eq!(
            group_keys(&bools).unwrap(),
            vec![Some(GroupKey::Bool(true)), Some(GroupKey::Bool(false))]
        );

        let floats = Series::new("f".into(), &[1.5, f64::NAN]);
        assert_eq!(group_keys(&floats).unwrap(), vec![Some(GroupKey::Float(1.5)), None]);
    }

    #[test]
    fn test_group_rows_drops_missing_keys() {
        let ds = Dataset::new(
            df![
                "region" => [Some("B"), None, Some("A"), Some("B")],
            ]
            .unwrap(),
        );

        let groups = group_rows(&ds, "region").unwrap();
        let collected: Vec<(GroupKey, Vec<usize>)> = groups.into_iter().collect();
        assert_eq!(
            collected,
            vec![
                (GroupKey::from("A"), vec![2]),
                (GroupKey::from("B"), vec![0, 3]),
            ]
        );
    }

    #[test]
    fn test_value_column_rejects_strings() {
        let ds = Dataset::new(df!["region" => ["A"]].unwrap());
        let err = value_column(&ds, "region").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_sort_descending_nan_last_and_stable() {
        let mut entries = vec![
            entry("a", 1.0),
            entry("b", f64::NAN),
            entry("c", 3.0),
            entry("d", 1.0),
        ];
        sort_descending_by(&mut entries, |v| *v);

        let keys: Vec<String> = entries.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_sort_ascending_nan_last() {
        let mut entries = vec![entry("a", f64::NAN), entry("b", 0.5), entry("c", 0.1)];
        sort_ascending_by(&mut entries, |v| *v);

        let keys: Vec<String> = entries.iter().map(|e| e.key.to_string()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
    }
}
