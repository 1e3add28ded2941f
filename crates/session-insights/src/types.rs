use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Semantic type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    OrderedCategorical,
    Boolean,
    NominalString,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::OrderedCategorical => write!(f, "ordered_categorical"),
            Self::Boolean => write!(f, "boolean"),
            Self::NominalString => write!(f, "nominal_string"),
        }
    }
}

// ============================================================================
// Aggregation results
// ============================================================================

/// Key of one group in an aggregation.
///
/// Keys order by variant first, then by value; floats use a total order so
/// that NaN keys still sort deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for GroupKey {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for GroupKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// One group of an [`AggregationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry<V> {
    pub key: GroupKey,
    pub value: V,
}

/// Ordered mapping from group key to summary value(s).
///
/// Iteration order is the order defined by the query that produced it
/// (e.g. descending by summed revenue).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult<V> {
    /// Column the rows were grouped by.
    pub group_column: String,
    pub entries: Vec<GroupEntry<V>>,
}

impl<V> AggregationResult<V> {
    pub fn new(group_column: impl Into<String>, entries: Vec<GroupEntry<V>>) -> Self {
        Self {
            group_column: group_column.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupEntry<V>> {
        self.entries.iter()
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> Vec<&GroupKey> {
        self.entries.iter().map(|e| &e.key).collect()
    }

    /// Look up the value of one group.
    pub fn get(&self, key: &GroupKey) -> Option<&V> {
        self.entries.iter().find(|e| &e.key == key).map(|e| &e.value)
    }
}

impl<V: Clone> AggregationResult<V> {
    /// Flatten into `(key, value)` pairs in iteration order.
    pub fn pairs(&self) -> Vec<(GroupKey, V)> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }
}

/// Revenue and bounce-rate summary of one traffic type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub revenue: f64,
    pub bounce_rates: f64,
}

/// Performance of one region, including the revenue z-score across regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalPerformance {
    pub total_revenue: f64,
    pub avg_bounce_rate: f64,
    pub conversion_rate: f64,
    pub revenue_zscore: f64,
}

/// Visit and conversion figures of one traffic type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficRoi {
    pub total_revenue: f64,
    pub total_visits: usize,
    pub conversion_rate: f64,
}

/// Count table of two nominal columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crosstab {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[row][col]`
    pub counts: Vec<Vec<usize>>,
}

impl Crosstab {
    /// Count for one `(row, col)` label pair, zero when either label is absent.
    pub fn count(&self, row: &str, col: &str) -> usize {
        let Some(r) = self.row_labels.iter().position(|l| l == row) else {
            return 0;
        };
        let Some(c) = self.col_labels.iter().position(|l| l == col) else {
            return 0;
        };
        self.counts[r][c]
    }
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation of two columns, `None` when either is not in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

// ============================================================================
// Profiling
// ============================================================================

/// Name and semantic type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: String,
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCount {
    pub name: String,
    pub nulls: usize,
}

/// Descriptive profile of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub columns: Vec<ColumnDescription>,
    pub statistics: Vec<NumericSummary>,
    pub null_counts: Vec<NullCount>,
}

// ============================================================================
// Pipeline summary
// ============================================================================

/// Summary of one cleaning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub columns: usize,
    /// Numeric columns that had missing values filled.
    pub imputed_columns: Vec<String>,
    /// Numeric columns that were log-transformed.
    pub skew_corrected_columns: Vec<String>,
    /// Human-readable log of every step taken.
    pub processing_steps: Vec<String>,
    pub duration_ms: u64,
}
