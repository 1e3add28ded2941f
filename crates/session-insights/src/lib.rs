//! E-commerce Session Analysis Library
//!
//! Cleaning and exploratory analysis of e-commerce session data, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Type Normalization**: `month` as an ordered calendar categorical,
//!   `weekend` and `revenue` as booleans
//! - **Imputation**: median or mean filling of missing numeric values
//! - **Outlier Removal**: sequential IQR filtering over chosen columns
//! - **Skew Correction**: `log(1 + x)` for heavily skewed numeric columns
//! - **Business Metrics**: weekend, regional and traffic-source aggregates
//! - **Profiling and Reports**: descriptive statistics and JSON reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use session_insights::{BusinessAnalysis, CleaningConfig, CsvSource, DataSource, Pipeline};
//!
//! // Load data
//! let mut dataset = CsvSource::new("data").extract("sessions")?;
//!
//! // Clean it
//! let config = CleaningConfig::builder()
//!     .outlier_columns(["bounce_rates", "exit_rates"])
//!     .build()?;
//!
//! let summary = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .process(&mut dataset)?;
//!
//! // Query it
//! for entry in BusinessAnalysis::regional_revenue_analysis(&dataset)?.iter() {
//!     println!("{}: {:.2}", entry.key, entry.value);
//! }
//! ```
//!
//! # Stages
//!
//! Each stage can also be run on its own. Stages are atomic: on error the
//! dataset is left exactly as it was.
//!
//! ```rust,ignore
//! use session_insights::{ImputationStrategy, NullImputer, TypeNormalizer};
//!
//! let mut steps = Vec::new();
//! TypeNormalizer::convert_columns(&mut dataset, &mut steps)?;
//! NullImputer::impute_missing(&mut dataset, ImputationStrategy::Mean, &mut steps)?;
//! ```

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod source;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{BusinessAnalysis, SegmentAnalysis};
pub use cleaner::{MONTH_LABELS, TypeNormalizer};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, DEFAULT_SKEW_THRESHOLD,
    ImputationStrategy,
};
pub use dataset::Dataset;
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use imputers::NullImputer;
pub use pipeline::{OutlierFilter, Pipeline, PipelineBuilder, SkewCorrector};
pub use profiler::DatasetProfiler;
pub use reporting::{AnalysisReport, BusinessMetrics, ReportGenerator};
pub use source::{CsvSource, DataSource};
pub use types::{
    AggregationResult, CleaningSummary, ColumnDescription, ColumnKind, CorrelationMatrix,
    Crosstab, DatasetProfile, GroupEntry, GroupKey, NullCount, NumericSummary,
    RegionalPerformance, TrafficRoi, TrafficSummary,
};
