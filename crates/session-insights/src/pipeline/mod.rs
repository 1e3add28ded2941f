//! Pipeline module.
//!
//! This module provides the cleaning pipeline and the row and column
//! transformations it runs after type normalization and imputation.

mod builder;
pub mod outliers;
pub mod skew;

pub use builder::{Pipeline, PipelineBuilder};
pub use outliers::OutlierFilter;
pub use skew::SkewCorrector;
