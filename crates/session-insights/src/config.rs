//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default absolute skewness above which a column is log-transformed.
pub const DEFAULT_SKEW_THRESHOLD: f64 = 0.5;

/// Strategy for imputing missing numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImputationStrategy {
    /// Use the median of non-missing values
    #[default]
    Median,
    /// Use the mean of non-missing values
    Mean,
}

impl fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median => write!(f, "median"),
            Self::Mean => write!(f, "mean"),
        }
    }
}

impl FromStr for ImputationStrategy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            other => Err(AnalysisError::InvalidArgument(format!(
                "Unknown imputation strategy '{}' (expected 'median' or 'mean')",
                other
            ))),
        }
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use session_insights::config::{CleaningConfig, ImputationStrategy};
///
/// let config = CleaningConfig::builder()
///     .imputation(ImputationStrategy::Mean)
///     .skew_threshold(0.75)
///     .outlier_columns(["bounce_rates", "exit_rates"])
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Strategy for filling missing numeric values.
    /// Default: Median
    pub imputation: ImputationStrategy,

    /// Absolute skewness above which a numeric column is log-transformed.
    /// Default: 0.5
    pub skew_threshold: f64,

    /// Numeric columns checked for IQR outliers, in evaluation order.
    /// Default: empty (no rows removed)
    pub outlier_columns: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            imputation: ImputationStrategy::default(),
            skew_threshold: DEFAULT_SKEW_THRESHOLD,
            outlier_columns: Vec::new(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.skew_threshold.is_finite() || self.skew_threshold < 0.0 {
            return Err(ConfigValidationError::InvalidSkewThreshold(
                self.skew_threshold,
            ));
        }

        if self.outlier_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyColumnName);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid skew threshold: {0} (must be a finite, non-negative number)")]
    InvalidSkewThreshold(f64),

    #[error("Outlier column names must not be empty")]
    EmptyColumnName,
}

impl From<ConfigValidationError> for AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        AnalysisError::InvalidArgument(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    imputation: Option<ImputationStrategy>,
    skew_threshold: Option<f64>,
    outlier_columns: Option<Vec<String>>,
}

impl CleaningConfigBuilder {
    /// Set the numeric imputation strategy.
    pub fn imputation(mut self, strategy: ImputationStrategy) -> Self {
        self.imputation = Some(strategy);
        self
    }

    /// Set the skewness threshold for log transformation.
    ///
    /// # Arguments
    /// * `threshold` - Non-negative absolute skewness (e.g., 0.5)
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Set the columns checked for outliers, evaluated in the given order.
    pub fn outlier_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outlier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            imputation: self.imputation.unwrap_or_default(),
            skew_threshold: self.skew_threshold.unwrap_or(DEFAULT_SKEW_THRESHOLD),
            outlier_columns: self.outlier_columns.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
