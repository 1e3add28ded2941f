//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the session cleaning workflow.

use crate::cleaner::TypeNormalizer;
use crate::config::CleaningConfig;
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::imputers::NullImputer;
use crate::pipeline::{OutlierFilter, SkewCorrector};
use crate::types::CleaningSummary;
use std::time::Instant;
use tracing::{debug, error, info};

/// The session cleaning pipeline.
///
/// Runs type normalization, imputation, outlier removal and skew correction
/// in that order. Use [`Pipeline::builder()`] to create a pipeline with a
/// custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use session_insights::{CleaningConfig, Pipeline};
///
/// let config = CleaningConfig::builder()
///     .outlier_columns(["bounce_rates"])
///     .build()?;
///
/// let summary = Pipeline::builder()
///     .config(config)
///     .build()?
///     .process(&mut dataset)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: CleaningConfig,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a dataset in place.
    ///
    /// All stages run on a working copy; the dataset is only replaced once
    /// every stage has succeeded, so on error it is left untouched.
    pub fn process(&self, dataset: &mut Dataset) -> Result<CleaningSummary> {
        match self.process_internal(dataset) {
            Ok((cleaned, summary)) => {
                *dataset = cleaned;
                Ok(summary)
            }
            Err(e) => {
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn process_internal(&self, dataset: &Dataset) -> Result<(Dataset, CleaningSummary)> {
        let start_time = Instant::now();
        info!("Starting cleaning pipeline...");

        let mut summary = CleaningSummary {
            rows_before: dataset.height(),
            ..Default::default()
        };
        let mut working = dataset.clone();
        let mut processing_steps: Vec<String> = Vec::new();

        info!("Step 1: Normalizing column types...");
        TypeNormalizer::convert_columns(&mut working, &mut processing_steps)
            .context("Type normalization")?;

        info!(
            "Step 2: Imputing missing values ({})...",
            self.config.imputation
        );
        summary.imputed_columns =
            NullImputer::impute_missing(&mut working, self.config.imputation, &mut processing_steps)
                .context("Imputation")?;

        info!(
            "Step 3: Removing outliers from {} columns...",
            self.config.outlier_columns.len()
        );
        OutlierFilter::remove_outliers(
            &mut working,
            &self.config.outlier_columns,
            &mut processing_steps,
        )
        .context("Outlier removal")?;

        info!(
            "Step 4: Correcting skewness (threshold {})...",
            self.config.skew_threshold
        );
        summary.skew_corrected_columns =
            SkewCorrector::fix_skew(&mut working, self.config.skew_threshold, &mut processing_steps)
                .context("Skew correction")?;

        summary.rows_after = working.height();
        summary.rows_removed = summary.rows_before.saturating_sub(summary.rows_after);
        summary.columns = working.width();
        summary.processing_steps = processing_steps;
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        debug!("Processing steps: {:?}", summary.processing_steps);
        info!(
            "Pipeline completed in {}ms: {} -> {} rows",
            summary.duration_ms, summary.rows_before, summary.rows_after
        );

        Ok((working, summary))
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, validating its configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(Pipeline { config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImputationStrategy;
    use crate::types::ColumnKind;
    use polars::prelude::*;

    fn raw_sessions() -> Dataset {
        Dataset::new(
            df![
                "month" => ["Feb", "Mar", "Mar", "May", "Nov", "Dec", "Dec"],
                "weekend" => [0i64, 1, 0, 0, 1, 0, 1],
                "revenue" => [0i64, 1, 0, 1, 0, 0, 1],
                "bounce_rates" => [
                    Some(0.02),
                    Some(0.01),
                    None,
                    Some(0.03),
                    Some(0.02),
                    Some(0.01),
                    Some(0.9),
                ],
                "region" => ["North", "South", "North", "East", "West", "East", "North"],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_full_pipeline() {
        let mut ds = raw_sessions();
        let config = CleaningConfig::builder()
            .imputation(ImputationStrategy::Median)
            .outlier_columns(["bounce_rates"])
            .skew_threshold(100.0)
            .build()
            .unwrap();

        let summary = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .process(&mut ds)
            .unwrap();

        assert_eq!(summary.rows_before, 7);
        assert_eq!(summary.rows_after, 6);
        assert_eq!(summary.rows_removed, 1);
        assert_eq!(summary.columns, 5);
        assert_eq!(summary.imputed_columns, vec!["bounce_rates"]);
        assert!(summary.skew_corrected_columns.is_empty());
        assert!(!summary.processing_steps.is_empty());

        assert_eq!(ds.kind("month").unwrap(), ColumnKind::OrderedCategorical);
        assert_eq!(ds.kind("revenue").unwrap(), ColumnKind::Boolean);
        assert_eq!(ds.series("bounce_rates").unwrap().null_count(), 0);
    }

    #[test]
    fn test_default_pipeline_corrects_skew() {
        let mut ds = raw_sessions();

        let summary = Pipeline::default().process(&mut ds).unwrap();

        assert_eq!(summary.rows_removed, 0);
        assert_eq!(summary.skew_corrected_columns, vec!["bounce_rates"]);
    }

    #[test]
    fn test_failure_leaves_dataset_untouched() {
        let mut ds = raw_sessions();
        let config = CleaningConfig::builder()
            .outlier_columns(["region"])
            .build()
            .unwrap();

        let err = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .process(&mut ds)
            .unwrap_err();

        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert_eq!(ds.kind("month").unwrap(), ColumnKind::NominalString);
        assert_eq!(ds.series("bounce_rates").unwrap().null_count(), 1);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = CleaningConfig {
            skew_threshold: -1.0,
            ..Default::default()
        };

        let err = Pipeline::builder().config(config).build().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }
}
