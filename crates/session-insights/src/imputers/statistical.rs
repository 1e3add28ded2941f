//! Statistical imputation of missing numeric values.

use crate::config::ImputationStrategy;
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::profiler::statistics::{mean, median};
use crate::utils::{fill_numeric_nulls, missing_count, observed_values};
use tracing::{debug, warn};

/// Fills missing numeric values with a central-tendency statistic.
pub struct NullImputer;

impl NullImputer {
    /// Impute every numeric column that has missing values.
    ///
    /// The statistic is computed over the column's non-missing values.
    /// Columns without missing values are left untouched; columns with no
    /// observed value at all are left missing. Returns the names of the
    /// columns that were filled.
    pub fn impute_missing(
        dataset: &mut Dataset,
        strategy: ImputationStrategy,
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        let mut frame = dataset.frame().clone();
        let mut imputed = Vec::new();
        let mut steps = Vec::new();

        for col_name in dataset.numeric_columns() {
            let series = dataset.series(&col_name)?;
            let missing = missing_count(series)?;
            if missing == 0 {
                continue;
            }

            let observed = observed_values(series)?;
            if observed.is_empty() {
                warn!(
                    "Column '{}' has no observed values; leaving {} missing entries",
                    col_name, missing
                );
                continue;
            }

            let fill_value = match strategy {
                ImputationStrategy::Median => median(&observed),
                ImputationStrategy::Mean => mean(&observed),
            };

            let filled = fill_numeric_nulls(series, fill_value)?;
            frame
                .replace(&col_name, filled)
                .context(format!("Imputing column '{}'", col_name))?;

            debug!(
                "Filled {} missing values in '{}' with {} {:.4}",
                missing, col_name, strategy, fill_value
            );
            steps.push(format!(
                "Filled {} missing values in '{}' with {}: {:.2}",
                missing, col_name, strategy, fill_value
            ));
            imputed.push(col_name);
        }

        dataset.commit(frame);
        processing_steps.extend(steps);
        Ok(imputed)
    }
}
