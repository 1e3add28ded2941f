use crate::analysis::{
    BROWSER_COLUMN, BusinessAnalysis, OPERATING_SYSTEMS_COLUMN, SegmentAnalysis,
};
use crate::cleaner::MONTH_COLUMN;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::profiler::DatasetProfiler;
use crate::types::{
    AggregationResult, CleaningSummary, CorrelationMatrix, Crosstab, DatasetProfile,
    RegionalPerformance, TrafficRoi, TrafficSummary,
};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Full analysis report for CLI and library output.
///
/// This struct combines:
/// - The cleaning summary
/// - The profile of the cleaned dataset
/// - Every business and segment metric that the dataset supports
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Table or file the sessions were read from
    pub input: String,
    /// Path the cleaned dataset was written to, if any
    pub output_file: Option<String>,
    pub cleaning: CleaningSummary,
    pub profile: DatasetProfile,
    pub metrics: BusinessMetrics,
}

/// Aggregates computed over the cleaned dataset.
///
/// Segment metrics are omitted when their source columns are absent.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessMetrics {
    pub weekend_sales: AggregationResult<f64>,
    pub regional_revenue: AggregationResult<f64>,
    pub traffic: AggregationResult<TrafficSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<AggregationResult<f64>>,
    pub traffic_conversion_rates: AggregationResult<f64>,
    pub bounce_rate_by_region: AggregationResult<f64>,
    pub bounce_rate_by_traffic_type: AggregationResult<f64>,
    pub regional_performance: AggregationResult<RegionalPerformance>,
    pub traffic_roi: AggregationResult<TrafficRoi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_breakdown: Option<AggregationResult<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_browser_crosstab: Option<Crosstab>,
    pub correlation_matrix: CorrelationMatrix,
}

impl BusinessMetrics {
    /// Run every query the dataset's columns allow.
    pub fn compute(dataset: &Dataset) -> Result<Self> {
        let monthly_revenue = if dataset.category_labels(MONTH_COLUMN).is_some() {
            Some(SegmentAnalysis::monthly_revenue(dataset)?)
        } else {
            None
        };

        let device_breakdown = if dataset.has_column(OPERATING_SYSTEMS_COLUMN) {
            Some(SegmentAnalysis::device_breakdown(dataset)?)
        } else {
            None
        };

        let os_browser_crosstab =
            if dataset.has_column(OPERATING_SYSTEMS_COLUMN) && dataset.has_column(BROWSER_COLUMN) {
                Some(SegmentAnalysis::os_browser_crosstab(dataset)?)
            } else {
                None
            };

        Ok(Self {
            weekend_sales: BusinessAnalysis::weekend_sales_analysis(dataset)?,
            regional_revenue: BusinessAnalysis::regional_revenue_analysis(dataset)?,
            traffic: BusinessAnalysis::traffic_analysis(dataset)?,
            monthly_revenue,
            traffic_conversion_rates: SegmentAnalysis::traffic_conversion_rates(dataset)?,
            bounce_rate_by_region: SegmentAnalysis::bounce_rate_by_region(dataset)?,
            bounce_rate_by_traffic_type: SegmentAnalysis::bounce_rate_by_traffic_type(dataset)?,
            regional_performance: SegmentAnalysis::regional_performance(dataset)?,
            traffic_roi: SegmentAnalysis::traffic_roi(dataset)?,
            device_breakdown,
            os_browser_crosstab,
            correlation_matrix: SegmentAnalysis::correlation_matrix(dataset)?,
        })
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds analysis reports and writes them to disk.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("outputs"))
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Build a report from a cleaned dataset and its cleaning summary.
    pub fn build_report(
        input: &str,
        output_file: Option<&str>,
        cleaning: &CleaningSummary,
        dataset: &Dataset,
    ) -> Result<AnalysisReport> {
        let profile = DatasetProfiler::profile(dataset)?;
        let metrics = BusinessMetrics::compute(dataset)?;
        debug!("Built report for '{}'", input);

        Ok(AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input: input.to_string(),
            output_file: output_file.map(str::to_string),
            cleaning: cleaning.clone(),
            profile,
            metrics,
        })
    }

    /// Write a report to a JSON file.
    ///
    /// The file is named `<report_base_name>_report.json` inside the output
    /// directory.
    pub fn write_report_to_file(
        &self,
        report: &AnalysisReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
