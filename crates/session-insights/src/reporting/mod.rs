//! Report generation module.
//!
//! This module turns a cleaned dataset into an [`AnalysisReport`] holding
//! the cleaning summary, the dataset profile and every business metric.
//!
//! Reports are used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use session_insights::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("sessions", None, &summary, &dataset)?;
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&report, "sessions")?;
//! ```

mod generator;

pub use generator::{AnalysisReport, BusinessMetrics, ReportGenerator};
