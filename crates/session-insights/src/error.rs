//! Custom error types for session analysis.
//!
//! This module provides the error hierarchy shared by the cleaning stages,
//! the aggregation queries and the data-source layer, using `thiserror`.
//!
//! Errors are serializable so they can be handed to an external renderer
//! or written into a JSON report alongside the results.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for session analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A categorical value fell outside its declared label set.
    #[error("Invalid category '{value}' in column '{column}'")]
    InvalidCategory { column: String, value: String },

    /// Unrecognized strategy name or malformed configuration.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The data source could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The requested table or file does not exist in the data source.
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that branch on error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCategory { .. } => "INVALID_CATEGORY",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the data-source collaborator.
    pub fn is_source_error(&self) -> bool {
        match self {
            Self::Connection(_) | Self::NotFound(_) => true,
            Self::WithContext { source, .. } => source.is_source_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
