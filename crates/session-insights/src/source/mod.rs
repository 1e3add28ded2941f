//! Data sources for session tables.
//!
//! A [`DataSource`] hands out one table at a time as a [`Dataset`]. The
//! bundled [`CsvSource`] serves tables from a directory of CSV files;
//! [`persist`] and [`load`] round-trip a dataset through a single file.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result, ResultExt};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of raw session tables.
pub trait DataSource {
    /// Short name of the backend, for logging.
    fn name(&self) -> &str;

    /// Read a whole table.
    ///
    /// Fails with `Connection` when the source itself is unreachable and
    /// with `NotFound` when the table does not exist.
    fn extract(&self, table: &str) -> Result<Dataset>;
}

/// Tables stored as `<root>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSource {
    root: PathBuf,
}

impl CsvSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `table`.
    pub fn table_path(&self, table: &str) -> Result<PathBuf> {
        if table.is_empty() || table.contains(['/', '\\']) || table == ".." {
            return Err(AnalysisError::InvalidArgument(format!(
                "Invalid table name '{}'",
                table
            )));
        }
        Ok(self.root.join(format!("{}.csv", table)))
    }
}

impl DataSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn extract(&self, table: &str) -> Result<Dataset> {
        if !self.root.is_dir() {
            return Err(AnalysisError::Connection(format!(
                "Data directory '{}' is not accessible",
                self.root.display()
            )));
        }

        let path = self.table_path(table)?;
        if !path.is_file() {
            return Err(AnalysisError::NotFound(format!(
                "Table '{}' ({})",
                table,
                path.display()
            )));
        }

        let dataset = read_csv(&path).context(format!("Extracting table '{}'", table))?;
        info!(
            "Extracted table '{}' from {}: {} rows, {} columns",
            table,
            self.name(),
            dataset.height(),
            dataset.width()
        );
        Ok(dataset)
    }
}

/// Write a dataset to CSV with a header row.
///
/// Booleans are written as `true`/`false` and month labels as text, so
/// [`load`] followed by type normalization restores the same types.
pub fn persist(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut frame = dataset.frame().clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut frame)
        .context(format!("Writing {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

/// Read a dataset previously written by [`persist`].
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(AnalysisError::NotFound(format!(
            "File '{}'",
            path.display()
        )));
    }
    read_csv(path)
}

fn read_csv(path: &Path) -> Result<Dataset> {
    let mut frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    // A column of empty cells is inferred as text; read it as numeric.
    let empty_columns: Vec<String> = frame
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String && !c.is_empty() && c.null_count() == c.len())
        .map(|c| c.name().to_string())
        .collect();
    for name in &empty_columns {
        let casted = frame.column(name)?.cast(&DataType::Float64)?;
        frame
            .replace(name, casted.take_materialized_series())
            .context(format!("Casting empty column '{}'", name))?;
    }

    debug!("Loaded {} rows from {}", frame.height(), path.display());
    Ok(Dataset::new(frame))
}
