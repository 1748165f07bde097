//! Error taxonomy for the EDA pipeline.
//!
//! Pipeline functions return `anyhow::Result` and raise these variants so that
//! callers can tell fatal data-contract violations from skippable ones via
//! `err.downcast_ref::<EdaError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the loading, cleaning, derivation and analysis stages.
#[derive(Debug, Error)]
pub enum EdaError {
    /// Input path is missing or unreadable.
    #[error("Cannot access input file {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file exists but could not be parsed into a table.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Input file has a header but no data rows.
    #[error("{} has no data rows", path.display())]
    EmptyTable { path: PathBuf },

    /// File extension is not one the loader understands.
    #[error("Unsupported file format: '{extension}'. Supported formats: csv, parquet")]
    UnsupportedFormat { extension: String },

    /// A column named by a fixed list or guard is absent from the table.
    #[error("Column '{column}' not found (required by {context})")]
    ColumnMissing { column: String, context: String },

    /// A column has a dtype the operation cannot work with.
    #[error("Column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: String,
        found: String,
    },

    /// A column has no observed values to analyze.
    #[error("Column '{column}' has no observed values (required by {context})")]
    NoData { column: String, context: String },

    /// The fill strategy cannot be applied to the column's dtype.
    #[error("Cannot fill column '{column}' with {strategy}: unsupported type {dtype}")]
    InvalidFill {
        column: String,
        strategy: String,
        dtype: String,
    },

    /// Configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EdaError {
    pub fn column_missing(column: &str, context: &str) -> Self {
        EdaError::ColumnMissing {
            column: column.to_string(),
            context: context.to_string(),
        }
    }

    /// True for failures that only invalidate a single analysis.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            EdaError::ColumnMissing { .. } | EdaError::ColumnType { .. } | EdaError::NoData { .. }
        )
    }
}

/// Return the column or a `ColumnMissing` error naming the operation.
pub fn require_column<'a>(
    df: &'a polars::prelude::DataFrame,
    column: &str,
    context: &str,
) -> anyhow::Result<&'a polars::prelude::Column> {
    df.column(column)
        .map_err(|_| EdaError::column_missing(column, context).into())
}
