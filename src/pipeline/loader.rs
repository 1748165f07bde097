//! Dataset loader for CSV and Parquet files

use std::path::Path;

use anyhow::Result;
use polars::prelude::*;

use super::error::EdaError;
use crate::utils::{create_spinner, finish_with_success};

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` is the number of rows polars inspects to infer CSV
/// column types; 0 means a full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    std::fs::metadata(path).map_err(|source| EdaError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |e: PolarsError| EdaError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let lf = match file_extension(path).as_str() {
        "csv" => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .map_err(parse_error)?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(parse_error)?,
        other => {
            return Err(EdaError::UnsupportedFormat {
                extension: other.to_string(),
            }
            .into())
        }
    };

    Ok(lf)
}

/// Load and collect a dataset behind a spinner.
///
/// A table without data rows is an `EmptyTable` error: CSV inference types
/// every column of a header-only file as text.
///
/// Returns the DataFrame together with its row count, column count and
/// estimated memory footprint in MB.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let lf = load_dataset(path, infer_schema_length)?;

    let spinner = create_spinner(&format!("Reading {}...", path.display()));
    let df = lf.collect().map_err(|e| {
        spinner.finish_and_clear();
        EdaError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let (rows, cols) = df.shape();
    if rows == 0 {
        spinner.finish_and_clear();
        return Err(EdaError::EmptyTable {
            path: path.to_path_buf(),
        }
        .into());
    }
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {}", path.display()));

    Ok((df, rows, cols, memory_mb))
}
