//! Missing value analysis and sparse column removal

use anyhow::Result;
use polars::prelude::*;

use super::error::EdaError;

/// Analyze missing values in the dataset.
///
/// Returns `(column, null_ratio)` pairs sorted by ratio descending. Ties keep
/// the table's column order.
pub fn analyze_missing_values(df: &DataFrame) -> Vec<(String, f64)> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count() as f64 / rows))
        .collect();

    // Sort by missing ratio descending
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    missing_ratios
}

/// Minimum non-null count a column needs to survive when at most
/// `null_threshold_pct` percent of its values may be missing.
///
/// Computed as `floor((100 - P) / 100 * rows)`.
pub fn non_null_threshold(rows: usize, null_threshold_pct: f64) -> usize {
    (((100.0 - null_threshold_pct) / 100.0) * rows as f64).floor() as usize
}

/// Get columns whose non-null count falls below the threshold
pub fn get_sparse_columns(df: &DataFrame, null_threshold_pct: f64) -> Vec<String> {
    let threshold = non_null_threshold(df.height(), null_threshold_pct);
    df.get_columns()
        .iter()
        .filter(|col| col.len() - col.null_count() < threshold)
        .map(|col| col.name().to_string())
        .collect()
}

/// Drop every column with fewer than the threshold's non-null values.
///
/// Returns the reduced table and the names of the dropped columns, in table
/// order.
pub fn drop_sparse_columns(
    df: DataFrame,
    null_threshold_pct: f64,
) -> Result<(DataFrame, Vec<String>)> {
    if !(0.0..=100.0).contains(&null_threshold_pct) {
        return Err(EdaError::Config(format!(
            "null threshold must be between 0 and 100, got {}",
            null_threshold_pct
        ))
        .into());
    }

    let dropped = get_sparse_columns(&df, null_threshold_pct);
    if dropped.is_empty() {
        return Ok((df, dropped));
    }

    let df = df.drop_many(&dropped);
    Ok((df, dropped))
}
