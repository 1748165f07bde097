//! Per-table cleaning pass: sparse column removal, imputation, sign
//! normalization and feature derivation

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::derive::{derive_features, DeriveOptions};
use super::impute::{impute_missing, FillRule, ImputationRecord};
use super::missing::{analyze_missing_values, drop_sparse_columns, non_null_threshold};
use super::signs::{normalize_signs, SignPolicy};

/// Settings for cleaning one table
#[derive(Debug, Clone)]
pub struct TableCleaning {
    pub table: String,
    pub null_threshold_pct: f64,
    pub fill_rules: Vec<FillRule>,
    pub sign_policy: SignPolicy,
    pub derive: DeriveOptions,
}

/// Record of everything the cleaning pass did to a table
#[derive(Debug, Clone, Serialize)]
pub struct CleaningLog {
    pub table: String,
    pub rows: usize,
    pub initial_columns: usize,
    /// Null ratio per column before cleaning, highest first
    pub missing_before: Vec<(String, f64)>,
    pub null_threshold_pct: f64,
    /// Minimum non-null count a column needed to be kept
    pub min_non_null: usize,
    pub dropped_columns: Vec<String>,
    pub imputations: Vec<ImputationRecord>,
    /// Null ratio per column after imputation, highest first
    pub missing_after: Vec<(String, f64)>,
    pub normalized_columns: Vec<String>,
    pub derived_columns: Vec<String>,
    pub final_columns: usize,
    /// Columns still holding nulls after imputation, with their counts
    pub remaining_nulls: Vec<(String, usize)>,
}

/// Run the cleaning pass; the input table is consumed.
pub fn clean_table(df: DataFrame, settings: &TableCleaning) -> Result<(DataFrame, CleaningLog)> {
    let (rows, initial_columns) = df.shape();
    let missing_before = analyze_missing_values(&df);
    let min_non_null = non_null_threshold(rows, settings.null_threshold_pct);

    let (df, dropped_columns) = drop_sparse_columns(df, settings.null_threshold_pct)?;
    let (df, imputations) = impute_missing(df, &settings.fill_rules)?;
    let missing_after = analyze_missing_values(&df);
    let remaining_nulls = null_counts(&df);
    let (df, normalized_columns) = normalize_signs(df, &settings.sign_policy)?;
    let (df, derived_columns) = derive_features(df, &settings.derive)?;

    let log = CleaningLog {
        table: settings.table.clone(),
        rows,
        initial_columns,
        missing_before,
        null_threshold_pct: settings.null_threshold_pct,
        min_non_null,
        dropped_columns,
        imputations,
        missing_after,
        normalized_columns,
        derived_columns,
        final_columns: df.width(),
        remaining_nulls,
    };

    Ok((df, log))
}

/// Columns that contain at least one null, in table order
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .filter(|col| col.null_count() > 0)
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect()
}
