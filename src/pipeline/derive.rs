//! Derived columns: whole years from day counts and categorical bins

use anyhow::Result;
use polars::prelude::*;

use super::binning::{apply_bins, BinSpec};
use super::error::require_column;

pub const YEAR_BIRTH: &str = "YEAR_BIRTH";
pub const YEAR_EMPLOYED: &str = "YEAR_EMPLOYED";
pub const AMT_CREDIT_CATEGORY: &str = "AMT_CREDIT_CATEGORY";
pub const AGE_CATEGORY: &str = "AGE_CATEGORY";

const DAYS_PER_YEAR: f64 = 365.0;

/// Options for one table's derivation pass
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// Compute `YEAR_BIRTH` / `YEAR_EMPLOYED` (application table only)
    pub derive_years: bool,
    pub credit_bins: BinSpec,
    pub age_bins: BinSpec,
}

/// Names of every column this module can add
pub fn derived_category_columns() -> [&'static str; 2] {
    [AMT_CREDIT_CATEGORY, AGE_CATEGORY]
}

/// `floor(days / 365)` as Int64; nulls stay null.
pub fn days_to_years(df: &DataFrame, source: &str, target: &str) -> Result<Column> {
    let column = require_column(df, source, "year derivation")?;
    let years: Vec<Option<i64>> = column
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| {
            v.filter(|d| d.is_finite())
                .map(|d| (d / DAYS_PER_YEAR).floor() as i64)
        })
        .collect();
    Ok(Column::new(target.into(), years))
}

/// Add `YEAR_BIRTH` and `YEAR_EMPLOYED`.
pub fn derive_years(mut df: DataFrame) -> Result<DataFrame> {
    let birth = days_to_years(&df, "DAYS_BIRTH", YEAR_BIRTH)?;
    let employed = days_to_years(&df, "DAYS_EMPLOYED", YEAR_EMPLOYED)?;
    df.with_column(birth)?;
    df.with_column(employed)?;
    Ok(df)
}

/// Run the derivation pass; returns the table and the added column names.
///
/// Credit binning requires `AMT_CREDIT`. Age binning only runs when
/// `YEAR_BIRTH` exists.
pub fn derive_features(df: DataFrame, options: &DeriveOptions) -> Result<(DataFrame, Vec<String>)> {
    let mut added = Vec::new();

    let df = if options.derive_years {
        added.push(YEAR_BIRTH.to_string());
        added.push(YEAR_EMPLOYED.to_string());
        derive_years(df)?
    } else {
        df
    };

    let mut df = apply_bins(df, "AMT_CREDIT", AMT_CREDIT_CATEGORY, &options.credit_bins)?;
    added.push(AMT_CREDIT_CATEGORY.to_string());

    if df.column(YEAR_BIRTH).is_ok() {
        df = apply_bins(df, YEAR_BIRTH, AGE_CATEGORY, &options.age_bins)?;
        added.push(AGE_CATEGORY.to_string());
    }

    Ok((df, added))
}
