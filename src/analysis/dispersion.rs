//! Boxplot statistics for numeric columns

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::error::{require_column, EdaError};
use crate::utils::stats::{numeric_values, quantile, sorted};

/// Whisker reach in multiples of the interquartile range
const WHISKER_IQR: f64 = 1.5;

pub fn default_boxplot_columns() -> Vec<String> {
    ["AMT_INCOME_TOTAL", "AMT_CREDIT", "AMT_GOODS_PRICE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxSummary {
    pub column: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: usize,
}

impl BoxSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Five-number summary plus whiskers and outlier count.
pub fn dispersion_summary(df: &DataFrame, column: &str) -> Result<BoxSummary> {
    let col = require_column(df, column, "boxplot")?;
    if !col.dtype().is_primitive_numeric() {
        return Err(EdaError::ColumnType {
            column: column.to_string(),
            expected: "numeric".to_string(),
            found: col.dtype().to_string(),
        }
        .into());
    }

    let values = sorted(numeric_values(col)?);
    if values.is_empty() {
        return Err(EdaError::NoData {
            column: column.to_string(),
            context: "boxplot".to_string(),
        }
        .into());
    }

    let q1 = quantile(&values, 0.25).unwrap_or(f64::NAN);
    let median = quantile(&values, 0.5).unwrap_or(f64::NAN);
    let q3 = quantile(&values, 0.75).unwrap_or(f64::NAN);
    let reach = WHISKER_IQR * (q3 - q1);
    let low_fence = q1 - reach;
    let high_fence = q3 + reach;

    let inside: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();

    Ok(BoxSummary {
        column: column.to_string(),
        count: values.len(),
        min: values[0],
        q1,
        median,
        q3,
        max: values[values.len() - 1],
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers: values.len() - inside.len(),
    })
}
