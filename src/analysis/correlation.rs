//! Pearson correlation matrix over a fixed set of numeric columns

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::error::{require_column, EdaError};

/// Default columns of the correlation heatmap
pub fn default_correlation_columns() -> Vec<String> {
    ["AMT_INCOME_TOTAL", "YEAR_EMPLOYED", "YEAR_BIRTH", "AMT_CREDIT"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Square correlation matrix; `None` where correlation is undefined
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Compute the Pearson correlation between every pair of `columns`.
///
/// Each pair uses the rows where both values are present.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let mut float_columns: Vec<Column> = Vec::with_capacity(columns.len());
    for name in columns {
        let column = require_column(df, name, "correlation matrix")?;
        if !column.dtype().is_primitive_numeric() {
            return Err(EdaError::ColumnType {
                column: name.clone(),
                expected: "numeric".to_string(),
                found: column.dtype().to_string(),
            }
            .into());
        }
        float_columns.push(column.cast(&DataType::Float64)?);
    }

    let n = float_columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let corr = if i == j {
                // Defined only when the column has variance
                pearson_correlation(&float_columns[i], &float_columns[i]).map(|_| 1.0)
            } else {
                pearson_correlation(&float_columns[i], &float_columns[j])
            };
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Pearson correlation using Welford's single-pass algorithm
///
/// Rows with a null or NaN on either side are skipped.
pub fn pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    if ca1.len() != ca2.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
