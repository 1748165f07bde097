//! Sign normalization for day-count columns
//!
//! The source data stores tenure as non-positive day offsets from the
//! application date. Normalizing takes the absolute value, which is
//! idempotent.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{require_column, EdaError};

/// Which columns get converted to absolute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Only the listed columns; each must exist and be numeric
    Listed(Vec<String>),
    /// Every numeric column in the table
    AllNumeric,
}

/// Day-count columns of the application table
pub fn default_days_columns() -> Vec<String> {
    [
        "DAYS_BIRTH",
        "DAYS_EMPLOYED",
        "DAYS_REGISTRATION",
        "DAYS_ID_PUBLISH",
        "DAYS_LAST_PHONE_CHANGE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Replace the selected columns with their absolute values.
///
/// Returns the table and the names of the normalized columns.
pub fn normalize_signs(mut df: DataFrame, policy: &SignPolicy) -> Result<(DataFrame, Vec<String>)> {
    let targets: Vec<String> = match policy {
        SignPolicy::Listed(columns) => {
            for name in columns {
                let column = require_column(&df, name, "sign normalization")?;
                if !column.dtype().is_primitive_numeric() {
                    return Err(EdaError::ColumnType {
                        column: name.clone(),
                        expected: "numeric".to_string(),
                        found: column.dtype().to_string(),
                    }
                    .into());
                }
            }
            columns.clone()
        }
        SignPolicy::AllNumeric => df
            .get_columns()
            .iter()
            .filter(|col| col.dtype().is_primitive_numeric())
            .map(|col| col.name().to_string())
            .collect(),
    };

    for name in &targets {
        let absolute = abs_column(df.column(name)?)?;
        df.with_column(absolute)?;
    }

    Ok((df, targets))
}

/// Absolute value of a numeric column. Integers stay Int64, floats become Float64.
pub fn abs_column(column: &Column) -> Result<Column> {
    let name = column.name().clone();
    if column.dtype().is_float() {
        let values: Vec<Option<f64>> = column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(f64::abs))
            .collect();
        Ok(Column::new(name, values))
    } else {
        let values: Vec<Option<i64>> = column
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(i64::wrapping_abs))
            .collect();
        Ok(Column::new(name, values))
    }
}
