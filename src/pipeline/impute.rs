//! Missing value imputation driven by an explicit per-column policy table
//!
//! The policy is an analyst decision, so it is never inferred from dtypes:
//! every imputed column is listed with its strategy.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::EdaError;
use crate::utils::stats::{median, numeric_mode, numeric_values, text_mode};

/// How a column's nulls are replaced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Fill with a literal placeholder
    Constant(String),
    /// Fill with the column median (numeric columns only)
    Median,
    /// Fill with the most frequent value; ties pick the smallest
    Mode,
}

impl std::fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillStrategy::Constant(value) => write!(f, "constant '{}'", value),
            FillStrategy::Median => write!(f, "median"),
            FillStrategy::Mode => write!(f, "mode"),
        }
    }
}

/// One row of the fill policy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRule {
    pub column: String,
    pub strategy: FillStrategy,
}

impl FillRule {
    pub fn new(column: &str, strategy: FillStrategy) -> Self {
        Self {
            column: column.to_string(),
            strategy,
        }
    }
}

/// What happened to a single column during imputation
#[derive(Debug, Clone, Serialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: String,
    /// Fill value rendered as text
    pub fill_value: String,
    /// Number of nulls replaced
    pub filled: usize,
}

/// The analyst's fill policy for the application table
pub fn default_application_fill_policy() -> Vec<FillRule> {
    let mut rules = vec![
        FillRule::new(
            "OCCUPATION_TYPE",
            FillStrategy::Constant("Others".to_string()),
        ),
        FillRule::new("EXT_SOURCE_3", FillStrategy::Median),
    ];

    for col in [
        "AMT_REQ_CREDIT_BUREAU_HOUR",
        "AMT_REQ_CREDIT_BUREAU_DAY",
        "AMT_REQ_CREDIT_BUREAU_WEEK",
        "AMT_REQ_CREDIT_BUREAU_MON",
        "AMT_REQ_CREDIT_BUREAU_QRT",
        "AMT_REQ_CREDIT_BUREAU_YEAR",
    ] {
        rules.push(FillRule::new(col, FillStrategy::Mode));
    }

    rules.push(FillRule::new("NAME_TYPE_SUITE", FillStrategy::Mode));
    rules.push(FillRule::new("CNT_FAM_MEMBERS", FillStrategy::Mode));

    for col in [
        "EXT_SOURCE_2",
        "AMT_GOODS_PRICE",
        "AMT_ANNUITY",
        "OBS_30_CNT_SOCIAL_CIRCLE",
        "DEF_30_CNT_SOCIAL_CIRCLE",
        "OBS_60_CNT_SOCIAL_CIRCLE",
        "DEF_60_CNT_SOCIAL_CIRCLE",
        "DAYS_LAST_PHONE_CHANGE",
    ] {
        rules.push(FillRule::new(col, FillStrategy::Median));
    }

    rules
}

/// Apply the fill policy to every listed column that is present and has nulls.
///
/// Listed columns missing from the table are skipped so the same policy can
/// run against tables with different schemas.
pub fn impute_missing(
    mut df: DataFrame,
    rules: &[FillRule],
) -> Result<(DataFrame, Vec<ImputationRecord>)> {
    let mut records = Vec::new();

    for rule in rules {
        let Ok(column) = df.column(&rule.column) else {
            continue;
        };
        let nulls = column.null_count();
        if nulls == 0 {
            continue;
        }

        let Some((filled, fill_value)) = fill_column(column, &rule.strategy)? else {
            // All-null column: nothing to derive a statistic from
            continue;
        };

        df.with_column(filled)?;
        records.push(ImputationRecord {
            column: rule.column.clone(),
            strategy: rule.strategy.to_string(),
            fill_value,
            filled: nulls,
        });
    }

    Ok((df, records))
}

/// Build the filled replacement for one column.
///
/// Returns `None` when the strategy needs at least one observed value and
/// the column has none.
fn fill_column(column: &Column, strategy: &FillStrategy) -> Result<Option<(Column, String)>> {
    let name = column.name().clone();
    let dtype = column.dtype().clone();

    let invalid = |strategy: &FillStrategy| EdaError::InvalidFill {
        column: name.to_string(),
        strategy: strategy.to_string(),
        dtype: dtype.to_string(),
    };

    match strategy {
        FillStrategy::Constant(value) => {
            if dtype == DataType::String {
                Ok(Some((fill_text(column, value)?, value.clone())))
            } else if dtype.is_primitive_numeric() {
                let number: f64 = value.parse().map_err(|_| invalid(strategy))?;
                Ok(Some((fill_numeric(column, number)?, value.clone())))
            } else {
                Err(invalid(strategy).into())
            }
        }
        FillStrategy::Median => {
            if !dtype.is_primitive_numeric() {
                return Err(invalid(strategy).into());
            }
            let values = numeric_values(column)?;
            match median(&values) {
                Some(m) => Ok(Some((fill_numeric(column, m)?, format_number(m)))),
                None => Ok(None),
            }
        }
        FillStrategy::Mode => {
            if dtype == DataType::String {
                match text_mode(column.str()?.into_iter().flatten()) {
                    Some(m) => Ok(Some((fill_text(column, &m)?, m))),
                    None => Ok(None),
                }
            } else if dtype.is_primitive_numeric() {
                let values = numeric_values(column)?;
                match numeric_mode(&values) {
                    Some(m) => Ok(Some((fill_numeric(column, m)?, format_number(m)))),
                    None => Ok(None),
                }
            } else {
                Err(invalid(strategy).into())
            }
        }
    }
}

fn fill_text(column: &Column, value: &str) -> Result<Column> {
    let filled: Vec<String> = column
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(value).to_string())
        .collect();
    Ok(Column::new(column.name().clone(), filled))
}

fn fill_numeric(column: &Column, value: f64) -> Result<Column> {
    let float_col = column.cast(&DataType::Float64)?;
    let filled: Vec<f64> = float_col
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(value))
        .collect();
    Ok(Column::new(column.name().clone(), filled))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
