//! Relative frequency tables for categorical columns

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::error::require_column;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percent: f64,
}

/// Value counts of one column, normalized to percent
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub column: String,
    /// Non-null rows counted
    pub total: usize,
    /// Sorted by count descending, then category ascending
    pub shares: Vec<CategoryShare>,
}

/// String columns in table order, minus `exclude`
pub fn categorical_columns(df: &DataFrame, exclude: &[&str]) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype() == &DataType::String)
        .map(|col| col.name().to_string())
        .filter(|name| !exclude.contains(&name.as_str()))
        .collect()
}

/// Numeric columns in table order
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Relative frequency of each category, nulls excluded.
pub fn categorical_distribution(df: &DataFrame, column: &str) -> Result<Distribution> {
    let col = require_column(df, column, "categorical distribution")?;
    let text = col.cast(&DataType::String)?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in text.str()?.into_iter().flatten() {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let total: usize = counts.values().sum();
    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            percent: if total > 0 {
                count as f64 * 100.0 / total as f64
            } else {
                0.0
            },
            category,
            count,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    Ok(Distribution {
        column: column.to_string(),
        total,
        shares,
    })
}
