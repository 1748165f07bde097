//! Mean pivot table over the merged dataset

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Which columns form the pivot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotSpec {
    /// Row key columns
    pub index: Vec<String>,
    /// Column key (integer-valued)
    pub columns: String,
    /// Averaged value column
    pub values: String,
}

impl Default for PivotSpec {
    fn default() -> Self {
        Self {
            index: vec!["NAME_INCOME_TYPE".to_string(), "NAME_CLIENT_TYPE".to_string()],
            columns: "TARGET".to_string(),
            values: "AMT_CREDIT".to_string(),
        }
    }
}

impl PivotSpec {
    pub fn required_columns(&self) -> Vec<&str> {
        let mut required: Vec<&str> = self.index.iter().map(String::as_str).collect();
        required.push(&self.columns);
        required.push(&self.values);
        required
    }

    /// Required columns absent from `df`
    pub fn missing_columns(&self, df: &DataFrame) -> Vec<String> {
        self.required_columns()
            .into_iter()
            .filter(|name| df.column(name).is_err())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    pub keys: Vec<String>,
    /// Mean per column key, aligned with `PivotTable::column_keys`
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub index_names: Vec<String>,
    pub column_name: String,
    pub value_name: String,
    pub column_keys: Vec<i64>,
    /// Sorted by keys ascending
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn get(&self, keys: &[&str], column_key: i64) -> Option<f64> {
        let j = self.column_keys.iter().position(|k| *k == column_key)?;
        self.rows
            .iter()
            .find(|row| row.keys.iter().map(String::as_str).eq(keys.iter().copied()))
            .and_then(|row| row.values[j])
    }
}

/// Mean of `spec.values` for each (index keys, column key) combination.
///
/// Returns `Ok(None)` when any required column is absent. Rows with a null
/// key are left out.
pub fn pivot_mean(df: &DataFrame, spec: &PivotSpec) -> Result<Option<PivotTable>> {
    if !spec.missing_columns(df).is_empty() {
        return Ok(None);
    }

    let mut keys: Vec<Expr> = spec.index.iter().map(|name| col(name.as_str())).collect();
    keys.push(col(spec.columns.as_str()));

    let not_null = keys
        .iter()
        .cloned()
        .map(|k| k.is_not_null())
        .reduce(|acc, e| acc.and(e))
        .unwrap_or_else(|| lit(true));

    let grouped = df
        .clone()
        .lazy()
        .filter(not_null)
        .group_by(keys)
        .agg([col(spec.values.as_str())
            .cast(DataType::Float64)
            .mean()
            .alias("__mean")])
        .collect()?;

    let index_cols: Vec<Column> = spec
        .index
        .iter()
        .map(|name| grouped.column(name).and_then(|c| c.cast(&DataType::String)))
        .collect::<PolarsResult<_>>()?;
    let column_key = grouped.column(&spec.columns)?.cast(&DataType::Int64)?;
    let means = grouped.column("__mean")?.cast(&DataType::Float64)?;

    let column_key = column_key.i64()?;
    let means = means.f64()?;
    let index_values: Vec<&StringChunked> = index_cols
        .iter()
        .map(|c| c.str())
        .collect::<PolarsResult<_>>()?;

    let mut cells: BTreeMap<Vec<String>, BTreeMap<i64, Option<f64>>> = BTreeMap::new();
    let mut column_keys: BTreeSet<i64> = BTreeSet::new();

    for i in 0..grouped.height() {
        let Some(ck) = column_key.get(i) else {
            continue;
        };
        let row_keys: Vec<String> = index_values
            .iter()
            .map(|ca| ca.get(i).unwrap_or_default().to_string())
            .collect();
        column_keys.insert(ck);
        cells.entry(row_keys).or_default().insert(ck, means.get(i));
    }

    let column_keys: Vec<i64> = column_keys.into_iter().collect();
    let rows = cells
        .into_iter()
        .map(|(keys, by_column)| PivotRow {
            values: column_keys
                .iter()
                .map(|k| by_column.get(k).copied().flatten())
                .collect(),
            keys,
        })
        .collect();

    Ok(Some(PivotTable {
        index_names: spec.index.clone(),
        column_name: spec.columns.clone(),
        value_name: spec.values.clone(),
        column_keys,
        rows,
    }))
}
