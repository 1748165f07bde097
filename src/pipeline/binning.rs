//! Fixed-boundary binning of numeric columns into labeled categories
//!
//! Intervals are right-closed: bin `i` covers `(edges[i], edges[i + 1]]`.
//! A value at or below the first edge, above the last edge, or null maps to
//! no bin, stored as null in the derived column.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{require_column, EdaError};

/// Edges and labels for one binned column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    /// Strictly increasing boundaries
    pub edges: Vec<f64>,
    /// One label per interval, in ascending order
    pub labels: Vec<String>,
    /// Append `+inf` as the final upper boundary
    #[serde(default)]
    pub open_ended: bool,
}

impl BinSpec {
    pub fn new(edges: &[f64], labels: &[&str], open_ended: bool) -> Self {
        Self {
            edges: edges.to_vec(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            open_ended,
        }
    }

    /// Credit amount buckets: 200k steps up to 1M, then unbounded
    pub fn credit_default() -> Self {
        Self::new(
            &[0.0, 200_000.0, 400_000.0, 600_000.0, 800_000.0, 1_000_000.0],
            &["very low", "low", "medium", "high", "very high", "extreme"],
            true,
        )
    }

    /// Age-in-years buckets
    pub fn age_default() -> Self {
        Self::new(
            &[0.0, 25.0, 45.0, 65.0, 85.0],
            &["below 25", "25-45", "45-65", "65-85"],
            false,
        )
    }

    fn upper_edges(&self) -> impl Iterator<Item = f64> + '_ {
        let tail = if self.open_ended {
            Some(f64::INFINITY)
        } else {
            None
        };
        self.edges.iter().skip(1).copied().chain(tail)
    }

    pub fn interval_count(&self) -> usize {
        self.upper_edges().count()
    }

    pub fn validate(&self) -> Result<()> {
        if self.edges.is_empty() {
            return Err(EdaError::Config("bin edges must not be empty".to_string()).into());
        }
        if self.edges.iter().any(|e| e.is_nan()) {
            return Err(EdaError::Config("bin edges must not contain NaN".to_string()).into());
        }
        if self.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EdaError::Config(format!(
                "bin edges must be strictly increasing: {:?}",
                self.edges
            ))
            .into());
        }
        let intervals = self.interval_count();
        if intervals != self.labels.len() {
            return Err(EdaError::Config(format!(
                "{} labels given for {} intervals",
                self.labels.len(),
                intervals
            ))
            .into());
        }
        Ok(())
    }

    /// Index of the interval containing `value`, by boundary comparison.
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        let lowest = *self.edges.first()?;
        if value.is_nan() || value <= lowest {
            return None;
        }
        self.upper_edges().position(|upper| value <= upper)
    }

    pub fn label_for(&self, value: f64) -> Option<&str> {
        self.bucket_index(value)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}

/// Append `target` as the binned version of numeric column `source`.
pub fn apply_bins(mut df: DataFrame, source: &str, target: &str, spec: &BinSpec) -> Result<DataFrame> {
    spec.validate()?;
    let context = format!("{} binning", target);
    let column = require_column(&df, source, &context)?;
    if !column.dtype().is_primitive_numeric() {
        return Err(EdaError::ColumnType {
            column: source.to_string(),
            expected: "numeric".to_string(),
            found: column.dtype().to_string(),
        }
        .into());
    }

    let labels: Vec<Option<&str>> = column
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.and_then(|x| spec.label_for(x)))
        .collect();

    df.with_column(Column::new(target.into(), labels))?;
    Ok(df)
}
