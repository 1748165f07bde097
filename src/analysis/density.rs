//! Target-conditional kernel density estimates

use std::f64::consts::PI;

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::error::{require_column, EdaError};
use crate::utils::stats::{sample_std, sorted};

/// Number of points each density curve is evaluated at
pub const GRID_SIZE: usize = 200;

/// Grid extends this many bandwidths past the data range
const GRID_CUT: f64 = 3.0;

/// A smoothed density for the rows of one target class
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    pub target: i64,
    pub count: usize,
    pub bandwidth: f64,
    /// `(x, density)` pairs on an evenly spaced grid
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    /// Trapezoidal integral of the curve, close to 1 for a full grid
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DensityComparison {
    pub column: String,
    pub target_column: String,
    /// One curve per target class in {0, 1} that has enough data
    pub curves: Vec<DensityCurve>,
}

/// Scott's rule: `std * n^(-1/5)`
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    if std == 0.0 || !std.is_finite() {
        return None;
    }
    Some(std * (values.len() as f64).powf(-0.2))
}

/// Gaussian KDE evaluated on `GRID_SIZE` points.
///
/// Returns `None` for fewer than two values or zero variance.
pub fn gaussian_kde(values: &[f64]) -> Option<(f64, Vec<(f64, f64)>)> {
    let bandwidth = scott_bandwidth(values)?;
    let values = sorted(values.to_vec());
    let lo = values[0] - GRID_CUT * bandwidth;
    let hi = values[values.len() - 1] + GRID_CUT * bandwidth;
    let step = (hi - lo) / (GRID_SIZE - 1) as f64;
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * PI).sqrt());

    let points = (0..GRID_SIZE)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect();

    Some((bandwidth, points))
}

/// Split rows by `target_column ∈ {0, 1}` and estimate the density of `column` per class.
pub fn target_density(df: &DataFrame, target_column: &str, column: &str) -> Result<DensityComparison> {
    let target = require_column(df, target_column, "density comparison")?;
    let values = require_column(df, column, "density comparison")?;
    if !values.dtype().is_primitive_numeric() {
        return Err(EdaError::ColumnType {
            column: column.to_string(),
            expected: "numeric".to_string(),
            found: values.dtype().to_string(),
        }
        .into());
    }

    let target = target.cast(&DataType::Int64)?;
    let values = values.cast(&DataType::Float64)?;

    let mut groups: [Vec<f64>; 2] = [Vec::new(), Vec::new()];
    for (t, v) in target.i64()?.iter().zip(values.f64()?.iter()) {
        if let (Some(t @ 0..=1), Some(v)) = (t, v) {
            if !v.is_nan() {
                groups[t as usize].push(v);
            }
        }
    }

    let curves = groups
        .iter()
        .enumerate()
        .filter_map(|(t, group)| {
            gaussian_kde(group).map(|(bandwidth, points)| DensityCurve {
                target: t as i64,
                count: group.len(),
                bandwidth,
                points,
            })
        })
        .collect();

    Ok(DensityComparison {
        column: column.to_string(),
        target_column: target_column.to_string(),
        curves,
    })
}
