//! Analysis module - descriptive statistics over cleaned tables
//!
//! Every analysis borrows its table and returns a value. A missing or
//! mistyped column only skips the analysis that needed it.

pub mod correlation;
pub mod density;
pub mod dispersion;
pub mod distribution;
pub mod pivot;

pub use correlation::*;
pub use density::*;
pub use dispersion::*;
pub use distribution::*;
pub use pivot::*;

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pipeline::derive::derived_category_columns;
use crate::pipeline::error::EdaError;

/// Columns and limits for the analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub target_column: String,
    /// Number of categorical columns that get a pie chart
    pub pie_limit: usize,
    pub boxplot_columns: Vec<String>,
    pub density_column: String,
    pub correlation_columns: Vec<String>,
    pub pivot: PivotSpec,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_column: "TARGET".to_string(),
            pie_limit: 3,
            boxplot_columns: default_boxplot_columns(),
            density_column: "AMT_GOODS_PRICE".to_string(),
            correlation_columns: default_correlation_columns(),
            pivot: PivotSpec::default(),
        }
    }
}

/// An analysis that did not run, and why
#[derive(Debug, Clone, Serialize)]
pub struct SkippedAnalysis {
    pub analysis: String,
    pub reason: String,
}

/// Everything computed over the cleaned application table
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationAnalysis {
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub distributions: Vec<Distribution>,
    /// Subset of `categorical_columns` rendered as pie charts
    pub pie_columns: Vec<String>,
    pub boxplots: Vec<BoxSummary>,
    pub density: Option<DensityComparison>,
    pub correlation: Option<CorrelationMatrix>,
    pub skipped: Vec<SkippedAnalysis>,
}

/// Turn a skippable failure into `None` and record it; propagate the rest.
pub fn skip_on_missing<T>(
    analysis: &str,
    result: Result<T>,
    skipped: &mut Vec<SkippedAnalysis>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match err.downcast_ref::<EdaError>() {
            Some(eda) if eda.is_skippable() => {
                skipped.push(SkippedAnalysis {
                    analysis: analysis.to_string(),
                    reason: eda.to_string(),
                });
                Ok(None)
            }
            _ => Err(err),
        },
    }
}

/// Run the univariate, target-conditional and correlation analyses.
pub fn analyze_application(df: &DataFrame, config: &AnalysisConfig) -> Result<ApplicationAnalysis> {
    let mut skipped = Vec::new();

    let categorical = categorical_columns(df, &derived_category_columns());
    let distributions = categorical
        .iter()
        .map(|name| categorical_distribution(df, name))
        .collect::<Result<Vec<_>>>()?;
    let pie_columns: Vec<String> = categorical.iter().take(config.pie_limit).cloned().collect();

    let mut boxplots = Vec::new();
    for name in &config.boxplot_columns {
        let summary = skip_on_missing(
            &format!("boxplot of {}", name),
            dispersion_summary(df, name),
            &mut skipped,
        )?;
        boxplots.extend(summary);
    }

    let density = skip_on_missing(
        &format!("density of {} by {}", config.density_column, config.target_column),
        target_density(df, &config.target_column, &config.density_column),
        &mut skipped,
    )?;

    let correlation = skip_on_missing(
        "correlation heatmap",
        correlation_matrix(df, &config.correlation_columns),
        &mut skipped,
    )?;

    Ok(ApplicationAnalysis {
        categorical_columns: categorical,
        numeric_columns: numeric_columns(df),
        distributions,
        pie_columns,
        boxplots,
        density,
        correlation,
        skipped,
    })
}
