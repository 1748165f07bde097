//! Command-line argument definitions using clap

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::EdaConfig;

/// credit-eda - Exploratory analysis of loan applications and their credit history
#[derive(Parser, Debug)]
#[command(name = "credit-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Application table (CSV or Parquet)
    #[arg(long)]
    pub app: Option<PathBuf>,

    /// Previous-application table (CSV or Parquet)
    #[arg(long)]
    pub prev: Option<PathBuf>,

    /// Directory for the JSON report and chart files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON config file. Command-line values override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Drop application columns with more than this percent of nulls (0-100)
    #[arg(long, value_parser = validate_percent)]
    pub app_null_threshold: Option<f64>,

    /// Drop previous-application columns with more than this percent of nulls (0-100)
    #[arg(long, value_parser = validate_percent)]
    pub prev_null_threshold: Option<f64>,

    /// Columns starting with this prefix are removed from the merged table
    #[arg(long)]
    pub flag_prefix: Option<String>,

    /// Number of categorical columns that get a pie chart
    #[arg(long)]
    pub pie_limit: Option<usize>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long)]
    pub infer_schema_length: Option<usize>,

    /// Also write the merged table to this path (CSV or Parquet, by extension)
    #[arg(long)]
    pub save_merged: Option<PathBuf>,

    /// Skip writing SVG charts
    #[arg(long, default_value = "false")]
    pub no_charts: bool,
}

impl Cli {
    /// Overwrite config fields with every value given on the command line.
    pub fn apply_to(&self, config: &mut EdaConfig) {
        if let Some(app) = &self.app {
            config.app_path = app.clone();
        }
        if let Some(prev) = &self.prev {
            config.prev_app_path = prev.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(pct) = self.app_null_threshold {
            config.null_threshold_app = pct;
        }
        if let Some(pct) = self.prev_null_threshold {
            config.null_threshold_prev = pct;
        }
        if let Some(prefix) = &self.flag_prefix {
            config.flag_prefix = prefix.clone();
        }
        if let Some(limit) = self.pie_limit {
            config.analysis.pie_limit = limit;
        }
        if let Some(len) = self.infer_schema_length {
            config.infer_schema_length = len;
        }
    }

    /// Defaults, then the config file if given, then command-line values.
    pub fn to_config(&self) -> Result<EdaConfig> {
        let mut config = match &self.config {
            Some(path) => EdaConfig::from_file(path)?,
            None => EdaConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }
}

/// Validator for null-threshold percentages
fn validate_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!(
            "threshold must be between 0.0 and 100.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
