//! Run configuration
//!
//! Every field defaults to the analyst decisions for the loan dataset, so a config
//! file only needs to name what it changes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::pipeline::binning::BinSpec;
use crate::pipeline::clean::TableCleaning;
use crate::pipeline::derive::DeriveOptions;
use crate::pipeline::error::EdaError;
use crate::pipeline::impute::{default_application_fill_policy, FillRule};
use crate::pipeline::merge::MergeOptions;
use crate::pipeline::signs::{default_days_columns, SignPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub app_path: PathBuf,
    pub prev_app_path: PathBuf,
    pub output_dir: PathBuf,
    /// Rows used for CSV type inference; 0 scans the whole file
    pub infer_schema_length: usize,
    /// Max percent of nulls a column of the application table may have
    pub null_threshold_app: f64,
    /// Max percent of nulls a column of the previous-application table may have
    pub null_threshold_prev: f64,
    pub fill_policy_table: Vec<FillRule>,
    pub prev_fill_policy_table: Vec<FillRule>,
    /// Application columns converted to absolute values
    pub days_columns: Vec<String>,
    pub prev_sign_policy: SignPolicy,
    pub credit_bins: BinSpec,
    pub age_bins: BinSpec,
    pub flag_prefix: String,
    pub join_key: String,
    pub merge_suffix: String,
    pub analysis: AnalysisConfig,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            app_path: PathBuf::from("application_data.csv"),
            prev_app_path: PathBuf::from("previous_application.csv"),
            output_dir: PathBuf::from("eda_output"),
            infer_schema_length: 10000,
            null_threshold_app: 47.0,
            null_threshold_prev: 49.0,
            fill_policy_table: default_application_fill_policy(),
            prev_fill_policy_table: Vec::new(),
            days_columns: default_days_columns(),
            prev_sign_policy: SignPolicy::AllNumeric,
            credit_bins: BinSpec::credit_default(),
            age_bins: BinSpec::age_default(),
            flag_prefix: "FLAG".to_string(),
            join_key: "SK_ID_CURR".to_string(),
            merge_suffix: "_PREV".to_string(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl EdaConfig {
    /// Read a JSON config file; absent fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EdaConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("null_threshold_app", self.null_threshold_app),
            ("null_threshold_prev", self.null_threshold_prev),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EdaError::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                ))
                .into());
            }
        }
        if self.flag_prefix.is_empty() {
            return Err(EdaError::Config("flag_prefix must not be empty".to_string()).into());
        }
        if self.join_key.is_empty() {
            return Err(EdaError::Config("join_key must not be empty".to_string()).into());
        }
        self.credit_bins
            .validate()
            .context("Invalid credit_bins")?;
        self.age_bins.validate().context("Invalid age_bins")?;
        Ok(())
    }

    pub fn app_derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            derive_years: true,
            credit_bins: self.credit_bins.clone(),
            age_bins: self.age_bins.clone(),
        }
    }

    pub fn prev_derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            derive_years: false,
            ..self.app_derive_options()
        }
    }

    pub fn app_cleaning(&self) -> TableCleaning {
        TableCleaning {
            table: "application".to_string(),
            null_threshold_pct: self.null_threshold_app,
            fill_rules: self.fill_policy_table.clone(),
            sign_policy: SignPolicy::Listed(self.days_columns.clone()),
            derive: self.app_derive_options(),
        }
    }

    pub fn prev_cleaning(&self) -> TableCleaning {
        TableCleaning {
            table: "previous_application".to_string(),
            null_threshold_pct: self.null_threshold_prev,
            fill_rules: self.prev_fill_policy_table.clone(),
            sign_policy: self.prev_sign_policy.clone(),
            derive: self.prev_derive_options(),
        }
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            join_key: self.join_key.clone(),
            suffix: self.merge_suffix.clone(),
            flag_prefix: self.flag_prefix.clone(),
        }
    }
}
