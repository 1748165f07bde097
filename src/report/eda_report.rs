//! Machine-readable EDA report
//!
//! Collects the cleaning logs, analysis results and merge summary of a run
//! into one JSON document.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::analysis::{ApplicationAnalysis, PivotTable, SkippedAnalysis};
use crate::config::EdaConfig;
use crate::pipeline::{CleaningLog, EdaOutcome};

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub credit_eda_version: String,
    pub app_file: String,
    pub prev_app_file: String,
    pub null_threshold_app: f64,
    pub null_threshold_prev: f64,
    pub flag_prefix: String,
    pub join_key: String,
}

/// Shape and dropped columns of the merged table
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub rows: usize,
    pub columns: usize,
    pub application_rows: usize,
    pub dropped_flag_columns: Vec<String>,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub application_ms: u64,
    pub analysis_ms: u64,
    pub previous_ms: u64,
    pub merge_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub metadata: ReportMetadata,
    pub application: CleaningLog,
    pub previous_application: CleaningLog,
    pub analysis: ApplicationAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<PivotTable>,
    pub merge: MergeSummary,
    pub skipped: Vec<SkippedAnalysis>,
    pub timing: TimingInfo,
}

impl EdaReport {
    pub fn new(config: &EdaConfig, outcome: &EdaOutcome) -> Self {
        let (rows, columns) = outcome.merged.shape();
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                credit_eda_version: env!("CARGO_PKG_VERSION").to_string(),
                app_file: config.app_path.display().to_string(),
                prev_app_file: config.prev_app_path.display().to_string(),
                null_threshold_app: config.null_threshold_app,
                null_threshold_prev: config.null_threshold_prev,
                flag_prefix: config.flag_prefix.clone(),
                join_key: config.join_key.clone(),
            },
            application: outcome.application_log.clone(),
            previous_application: outcome.previous_log.clone(),
            analysis: outcome.analysis.clone(),
            pivot: outcome.pivot.clone(),
            merge: MergeSummary {
                rows,
                columns,
                application_rows: outcome.application.height(),
                dropped_flag_columns: outcome.dropped_flag_columns.clone(),
            },
            skipped: outcome.skipped(),
            timing: outcome.timing.clone(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write(&self, output_path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize EDA report to JSON")?;

        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write EDA report to {}", output_path.display()))?;

        Ok(())
    }
}
