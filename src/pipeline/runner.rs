//! End-to-end EDA run
//!
//! Drives load → clean → derive → analyze for the application table, load →
//! clean → derive for previous applications, then merge and pivot. Progress
//! is printed step by step; every computed result is returned.

use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::clean::{clean_table, CleaningLog};
use super::loader::load_dataset_with_progress;
use super::merge::merge_tables;
use crate::analysis::{analyze_application, pivot_mean, ApplicationAnalysis, PivotTable, SkippedAnalysis};
use crate::config::EdaConfig;
use crate::report::charts::{build_charts, ChartSpec};
use crate::report::tables::{
    boxplot_table, correlation_table, distribution_table, missing_table, pivot_table,
    print_indented,
};
use crate::report::TimingInfo;
use crate::utils::{
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
};

/// Rows shown in the missing-value tables
const MISSING_TABLE_ROWS: usize = 15;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct EdaOutcome {
    pub application: DataFrame,
    pub application_log: CleaningLog,
    pub previous: DataFrame,
    pub previous_log: CleaningLog,
    pub merged: DataFrame,
    pub dropped_flag_columns: Vec<String>,
    pub analysis: ApplicationAnalysis,
    pub pivot: Option<PivotTable>,
    /// Set when the pivot guard found required columns missing
    pub pivot_skipped: Option<SkippedAnalysis>,
    pub charts: Vec<ChartSpec>,
    pub timing: TimingInfo,
}

impl EdaOutcome {
    /// All analyses that did not run
    pub fn skipped(&self) -> Vec<SkippedAnalysis> {
        let mut skipped = self.analysis.skipped.clone();
        skipped.extend(self.pivot_skipped.clone());
        skipped
    }
}

fn print_cleaning(log: &CleaningLog) {
    println!("\n      Missing values before cleaning (%):");
    print_indented(&missing_table(&log.missing_before, MISSING_TABLE_ROWS));

    if log.dropped_columns.is_empty() {
        print_info("No columns below the non-null threshold");
    } else {
        print_count(
            "sparse column(s)",
            log.dropped_columns.len(),
            Some(&format!(
                "(>{:.0}% missing, fewer than {} non-null)",
                log.null_threshold_pct, log.min_non_null
            )),
        );
        print_success(&format!(
            "Dropped sparse columns, {} remaining before derivation",
            log.initial_columns - log.dropped_columns.len()
        ));
    }

    for record in &log.imputations {
        println!(
            "      {} ← {} ({}, {} value(s))",
            record.column, record.fill_value, record.strategy, record.filled
        );
    }
    if !log.imputations.is_empty() {
        print_success(&format!("Imputed {} column(s)", log.imputations.len()));
    }
    if log.remaining_nulls.is_empty() {
        print_info("No nulls left after imputation");
    } else {
        println!("\n      Missing values after imputation (%):");
        print_indented(&missing_table(&log.missing_after, MISSING_TABLE_ROWS));
        for (column, nulls) in &log.remaining_nulls {
            print_warning(&format!(
                "{} still has {} null(s) after imputation",
                column, nulls
            ));
        }
    }

    print_success(&format!(
        "Normalized signs of {} column(s)",
        log.normalized_columns.len()
    ));
    print_success(&format!("Derived {}", log.derived_columns.join(", ")));
}

fn print_analysis(analysis: &ApplicationAnalysis) {
    print_info(&format!(
        "{} categorical column(s): {}",
        analysis.categorical_columns.len(),
        analysis.categorical_columns.join(", ")
    ));
    print_info(&format!(
        "{} numeric column(s): {}",
        analysis.numeric_columns.len(),
        analysis.numeric_columns.join(", ")
    ));
    for dist in analysis
        .distributions
        .iter()
        .filter(|d| analysis.pie_columns.contains(&d.column))
    {
        println!("\n      Distribution of {}:", dist.column);
        print_indented(&distribution_table(dist));
    }

    if !analysis.boxplots.is_empty() {
        println!();
        print_indented(&boxplot_table(&analysis.boxplots));
    }

    if let Some(density) = &analysis.density {
        for curve in &density.curves {
            print_info(&format!(
                "{} = {}: {} rows, bandwidth {:.2}",
                density.target_column, curve.target, curve.count, curve.bandwidth
            ));
        }
    }

    if let Some(corr) = &analysis.correlation {
        println!();
        print_indented(&correlation_table(corr));
    }

    for skipped in &analysis.skipped {
        print_warning(&format!("Skipped {}: {}", skipped.analysis, skipped.reason));
    }
}

/// Run the full pipeline described by `config`.
pub fn run_eda(config: &EdaConfig) -> Result<EdaOutcome> {
    config.validate()?;
    let run_start = Instant::now();
    let mut timing = TimingInfo::default();

    // Step 1: application table
    print_step_header(1, "Load & Clean Application Data");
    let step_start = Instant::now();
    let (app_raw, rows, cols, memory_mb) =
        load_dataset_with_progress(&config.app_path, config.infer_schema_length)
            .context("Failed to load application data")?;
    print_info(&format!(
        "{} rows × {} columns ({:.2} MB)",
        rows, cols, memory_mb
    ));
    let (application, application_log) = clean_table(app_raw, &config.app_cleaning())?;
    print_cleaning(&application_log);
    timing.application_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    // Step 2: analysis of the application table
    print_step_header(2, "Univariate & Target Analysis");
    let step_start = Instant::now();
    let analysis = analyze_application(&application, &config.analysis)?;
    print_analysis(&analysis);
    timing.analysis_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    // Step 3: previous applications
    print_step_header(3, "Load & Clean Previous Applications");
    let step_start = Instant::now();
    let (prev_raw, rows, cols, memory_mb) =
        load_dataset_with_progress(&config.prev_app_path, config.infer_schema_length)
            .context("Failed to load previous application data")?;
    print_info(&format!(
        "{} rows × {} columns ({:.2} MB)",
        rows, cols, memory_mb
    ));
    let (previous, previous_log) = clean_table(prev_raw, &config.prev_cleaning())?;
    print_cleaning(&previous_log);
    timing.previous_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    // Step 4: merge and pivot
    print_step_header(4, "Merge & Pivot");
    let step_start = Instant::now();
    let (merged, dropped_flag_columns) =
        merge_tables(&application, &previous, &config.merge_options())?;
    let (merged_rows, merged_cols) = merged.shape();
    print_success(&format!(
        "Merged on {}: {} rows × {} columns",
        config.join_key, merged_rows, merged_cols
    ));
    print_count(
        "flag column(s) dropped",
        dropped_flag_columns.len(),
        Some(&format!("(prefix '{}')", config.flag_prefix)),
    );

    let pivot_spec = &config.analysis.pivot;
    let pivot = pivot_mean(&merged, pivot_spec)?;
    let pivot_skipped = match &pivot {
        Some(table) => {
            println!();
            print_indented(&pivot_table(table));
            None
        }
        None => {
            let missing = pivot_spec.missing_columns(&merged);
            let reason = format!("missing column(s): {}", missing.join(", "));
            print_warning(&format!("Skipped pivot table: {}", reason));
            Some(SkippedAnalysis {
                analysis: "pivot table".to_string(),
                reason,
            })
        }
    };
    timing.merge_ms = step_start.elapsed().as_millis() as u64;
    print_step_time(step_start.elapsed());

    let charts = build_charts(&analysis, pivot.as_ref());
    timing.total_ms = run_start.elapsed().as_millis() as u64;

    Ok(EdaOutcome {
        application,
        application_log,
        previous,
        previous_log,
        merged,
        dropped_flag_columns,
        analysis,
        pivot,
        pivot_skipped,
        charts,
        timing,
    })
}
