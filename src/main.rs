//! credit-eda: Loan Application EDA CLI Tool
//!
//! Cleans the application and previous-application tables, prints the
//! descriptive analyses, merges the tables and writes a JSON report plus
//! SVG charts.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use polars::prelude::*;

use credit_eda::cli::Cli;
use credit_eda::pipeline::run_eda;
use credit_eda::report::{export_charts, EdaReport, EdaSummary};
use credit_eda::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_info, print_step_header, print_step_time,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config()?;

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(&config);

    let mut outcome = run_eda(&config)?;

    // Step 5: Save outputs
    print_step_header(5, "Save Results");
    let step_start = Instant::now();

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let report_path = config.output_dir.join("eda_report.json");
    let spinner = create_spinner("Writing EDA report...");
    EdaReport::new(&config, &outcome).write(&report_path)?;
    finish_with_success(
        &spinner,
        &format!("Report saved to {}", report_path.display()),
    );

    if cli.no_charts {
        print_info("Chart export disabled");
        outcome.charts.clear();
    } else {
        let spinner = create_spinner("Rendering charts...");
        let written = export_charts(&outcome.charts, &config.output_dir)?;
        finish_with_success(
            &spinner,
            &format!(
                "{} chart(s) saved to {}",
                written.len(),
                config.output_dir.display()
            ),
        );
    }

    if let Some(path) = &cli.save_merged {
        let spinner = create_spinner("Writing merged table...");
        save_dataset(&mut outcome.merged, path)?;
        finish_with_success(&spinner, &format!("Merged table saved to {}", path.display()));
    }
    print_step_time(step_start.elapsed());

    // Display summary
    EdaSummary::from_outcome(&outcome).display();

    // Final completion message
    print_completion();

    Ok(())
}

/// Save dataset to file (CSV or Parquet based on extension)
fn save_dataset(df: &mut DataFrame, path: &std::path::Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
