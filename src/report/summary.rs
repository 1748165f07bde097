//! End-of-run summary table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningLog, EdaOutcome};

/// Summary of the cleaning and merge steps
#[derive(Debug, Default)]
pub struct EdaSummary {
    pub tables: Vec<TableSummary>,
    pub merged_rows: usize,
    pub merged_columns: usize,
    pub charts: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub initial_columns: usize,
    pub dropped: usize,
    pub imputed: usize,
    pub derived: usize,
    pub final_columns: usize,
}

impl From<&CleaningLog> for TableSummary {
    fn from(log: &CleaningLog) -> Self {
        Self {
            name: log.table.clone(),
            rows: log.rows,
            initial_columns: log.initial_columns,
            dropped: log.dropped_columns.len(),
            imputed: log.imputations.len(),
            derived: log.derived_columns.len(),
            final_columns: log.final_columns,
        }
    }
}

impl EdaSummary {
    pub fn from_outcome(outcome: &EdaOutcome) -> Self {
        let (merged_rows, merged_columns) = outcome.merged.shape();
        Self {
            tables: vec![
                TableSummary::from(&outcome.application_log),
                TableSummary::from(&outcome.previous_log),
            ],
            merged_rows,
            merged_columns,
            charts: outcome.charts.len(),
            skipped: outcome.skipped().into_iter().map(|s| s.analysis).collect(),
        }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Table").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("Columns In").add_attribute(Attribute::Bold),
            Cell::new("Dropped").add_attribute(Attribute::Bold),
            Cell::new("Imputed").add_attribute(Attribute::Bold),
            Cell::new("Derived").add_attribute(Attribute::Bold),
            Cell::new("Columns Out").add_attribute(Attribute::Bold),
        ]);

        for t in &self.tables {
            table.add_row(vec![
                Cell::new(&t.name),
                Cell::new(t.rows),
                Cell::new(t.initial_columns),
                Cell::new(t.dropped).fg(if t.dropped == 0 {
                    Color::White
                } else {
                    Color::Red
                }),
                Cell::new(t.imputed).fg(Color::Yellow),
                Cell::new(t.derived).fg(Color::Cyan),
                Cell::new(t.final_columns)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        table.add_row(vec![
            Cell::new("merged").add_attribute(Attribute::Bold),
            Cell::new(self.merged_rows),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new(self.merged_columns)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("EDA SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        println!();
        println!("    {} chart(s) produced", style(self.charts).yellow().bold());

        if !self.skipped.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Skipped analyses").yellow(),
                style(format!("({})", self.skipped.len())).dim()
            );
            for name in &self.skipped {
                println!("        {} {}", style("•").dim(), name);
            }
        }
    }
}
