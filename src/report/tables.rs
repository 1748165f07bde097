//! Console tables for intermediate results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};

use crate::analysis::{BoxSummary, CorrelationMatrix, Distribution, PivotTable};

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Print a table indented to line up with step output
pub fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("      {}", line);
    }
}

/// Missing percentage per column; only columns with nulls, at most `limit` rows.
pub fn missing_table(ratios: &[(String, f64)], limit: usize) -> Table {
    let mut table = new_table(&["Column", "Missing %"]);
    for (name, ratio) in ratios.iter().filter(|(_, r)| *r > 0.0).take(limit) {
        let pct = ratio * 100.0;
        let color = if pct > 40.0 {
            Color::Red
        } else if pct > 10.0 {
            Color::Yellow
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{:.2}", pct))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn distribution_table(dist: &Distribution) -> Table {
    let mut table = new_table(&[dist.column.as_str(), "Count", "Percent"]);
    for share in &dist.shares {
        table.add_row(vec![
            Cell::new(&share.category),
            Cell::new(share.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}%", share.percent)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn boxplot_table(summaries: &[BoxSummary]) -> Table {
    let mut table = new_table(&["Column", "Min", "Q1", "Median", "Q3", "Max", "IQR", "Outliers"]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(format!("{:.2}", s.min)),
            Cell::new(format!("{:.2}", s.q1)),
            Cell::new(format!("{:.2}", s.median)),
            Cell::new(format!("{:.2}", s.q3)),
            Cell::new(format!("{:.2}", s.max)),
            Cell::new(format!("{:.2}", s.iqr())),
            Cell::new(s.outliers).fg(if s.outliers > 0 {
                Color::Yellow
            } else {
                Color::White
            }),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut headers = vec![""];
    headers.extend(matrix.columns.iter().map(String::as_str));
    let mut table = new_table(&headers);
    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|v| match v {
            Some(c) => Cell::new(format!("{:.2}", c)).fg(if c.abs() > 0.5 {
                Color::Green
            } else {
                Color::White
            }),
            None => Cell::new("n/a").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }
    table
}

pub fn pivot_table(pivot: &PivotTable) -> Table {
    let mut headers: Vec<String> = pivot.index_names.clone();
    headers.extend(
        pivot
            .column_keys
            .iter()
            .map(|k| format!("{}={}", pivot.column_name, k)),
    );
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut table = new_table(&headers);
    for row in &pivot.rows {
        let mut cells: Vec<Cell> = row.keys.iter().map(Cell::new).collect();
        cells.extend(row.values.iter().map(|v| match v {
            Some(m) => Cell::new(format!("{:.2}", m)).set_alignment(CellAlignment::Right),
            None => Cell::new("-").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }
    table
}
