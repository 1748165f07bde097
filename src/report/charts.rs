//! Chart specifications and SVG export
//!
//! Building a chart is pure: analysis results go in, a serializable
//! `ChartSpec` comes out. Rendering and writing files is a separate step.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{ApplicationAnalysis, BoxSummary, PivotTable};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 60.0;

/// Qualitative colors for pie slices and density curves
const SERIES_COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palette {
    /// Diverging red-yellow-green over [-1, 1]
    RdYlGn,
    /// Sequential blue-purple over the data range
    BuPu,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DensitySeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie {
        title: String,
        slices: Vec<PieSlice>,
    },
    BoxPlot {
        title: String,
        summary: BoxSummary,
    },
    Density {
        title: String,
        x_label: String,
        series: Vec<DensitySeries>,
    },
    Heatmap {
        title: String,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
        palette: Palette,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Pie { title, .. }
            | ChartSpec::BoxPlot { title, .. }
            | ChartSpec::Density { title, .. }
            | ChartSpec::Heatmap { title, .. } => title,
        }
    }

    /// File-name friendly version of the title
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.title().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_matches('_').to_string()
    }
}

/// Charts in display order: pies, boxplots, density, correlation, pivot.
pub fn build_charts(analysis: &ApplicationAnalysis, pivot: Option<&PivotTable>) -> Vec<ChartSpec> {
    let mut charts = Vec::new();

    for name in &analysis.pie_columns {
        if let Some(dist) = analysis.distributions.iter().find(|d| &d.column == name) {
            charts.push(ChartSpec::Pie {
                title: name.clone(),
                slices: dist
                    .shares
                    .iter()
                    .map(|s| PieSlice {
                        label: s.category.clone(),
                        percent: s.percent,
                    })
                    .collect(),
            });
        }
    }

    for summary in &analysis.boxplots {
        charts.push(ChartSpec::BoxPlot {
            title: format!("Boxplot for {}", summary.column),
            summary: summary.clone(),
        });
    }

    if let Some(density) = &analysis.density {
        charts.push(ChartSpec::Density {
            title: format!("Density Plot of {} by {}", density.column, density.target_column),
            x_label: density.column.clone(),
            series: density
                .curves
                .iter()
                .map(|c| DensitySeries {
                    label: format!("{} {}", density.target_column, c.target),
                    points: c.points.clone(),
                })
                .collect(),
        });
    }

    if let Some(corr) = &analysis.correlation {
        charts.push(ChartSpec::Heatmap {
            title: "Correlation Heatmap".to_string(),
            row_labels: corr.columns.clone(),
            col_labels: corr.columns.clone(),
            cells: corr.values.clone(),
            palette: Palette::RdYlGn,
        });
    }

    if let Some(pivot) = pivot {
        charts.push(ChartSpec::Heatmap {
            title: "Pivot Table Heatmap".to_string(),
            row_labels: pivot.rows.iter().map(|r| r.keys.join(" / ")).collect(),
            col_labels: pivot
                .column_keys
                .iter()
                .map(|k| format!("{}={}", pivot.column_name, k))
                .collect(),
            cells: pivot.rows.iter().map(|r| r.values.clone()).collect(),
            palette: Palette::BuPu,
        });
    }

    charts
}

/// Write every chart as `NN_<slug>.svg` plus `charts.json` into `dir`.
pub fn export_charts(charts: &[ChartSpec], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create chart directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(charts.len());
    for (i, chart) in charts.iter().enumerate() {
        let path = dir.join(format!("{:02}_{}.svg", i + 1, chart.slug()));
        std::fs::write(&path, render_svg(chart))
            .with_context(|| format!("Failed to write chart: {}", path.display()))?;
        written.push(path);
    }

    let json = serde_json::to_string_pretty(charts).context("Failed to serialize chart specs")?;
    let spec_path = dir.join("charts.json");
    std::fs::write(&spec_path, json)
        .with_context(|| format!("Failed to write chart specs to {}", spec_path.display()))?;

    Ok(written)
}

/// Render a chart as a standalone SVG document.
pub fn render_svg(chart: &ChartSpec) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" font-size="18" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(chart.title())
    );

    match chart {
        ChartSpec::Pie { slices, .. } => render_pie(&mut svg, slices),
        ChartSpec::BoxPlot { summary, .. } => render_box(&mut svg, summary),
        ChartSpec::Density { x_label, series, .. } => render_density(&mut svg, x_label, series),
        ChartSpec::Heatmap {
            row_labels,
            col_labels,
            cells,
            palette,
            ..
        } => render_heatmap(&mut svg, row_labels, col_labels, cells, *palette),
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_pie(svg: &mut String, slices: &[PieSlice]) {
    let (cx, cy, r) = (WIDTH / 2.0 - 80.0, HEIGHT / 2.0 + 15.0, 160.0);
    let total: f64 = slices.iter().map(|s| s.percent).sum();
    if total <= 0.0 {
        return;
    }

    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (i, slice) in slices.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let sweep = slice.percent / total * std::f64::consts::TAU;
        if sweep >= std::f64::consts::TAU - 1e-9 {
            let _ = writeln!(svg, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r}" fill="{color}"/>"#);
        } else {
            let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                r#"<path d="M{cx:.2},{cy:.2} L{x0:.2},{y0:.2} A{r},{r} 0 {large} 1 {x1:.2},{y1:.2} Z" fill="{color}" stroke="white"/>"#
            );
        }
        let ly = 70.0 + i as f64 * 20.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="12" height="12" fill="{color}"/><text x="{}" y="{}" font-size="12">{} ({:.2}%)</text>"#,
            WIDTH - 200.0,
            ly - 10.0,
            WIDTH - 182.0,
            ly,
            escape(&slice.label),
            slice.percent
        );
        angle += sweep;
    }
}

fn render_box(svg: &mut String, s: &BoxSummary) {
    let lo = s.min;
    let hi = s.max;
    let span = if hi > lo { hi - lo } else { 1.0 };
    let x = |v: f64| MARGIN + (v - lo) / span * (WIDTH - 2.0 * MARGIN);
    let mid = HEIGHT / 2.0;

    let _ = writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{mid}" x2="{:.2}" y2="{mid}" stroke="black"/>"#,
        x(s.lower_whisker),
        x(s.q1)
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{mid}" x2="{:.2}" y2="{mid}" stroke="black"/>"#,
        x(s.q3),
        x(s.upper_whisker)
    );
    let _ = writeln!(
        svg,
        r##"<rect x="{:.2}" y="{}" width="{:.2}" height="80" fill="#8fb8de" stroke="black"/>"##,
        x(s.q1),
        mid - 40.0,
        (x(s.q3) - x(s.q1)).max(1.0)
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{m:.2}" y1="{}" x2="{m:.2}" y2="{}" stroke="black" stroke-width="2"/>"#,
        mid - 40.0,
        mid + 40.0,
        m = x(s.median)
    );
    for v in [s.lower_whisker, s.upper_whisker] {
        let _ = writeln!(
            svg,
            r#"<line x1="{p:.2}" y1="{}" x2="{p:.2}" y2="{}" stroke="black"/>"#,
            mid - 20.0,
            mid + 20.0,
            p = x(v)
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-size="12">n={} outliers={} min={:.2} max={:.2}</text>"#,
        MARGIN,
        HEIGHT - 30.0,
        s.count,
        s.outliers,
        s.min,
        s.max
    );
}

fn render_density(svg: &mut String, x_label: &str, series: &[DensitySeries]) {
    let all = series.iter().flat_map(|s| s.points.iter());
    let (mut x_min, mut x_max, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY, 0.0f64);
    for &(x, y) in all {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() || x_max <= x_min || y_max <= 0.0 {
        return;
    }

    let px = |x: f64| MARGIN + (x - x_min) / (x_max - x_min) * (WIDTH - 2.0 * MARGIN);
    let py = |y: f64| HEIGHT - MARGIN - y / y_max * (HEIGHT - 2.0 * MARGIN);

    let _ = writeln!(
        svg,
        r#"<line x1="{m}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/><line x1="{m}" y1="{m}" x2="{m}" y2="{b}" stroke="black"/>"#,
        m = MARGIN,
        b = HEIGHT - MARGIN,
        r = WIDTH - MARGIN
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-size="12" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        HEIGHT - 20.0,
        escape(x_label)
    );

    for (i, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let points: Vec<String> = s
            .points
            .iter()
            .map(|&(x, y)| format!("{:.2},{:.2}", px(x), py(y)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
            points.join(" ")
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="12" fill="{color}">{}</text>"#,
            WIDTH - MARGIN - 100.0,
            MARGIN + 20.0 * i as f64,
            escape(&s.label)
        );
    }
}

fn render_heatmap(
    svg: &mut String,
    row_labels: &[String],
    col_labels: &[String],
    cells: &[Vec<Option<f64>>],
    palette: Palette,
) {
    if row_labels.is_empty() || col_labels.is_empty() {
        return;
    }
    let left = 220.0;
    let top = 70.0;
    let cell_w = (WIDTH - left - 20.0) / col_labels.len() as f64;
    let cell_h = (HEIGHT - top - 20.0) / row_labels.len() as f64;

    let observed: Vec<f64> = cells.iter().flatten().flatten().copied().collect();
    let (lo, hi) = match palette {
        Palette::RdYlGn => (-1.0, 1.0),
        Palette::BuPu => observed
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    };

    for (j, label) in col_labels.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" font-size="11" text-anchor="middle">{}</text>"#,
            left + cell_w * (j as f64 + 0.5),
            top - 8.0,
            escape(label)
        );
    }

    for (i, label) in row_labels.iter().enumerate() {
        let y = top + cell_h * i as f64;
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" font-size="11" text-anchor="end">{}</text>"#,
            left - 6.0,
            y + cell_h / 2.0 + 4.0,
            escape(label)
        );
        for j in 0..col_labels.len() {
            let value = cells.get(i).and_then(|row| row.get(j)).copied().flatten();
            let x = left + cell_w * j as f64;
            let fill = value.map_or("#dddddd".to_string(), |v| palette_color(palette, v, lo, hi));
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{cell_w:.2}" height="{cell_h:.2}" fill="{fill}" stroke="white"/>"#
            );
            if let Some(v) = value {
                let _ = writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}" font-size="11" text-anchor="middle">{}</text>"#,
                    x + cell_w / 2.0,
                    y + cell_h / 2.0 + 4.0,
                    format_annotation(v)
                );
            }
        }
    }
}

fn format_annotation(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.3e}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Hex color for `v` scaled into `[lo, hi]`
pub fn palette_color(palette: Palette, v: f64, lo: f64, hi: f64) -> String {
    let t = if hi > lo { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.5 };
    let stops: &[(u8, u8, u8)] = match palette {
        Palette::RdYlGn => &[(0xd7, 0x30, 0x27), (0xff, 0xff, 0xbf), (0x1a, 0x98, 0x50)],
        Palette::BuPu => &[(0xed, 0xf8, 0xfb), (0x8c, 0x96, 0xc6), (0x81, 0x0f, 0x7c)],
    };
    let scaled = t * (stops.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(stops.len() - 2);
    let f = scaled - i as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    let (a, b) = (stops[i], stops[i + 1]);
    format!("#{:02x}{:02x}{:02x}", lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_collapses_separators() {
        let chart = ChartSpec::Pie {
            title: "Density Plot of AMT_GOODS_PRICE by TARGET".to_string(),
            slices: Vec::new(),
        };
        assert_eq!(chart.slug(), "density_plot_of_amt_goods_price_by_target");
    }

    #[test]
    fn test_palette_endpoints() {
        assert_eq!(palette_color(Palette::RdYlGn, -1.0, -1.0, 1.0), "#d73027");
        assert_eq!(palette_color(Palette::RdYlGn, 1.0, -1.0, 1.0), "#1a9850");
        assert_eq!(palette_color(Palette::RdYlGn, 0.0, -1.0, 1.0), "#ffffbf");
        assert_eq!(palette_color(Palette::BuPu, 5.0, 5.0, 5.0), "#8c96c6");
    }

    #[test]
    fn test_svg_escapes_labels() {
        let chart = ChartSpec::Pie {
            title: "A & B".to_string(),
            slices: vec![PieSlice {
                label: "<x>".to_string(),
                percent: 100.0,
            }],
        };
        let svg = render_svg(&chart);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("&lt;x&gt;"));
        assert!(svg.contains("<circle"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
