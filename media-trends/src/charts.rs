//! PNG chart rendering.
//!
//! Two images are produced from a [`TrendReport`]: a 3×3 dashboard of bar,
//! horizontal bar and pie panels, and a pair of correlation heatmaps. Both use
//! the bitmap backend so rendering works headless. Panels with no data are
//! drawn with their caption and empty axes.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::analyzers::{CorrelationMatrix, GroupedMean, ValueCounts};
use crate::config::OutputConfig;
use crate::error::{Result, TrendsError};
use crate::report::TrendReport;

pub const DASHBOARD_SIZE: (u32, u32) = (2000, 1200);
pub const HEATMAP_SIZE: (u32, u32) = (1600, 600);

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const CORAL: RGBColor = RGBColor(255, 127, 80);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const GOLD: RGBColor = RGBColor(255, 215, 0);
const MEDIUM_PURPLE: RGBColor = RGBColor(147, 112, 219);
const SALMON: RGBColor = RGBColor(250, 128, 114);
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const MISSING: RGBColor = RGBColor(220, 220, 220);

const CONTENT_PALETTE: [RGBColor; 4] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x66, 0xb3, 0xff),
    RGBColor(0x99, 0xff, 0x99),
    RGBColor(0xff, 0xcc, 0x99),
];
const SUBSCRIPTION_PALETTE: [RGBColor; 3] = [
    RGBColor(0xc2, 0xc2, 0xf0),
    RGBColor(0xff, 0xb3, 0xe6),
    RGBColor(0xc2, 0xf0, 0xc2),
];

/// Labels and values of one chart panel, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl From<&ValueCounts> for Series {
    fn from(counts: &ValueCounts) -> Self {
        Self {
            labels: counts.entries.iter().map(|e| e.label.clone()).collect(),
            values: counts.entries.iter().map(|e| e.count as f64).collect(),
        }
    }
}

impl From<&GroupedMean> for Series {
    fn from(means: &GroupedMean) -> Self {
        Self {
            labels: means.groups.iter().map(|g| g.label.clone()).collect(),
            values: means.groups.iter().map(|g| g.mean).collect(),
        }
    }
}

/// Renders the dashboard and the heatmaps into the configured directory and
/// returns the paths written.
pub fn render_all(report: &TrendReport, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    let dashboard = output.dashboard_path();
    let heatmaps = output.heatmap_path();
    render_dashboard(report, &dashboard)?;
    render_heatmaps(report, &heatmaps)?;
    Ok(vec![dashboard, heatmaps])
}

/// Draws the nine trend panels to `path`.
#[instrument(skip(report))]
pub fn render_dashboard(report: &TrendReport, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let panels = root.split_evenly((3, 3));

    let streaming = &report.streaming;
    let social = &report.social;

    draw_bars(
        &panels[0],
        "OTT Platform Usage Distribution",
        &Series::from(&streaming.platform_popularity),
        ("Platform", "Number of Users"),
        SKY_BLUE,
    )?;
    draw_horizontal_bars(
        &panels[1],
        "Average Watch Time by Platform",
        &Series::from(&streaming.watch_time_by_platform),
        "Hours",
        CORAL,
    )?;
    draw_pie(
        &panels[2],
        "Content Type Distribution",
        &Series::from(&streaming.content_type_preference),
        &CONTENT_PALETTE,
    )?;
    draw_bars(
        &panels[3],
        "Social Media Platform Usage",
        &Series::from(&social.platform_popularity),
        ("Platform", "Number of Users"),
        LIGHT_GREEN,
    )?;
    draw_horizontal_bars(
        &panels[4],
        "Avg Time Spent (Social Media)",
        &Series::from(&social.time_spent_by_platform),
        "Minutes",
        GOLD,
    )?;
    draw_pie(
        &panels[5],
        "Subscription Type Distribution",
        &Series::from(&streaming.subscription_distribution),
        &SUBSCRIPTION_PALETTE,
    )?;
    draw_bars(
        &panels[6],
        "OTT Watch Time by Age Group",
        &Series::from(&report.age.watch_time_by_age),
        ("Age Group", "Average Hours"),
        MEDIUM_PURPLE,
    )?;
    draw_bars(
        &panels[7],
        "Social Media Time by Age Group",
        &Series::from(&report.age.time_spent_by_age),
        ("Age Group", "Average Minutes"),
        SALMON,
    )?;
    draw_horizontal_bars(
        &panels[8],
        "Average Ratings by Genre",
        &Series::from(&report.advanced.genre_ratings),
        "Rating",
        STEEL_BLUE,
    )?;

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), "saved dashboard");
    Ok(())
}

/// Draws the usage and engagement correlation heatmaps side by side.
#[instrument(skip(report))]
pub fn render_heatmaps(report: &TrendReport, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let (left, right) = root.split_horizontally(HEATMAP_SIZE.0 / 2);

    draw_heatmap(
        &left,
        "OTT Platform Correlations",
        &report.correlations.usage,
        diverging_color,
    )?;
    draw_heatmap(
        &right,
        "Social Media Correlations",
        &report.correlations.engagement,
        sequential_color,
    )?;

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), "saved correlation heatmaps");
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &Series,
    (x_desc, y_desc): (&str, &str),
    color: RGBColor,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(category_range(series.len()), 0.0..axis_max(&series.values))
        .map_err(chart_error)?;

    let labels = &series.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(series.len().max(1))
        .x_label_formatter(&|x| category_label(labels, *x))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(series.values.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v)], color.filled())
        }))
        .map_err(chart_error)?;
    chart
        .draw_series(series.values.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v)], BLACK.stroke_width(1))
        }))
        .map_err(chart_error)?;
    Ok(())
}

/// First entry of the series is drawn at the top.
fn draw_horizontal_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &Series,
    x_desc: &str,
    color: RGBColor,
) -> Result<()> {
    let n = series.len();
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d(0.0..axis_max(&series.values), category_range(n))
        .map_err(chart_error)?;

    let labels: Vec<String> = series.labels.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n.max(1))
        .y_label_formatter(&|y| category_label(&labels, *y))
        .x_desc(x_desc)
        .draw()
        .map_err(chart_error)?;

    let bars = |style: ShapeStyle| {
        series.values.iter().enumerate().map(move |(i, v)| {
            let y = (n - 1 - i) as f64;
            Rectangle::new([(0.0, y - 0.4), (*v, y + 0.4)], style)
        })
    };
    chart.draw_series(bars(color.filled())).map_err(chart_error)?;
    chart.draw_series(bars(BLACK.stroke_width(1))).map_err(chart_error)?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    series: &Series,
    palette: &[RGBColor],
) -> Result<()> {
    let inner = area.titled(title, ("sans-serif", 22)).map_err(chart_error)?;
    if series.is_empty() || series.total() <= 0.0 {
        return Ok(());
    }

    let (width, height) = inner.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.35;
    let colors = cycle_palette(palette, series.len());

    let mut pie = Pie::new(
        &center,
        &radius,
        &series.values[..],
        &colors[..],
        &series.labels[..],
    );
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    inner.draw(&pie).map_err(chart_error)?;
    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    matrix: &CorrelationMatrix,
    palette: fn(f64) -> RGBColor,
) -> Result<()> {
    let n = matrix.len();
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 26))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(category_range(n), category_range(n))
        .map_err(chart_error)?;

    let columns = &matrix.columns;
    let rows: Vec<String> = columns.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n.max(1))
        .y_labels(n.max(1))
        .x_label_formatter(&|x| category_label(columns, *x))
        .y_label_formatter(&|y| category_label(&rows, *y))
        .draw()
        .map_err(chart_error)?;

    let cells: Vec<(f64, f64, Option<f64>)> = matrix
        .coefficients
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, value)| (j as f64, (n - 1 - i) as f64, *value))
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|(x, y, value)| {
            let color = value.map_or(MISSING, palette);
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color.filled())
        }))
        .map_err(chart_error)?;

    let annotation = TextStyle::from(("sans-serif", 20).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(cells.iter().map(|(x, y, value)| {
            let text = value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
            Text::new(text, (*x, *y), annotation.clone())
        }))
        .map_err(chart_error)?;
    Ok(())
}

fn chart_error<E: std::fmt::Display>(err: E) -> TrendsError {
    TrendsError::Chart(err.to_string())
}

/// Axis span centring `n` categories on the integers `0..n`.
fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Label for an axis tick; empty between categories.
pub fn category_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Upper bound of a value axis with 10% headroom; 1.0 for empty or
/// non-positive data.
pub fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn cycle_palette(palette: &[RGBColor], n: usize) -> Vec<RGBColor> {
    if palette.is_empty() {
        return vec![STEEL_BLUE; n];
    }
    palette.iter().copied().cycle().take(n).collect()
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Blue to white to red over `[-1, 1]`.
pub fn diverging_color(r: f64) -> RGBColor {
    const BLUE_END: RGBColor = RGBColor(59, 76, 192);
    const CENTRE: RGBColor = RGBColor(242, 242, 242);
    const RED_END: RGBColor = RGBColor(180, 4, 38);
    if r < 0.0 {
        lerp(CENTRE, BLUE_END, -r)
    } else {
        lerp(CENTRE, RED_END, r)
    }
}

/// Purple through teal to yellow over `[-1, 1]`.
pub fn sequential_color(r: f64) -> RGBColor {
    const LOW: RGBColor = RGBColor(68, 1, 84);
    const MID: RGBColor = RGBColor(33, 145, 140);
    const HIGH: RGBColor = RGBColor(253, 231, 37);
    let t = (r.clamp(-1.0, 1.0) + 1.0) / 2.0;
    if t < 0.5 {
        lerp(LOW, MID, t * 2.0)
    } else {
        lerp(MID, HIGH, (t - 0.5) * 2.0)
    }
}
