//! Chart data and raster rendering.
//!
//! Each chart is computed as plain data first ([`histogram`], [`boxplot`],
//! [`slope`]) and then drawn onto a [`canvas::Canvas`]. Text such as titles,
//! legends and slope labels is carried as captions next to the image; the PDF
//! report prints them under each chart.

pub mod boxplot;
pub mod canvas;
pub mod histogram;
pub mod slope;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};

use bars_model::{ClinicalDomain, GroupSummary, ScoredRecord, Timepoint};

use boxplot::{BoxStats, domain_boxes};
use canvas::{AXIS, Canvas, DODGER_BLUE, GREEN, GRID, LIME_GREEN, RED};
use histogram::{DEFAULT_BINS, Histogram, histogram};
use slope::{SlopeChart, Trend, X_BASELINE, X_FOLLOW_UP, X_RANGE, slope_chart};

/// Raster size and binning of rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

/// A rendered chart ready to be written as PNG or embedded in the report.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub file_name: String,
    pub title: String,
    pub captions: Vec<String>,
    pub image: RgbImage,
}

fn timepoint_color(timepoint: Timepoint) -> image::Rgb<u8> {
    match timepoint {
        Timepoint::Baseline => DODGER_BLUE,
        Timepoint::FollowUp => LIME_GREEN,
    }
}

/// File name of the slope chart for a domain.
pub fn slope_file_name(domain: ClinicalDomain) -> &'static str {
    match domain {
        ClinicalDomain::Act => "act.png",
        ClinicalDomain::Ocs => "ocs.png",
        ClinicalDomain::Exacerbation => "exa.png",
    }
}

pub fn render_histogram(data: &Histogram, options: &ChartOptions) -> RenderedChart {
    let prefix = data.domain.prefix();
    let y_max = (data.max_count() as f64 * 1.1).max(1.0);
    let x_range = match (data.edges.first(), data.edges.last()) {
        (Some(low), Some(high)) => (*low, *high),
        _ => (0.0, 1.0),
    };
    let mut canvas = Canvas::new(options.width, options.height, x_range, (0.0, y_max));

    for (idx, pair) in data.edges.windows(2).enumerate() {
        let (start, width) = (pair[0], pair[1] - pair[0]);
        let series = [(&data.baseline, 0.05, 0.5), (&data.follow_up, 0.5, 0.95)];
        for ((counts, from, to), timepoint) in series.into_iter().zip(Timepoint::ALL) {
            let count = counts.get(idx).copied().unwrap_or(0);
            if count > 0 {
                canvas.fill(
                    start + width * from,
                    0.0,
                    start + width * to,
                    count as f64,
                    timepoint_color(timepoint),
                );
            }
        }
    }
    canvas.axes();

    let title = format!("{prefix} Distribution");
    let mut captions = vec![
        title.clone(),
        format!("Legend: {prefix}.BL (dodger blue), {prefix}.FU (lime green)"),
        "x: Value, y: Frequency".to_string(),
    ];
    if data.is_empty() {
        captions.push("No values".to_string());
    }
    RenderedChart {
        file_name: format!("{prefix}_dist.png"),
        title,
        captions,
        image: canvas.into_image(),
    }
}

fn draw_box(canvas: &mut Canvas, center: f64, stats: &BoxStats, color: image::Rgb<u8>) {
    let half = 0.25;
    canvas.line((center, stats.lower_whisker), (center, stats.q1), 1, AXIS);
    canvas.line((center, stats.q3), (center, stats.upper_whisker), 1, AXIS);
    for cap in [stats.lower_whisker, stats.upper_whisker] {
        canvas.line((center - half / 2.0, cap), (center + half / 2.0, cap), 1, AXIS);
    }
    canvas.fill(center - half, stats.q1, center + half, stats.q3, color);
    canvas.outline(center - half, stats.q1, center + half, stats.q3, AXIS);
    canvas.line((center - half, stats.median), (center + half, stats.median), 2, AXIS);
    for outlier in &stats.outliers {
        canvas.dot(center, *outlier, 3, AXIS);
    }
}

pub fn render_boxplot(
    domain: ClinicalDomain,
    boxes: &[(Timepoint, Option<BoxStats>)],
    options: &ChartOptions,
) -> RenderedChart {
    let prefix = domain.prefix();
    let extent = boxes
        .iter()
        .filter_map(|(_, stats)| stats.as_ref().map(BoxStats::extent))
        .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
    let y_range = extent.map_or((0.0, 1.0), |(low, high)| {
        let pad = ((high - low) * 0.05).max(0.5);
        (low - pad, high + pad)
    });
    let mut canvas = Canvas::new(options.width, options.height, (0.0, 3.0), y_range);

    for (position, (timepoint, stats)) in boxes.iter().enumerate() {
        if let Some(stats) = stats {
            draw_box(&mut canvas, position as f64 + 1.0, stats, timepoint_color(*timepoint));
        }
    }
    canvas.axes();

    let title = format!("{prefix} Box Plot");
    let mut captions = vec![title.clone(), "x: Time (BL, FU), y: Value".to_string()];
    for (timepoint, stats) in boxes {
        let line = match stats {
            Some(stats) => format!(
                "{}: n={}, median {:.2}, IQR {:.2}-{:.2}, outliers {}",
                timepoint.suffix(),
                stats.count,
                stats.median,
                stats.q1,
                stats.q3,
                stats.outliers.len()
            ),
            None => format!("{}: no values", timepoint.suffix()),
        };
        captions.push(line);
    }
    RenderedChart {
        file_name: format!("{prefix}_boxplot.png"),
        title,
        captions,
        image: canvas.into_image(),
    }
}

pub fn render_slope(chart: &SlopeChart, options: &ChartOptions) -> RenderedChart {
    let mut canvas = Canvas::new(options.width, options.height, X_RANGE, (chart.y_min, chart.y_max));
    canvas.dotted_vertical(X_BASELINE, GRID);
    canvas.dotted_vertical(X_FOLLOW_UP, GRID);

    for line in &chart.lines {
        let color = match line.trend() {
            Trend::Up => GREEN,
            Trend::Down => RED,
        };
        canvas.line((X_BASELINE, line.before), (X_FOLLOW_UP, line.after), 2, color);
        canvas.dot(X_BASELINE, line.before, 4, color);
        canvas.dot(X_FOLLOW_UP, line.after, 4, color);
    }

    let [left, right] = chart.tick_labels();
    let mut captions = vec![chart.title.clone(), format!("x: {left} | {right}")];
    captions.extend(
        chart
            .lines
            .iter()
            .map(|line| format!("{} -> {}", line.left_label(), line.right_label())),
    );
    RenderedChart {
        file_name: slope_file_name(chart.domain).to_string(),
        title: chart.title.clone(),
        captions,
        image: canvas.into_image(),
    }
}

/// Renders the full chart set in report order: slope charts (ACT, OCS,
/// exacerbations), then distributions, then box plots.
pub fn render_charts(
    rows: &[ScoredRecord],
    summaries: &[GroupSummary],
    options: &ChartOptions,
) -> Vec<RenderedChart> {
    let mut charts = Vec::new();
    for domain in [ClinicalDomain::Act, ClinicalDomain::Ocs, ClinicalDomain::Exacerbation] {
        if let Some(summary) = summaries.iter().find(|summary| summary.domain == domain) {
            charts.push(render_slope(&slope_chart(summary), options));
        }
    }
    for domain in ClinicalDomain::ALL {
        charts.push(render_histogram(&histogram(rows, domain, options.histogram_bins), options));
    }
    for domain in ClinicalDomain::ALL {
        charts.push(render_boxplot(domain, &domain_boxes(rows, domain), options));
    }
    tracing::debug!(charts = charts.len(), "rendered charts");
    charts
}

/// Writes every chart as PNG into `dir`.
pub fn write_charts(dir: &Path, charts: &[RenderedChart]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut outputs = Vec::with_capacity(charts.len());
    for chart in charts {
        let path = dir.join(&chart.file_name);
        chart
            .image
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("write chart {}", path.display()))?;
        outputs.push(path);
    }
    Ok(outputs)
}
