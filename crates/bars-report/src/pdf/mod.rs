//! The "Biologic Response Report" PDF.
//!
//! Layout: title, generation timestamp, privacy note and disclaimer, then the
//! capped summary table, then every chart with its captions, then an optional
//! feedback link. The report only lays out data it is given; it performs no
//! scoring.

mod layout;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use bars_model::{ClinicalDomain, Measurement, PATIENT_ID_COLUMN, ScoredRecord, TREATMENT_COLUMN, Timepoint};

use crate::charts::RenderedChart;
use crate::export::RESPONSE_SCORE_COLUMN;

pub use layout::{CONTENT_WIDTH, Font, PageWriter};

pub const DEFAULT_TITLE: &str = "Biologic Response Report";
pub const DEFAULT_MAX_ROWS: usize = 60;
pub const PRIVACY_NOTE: &str = "We do not store your data. Generated locally for this run.";
pub const DISCLAIMER: &str =
    "For research and exploratory purposes only, not for clinical decision-making.";
pub const MISSING_TEXT: &str = "NA";

const TABLE_FONT_SIZE: f32 = 7.0;
const TABLE_WIDTHS: [f32; 9] = [60.0, 70.0, 40.0, 40.0, 40.0, 40.0, 60.0, 60.0, 65.0];

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Maximum number of patient rows in the summary table.
    pub max_rows: usize,
    pub feedback_url: Option<String>,
    /// Timestamp printed under the title (`%Y-%m-%d %H:%M`).
    pub generated_at: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            feedback_url: None,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Formats a number without trailing zeros after the decimal point.
pub fn format_numeric(value: f64) -> String {
    let text = format!("{value}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

fn format_measurement(value: Measurement) -> String {
    value
        .value()
        .map_or_else(|| MISSING_TEXT.to_string(), format_numeric)
}

/// Summary table rows, capped at a maximum, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
}

impl SummaryTable {
    pub fn build(rows: &[ScoredRecord], max_rows: usize) -> Self {
        let mut header = vec![PATIENT_ID_COLUMN.to_string(), TREATMENT_COLUMN.to_string()];
        for domain in ClinicalDomain::ALL {
            for timepoint in Timepoint::ALL {
                header.push(domain.column(timepoint).to_string());
            }
        }
        header.push(RESPONSE_SCORE_COLUMN.to_string());

        let table_rows = rows
            .iter()
            .take(max_rows)
            .map(|row| {
                let mut cells = vec![
                    row.patient_id().to_string(),
                    row.treatment().unwrap_or(MISSING_TEXT).to_string(),
                ];
                for domain in ClinicalDomain::ALL {
                    for timepoint in Timepoint::ALL {
                        cells.push(format_measurement(row.record.measurement(domain, timepoint)));
                    }
                }
                cells.push(
                    row.response_score
                        .map_or_else(|| MISSING_TEXT.to_string(), |grade| grade.to_string()),
                );
                cells
            })
            .collect();

        Self {
            header,
            rows: table_rows,
            total: rows.len(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total
    }

    pub fn truncation_note(&self) -> Option<String> {
        self.is_truncated().then(|| {
            format!(
                "Showing the first {} of {} patients.",
                self.rows.len(),
                self.total
            )
        })
    }
}

/// Lays out the complete report.
pub fn build_report(
    rows: &[ScoredRecord],
    charts: &[RenderedChart],
    options: &ReportOptions,
) -> Result<lopdf::Document> {
    let mut writer = PageWriter::new();
    writer.line(Font::Bold, 20.0, &options.title)?;
    writer.space(4.0);
    writer.line(Font::Regular, 10.0, &options.generated_at)?;
    writer.space(6.0);
    writer.paragraph(Font::Italic, 10.0, PRIVACY_NOTE)?;
    writer.paragraph(Font::Italic, 10.0, DISCLAIMER)?;
    writer.space(10.0);

    let table = SummaryTable::build(rows, options.max_rows);
    writer.table(&table.header, &table.rows, &TABLE_WIDTHS, TABLE_FONT_SIZE)?;
    if let Some(note) = table.truncation_note() {
        writer.space(4.0);
        writer.line(Font::Italic, 9.0, &note)?;
    }

    if !charts.is_empty() {
        writer.space(12.0);
        writer.line(Font::Bold, 14.0, "Charts")?;
        for chart in charts {
            writer.space(8.0);
            writer.image(&chart.image, CONTENT_WIDTH)?;
            for caption in &chart.captions {
                writer.paragraph(Font::Regular, 8.0, caption)?;
            }
        }
    }

    if let Some(url) = &options.feedback_url {
        writer.space(12.0);
        writer.paragraph(Font::Regular, 10.0, &format!("Feedback form: {url}"))?;
    }

    tracing::debug!(
        pages = writer.page_count(),
        table_rows = table.rows.len(),
        charts = charts.len(),
        "laid out report"
    );
    writer.finish(&options.title)
}

/// Builds the report and writes it to `path`.
pub fn write_report(
    path: &Path,
    rows: &[ScoredRecord],
    charts: &[RenderedChart],
    options: &ReportOptions,
) -> Result<()> {
    let mut document = build_report(rows, charts, options)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    document
        .save_to(&mut out)
        .with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
