//! The `score` pipeline: ingest, score, summarise, export.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use bars_ingest::{
    IngestOptions, PatientTable, read_patient_table, read_patient_table_from_reader,
};
use bars_model::{ClinicalDomain, GroupSummary, ScoredRecord};
use bars_report::{
    ChartOptions, GROUP_MEANS_CSV, LONG_FORM_CSV, REPORT_PDF, ReportOptions, SCORED_CSV,
    SCORED_JSON, group_means_frame, long_form_frame, render_charts, scored_frame, write_charts,
    write_csv, write_json, write_report,
};
use bars_scoring::{
    ResponseDistribution, ScoredTable, ScoringOptions, group_summaries, score_table_with,
};

use crate::config::OutputFormat;
use crate::logging::{log_data_enabled, redact_value};

/// Chart PNGs are written to this subdirectory of the output directory.
pub const CHARTS_DIR: &str = "charts";

/// Where the patient table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` reads standard input.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
        }
    }

    /// Default output directory: `output` next to the input file, or in the
    /// working directory for standard input.
    pub fn default_output_dir(&self) -> PathBuf {
        match self {
            Self::File(path) => path
                .parent()
                .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output")),
            Self::Stdin => PathBuf::from("output"),
        }
    }
}

/// Fully resolved settings of one `score` run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: InputSource,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub ingest: IngestOptions,
    pub charts: Option<ChartOptions>,
    pub report: Option<ReportOptions>,
    /// Score and summarise without writing anything.
    pub dry_run: bool,
}

impl RunSettings {
    pub fn new(input: InputSource) -> Self {
        let output_dir = input.default_output_dir();
        Self {
            input,
            output_dir,
            format: OutputFormat::default(),
            ingest: IngestOptions::default(),
            charts: Some(ChartOptions::default()),
            report: Some(ReportOptions::default()),
            dry_run: false,
        }
    }
}

/// Everything the terminal summary needs.
#[derive(Debug)]
pub struct RunResult {
    pub input: String,
    pub output_dir: PathBuf,
    pub rows: Vec<ScoredRecord>,
    pub distribution: ResponseDistribution,
    /// Undefined grades per domain, in domain order.
    pub undefined: Vec<(ClinicalDomain, usize)>,
    pub summaries: Vec<GroupSummary>,
    /// Non-empty cells that could not be read as numbers, per column.
    pub coerced: BTreeMap<String, usize>,
    pub outputs: Vec<PathBuf>,
    pub dry_run: bool,
}

pub fn ingest(source: &InputSource, options: &IngestOptions) -> Result<PatientTable> {
    let table = match source {
        InputSource::File(path) => read_patient_table(path, options)?,
        InputSource::Stdin => read_patient_table_from_reader(io::stdin().lock(), options)?,
    };
    Ok(table)
}

/// Warns once per patient identifier that occurs more than once. Duplicates
/// are kept and scored as separate rows.
pub fn warn_duplicate_ids(table: &PatientTable) -> usize {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &table.records {
        *seen.entry(record.patient_id.as_str()).or_default() += 1;
    }
    let mut duplicates = 0;
    for (id, count) in seen.into_iter().filter(|(_, count)| *count > 1) {
        warn!(patient_id = redact_value(id), count, "duplicate patient identifier");
        duplicates += 1;
    }
    duplicates
}

pub fn score(table: &PatientTable) -> ScoredTable {
    score_table_with(
        &table.records,
        ScoringOptions {
            log_data: log_data_enabled(),
        },
    )
}

/// Writes the tabular exports, chart PNGs and the PDF report.
pub fn export(
    settings: &RunSettings,
    rows: &[ScoredRecord],
    summaries: &[GroupSummary],
) -> Result<Vec<PathBuf>> {
    let dir = &settings.output_dir;
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut outputs = Vec::new();

    if settings.format.csv() {
        let scored_path = dir.join(SCORED_CSV);
        let mut scored = scored_frame(rows).context("build scored table")?;
        write_csv(&mut scored, &scored_path)?;
        outputs.push(scored_path);

        let long_path = dir.join(LONG_FORM_CSV);
        let mut long = long_form_frame(rows).context("build long-form table")?;
        write_csv(&mut long, &long_path)?;
        outputs.push(long_path);

        let means_path = dir.join(GROUP_MEANS_CSV);
        let mut means = group_means_frame(summaries).context("build group means table")?;
        write_csv(&mut means, &means_path)?;
        outputs.push(means_path);
    }
    if settings.format.json() {
        let json_path = dir.join(SCORED_JSON);
        write_json(rows, &json_path)?;
        outputs.push(json_path);
    }

    let charts = settings
        .charts
        .as_ref()
        .map(|options| render_charts(rows, summaries, options))
        .unwrap_or_default();
    if !charts.is_empty() {
        outputs.extend(write_charts(&dir.join(CHARTS_DIR), &charts)?);
    }
    if let Some(report) = &settings.report {
        let pdf_path = dir.join(REPORT_PDF);
        write_report(&pdf_path, rows, &charts, report)?;
        outputs.push(pdf_path);
    }
    Ok(outputs)
}

/// Runs the whole pipeline.
pub fn run(settings: &RunSettings) -> Result<RunResult> {
    let input = settings.input.label();
    let run_span = info_span!("run", input = %input);
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let ingest_start = Instant::now();
    let table = info_span!("ingest").in_scope(|| ingest(&settings.input, &settings.ingest))?;
    let duplicates = warn_duplicate_ids(&table);
    info!(
        patients = table.len(),
        coerced = table.coerced_total(),
        duplicates,
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let score_start = Instant::now();
    let (scored, summaries) = info_span!("score").in_scope(|| {
        let scored = score(&table);
        let summaries = group_summaries(scored.rows());
        (scored, summaries)
    });
    let distribution = scored.distribution();
    info!(
        patients = scored.len(),
        good = distribution.good,
        partial = distribution.partial,
        poor = distribution.poor,
        undefined = distribution.undefined,
        duration_ms = score_start.elapsed().as_millis(),
        "scoring complete"
    );
    let undefined = ClinicalDomain::ALL
        .into_iter()
        .map(|domain| (domain, scored.undefined_count(domain)))
        .collect();

    let outputs = if settings.dry_run {
        info!("dry run, no files written");
        Vec::new()
    } else {
        let export_start = Instant::now();
        let outputs = info_span!("export", output_dir = %settings.output_dir.display())
            .in_scope(|| export(settings, scored.rows(), &summaries))?;
        info!(
            files = outputs.len(),
            duration_ms = export_start.elapsed().as_millis(),
            "export complete"
        );
        outputs
    };

    info!(duration_ms = run_start.elapsed().as_millis(), "run complete");
    Ok(RunResult {
        input,
        output_dir: settings.output_dir.clone(),
        rows: scored.into_rows(),
        distribution,
        undefined,
        summaries,
        coerced: table.coerced,
        outputs,
        dry_run: settings.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_reads_stdin() {
        assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
        assert_eq!(InputSource::Stdin.label(), "<stdin>");
        assert_eq!(InputSource::Stdin.default_output_dir(), PathBuf::from("output"));
    }

    #[test]
    fn output_defaults_next_to_input() {
        let source = InputSource::from_arg(Path::new("data/patients.csv"));
        assert_eq!(source.default_output_dir(), PathBuf::from("data/output"));
    }
}
