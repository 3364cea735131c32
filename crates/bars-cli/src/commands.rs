use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use bars_cli::config::{BarsConfig, OutputFormat, load_config};
use bars_cli::pipeline::{InputSource, RunResult, RunSettings, run};
use bars_ingest::{Delimiter, IngestOptions, template_frame};
use bars_model::{REQUIRED_COLUMNS, column_description};
use bars_report::{ReportOptions, write_csv};

use crate::cli::{DelimiterArg, OutputFormatArg, ScoreArgs, TemplateArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_columns() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Description")]);
    apply_table_style(&mut table);
    for column in REQUIRED_COLUMNS {
        table.add_row(vec![column, column_description(column).unwrap_or_default()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_template(args: &TemplateArgs) -> Result<()> {
    let mut frame = template_frame().context("build template")?;
    write_csv(&mut frame, &args.output)?;
    info!(path = %args.output.display(), "wrote template");
    println!("Template: {}", args.output.display());
    Ok(())
}

pub fn run_score(args: &ScoreArgs) -> Result<RunResult> {
    let config = load_config(args.config.as_deref())?;
    let settings = resolve_settings(args, &config);
    run(&settings)
}

/// Merges defaults, the config file and flags; flags win.
fn resolve_settings(args: &ScoreArgs, config: &BarsConfig) -> RunSettings {
    let input = InputSource::from_arg(&args.input);
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.directory.clone())
        .unwrap_or_else(|| input.default_output_dir());
    let format = args.format.map_or(config.output.format, |format| match format {
        OutputFormatArg::Csv => OutputFormat::Csv,
        OutputFormatArg::Json => OutputFormat::Json,
        OutputFormatArg::Both => OutputFormat::Both,
    });
    let delimiter = match args.delimiter {
        DelimiterArg::Auto => Delimiter::Auto,
        DelimiterArg::Comma => Delimiter::Comma,
        DelimiterArg::Tab => Delimiter::Tab,
    };
    let report = (!args.no_pdf).then(|| ReportOptions {
        title: config.report.title.clone(),
        max_rows: args.max_report_rows.unwrap_or(config.report.max_rows),
        feedback_url: config.report.feedback_url.clone(),
        ..ReportOptions::default()
    });
    RunSettings {
        input,
        output_dir,
        format,
        ingest: IngestOptions {
            delimiter,
            ..IngestOptions::default()
        },
        charts: (!args.no_charts).then(|| config.charts.options()),
        report,
        dry_run: args.dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use clap::Parser;

    use crate::cli::{Cli, Command};

    fn score_args(argv: &[&str]) -> ScoreArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Score(args) => args,
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn flags_override_config() {
        let config = BarsConfig::from_toml(
            "[report]\nmax_rows = 10\ntitle = \"Clinic\"\n[output]\nformat = \"json\"\ndirectory = \"cfg\"\n",
        )
        .unwrap();
        let args = score_args(&[
            "bars",
            "score",
            "in.csv",
            "--format",
            "csv",
            "--max-report-rows",
            "5",
            "--output-dir",
            "cli",
        ]);
        let settings = resolve_settings(&args, &config);
        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.output_dir, Path::new("cli"));
        let report = settings.report.unwrap();
        assert_eq!(report.max_rows, 5);
        assert_eq!(report.title, "Clinic");
    }

    #[test]
    fn config_fills_unset_flags() {
        let config = BarsConfig::from_toml("[output]\nformat = \"json\"\ndirectory = \"cfg\"\n").unwrap();
        let args = score_args(&["bars", "score", "-", "--no-charts", "--no-pdf", "--delimiter", "tab"]);
        let settings = resolve_settings(&args, &config);
        assert_eq!(settings.input, InputSource::Stdin);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.output_dir, Path::new("cfg"));
        assert_eq!(settings.ingest.delimiter, Delimiter::Tab);
        assert!(settings.charts.is_none());
        assert!(settings.report.is_none());
    }
}
