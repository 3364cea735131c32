//! CLI argument definitions for `bars`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bars",
    version,
    about = "Biologic asthma response scoring",
    long_about = "Score the response of asthma patients to biologic therapy.\n\n\
                  Reads a CSV or TSV patient table, grades oral corticosteroid use,\n\
                  asthma control and exacerbations, and writes scored tables,\n\
                  charts and a PDF report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifiers in row-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score a patient table and write exports, charts and the PDF report.
    Score(ScoreArgs),

    /// List the required input columns.
    Columns,

    /// Write an empty input template.
    Template(TemplateArgs),
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// Patient table (CSV or TSV); `-` reads standard input.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (default: `output` next to INPUT).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Tabular export format.
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Field delimiter of the input.
    #[arg(long = "delimiter", value_enum, default_value = "auto")]
    pub delimiter: DelimiterArg,

    /// Patient rows shown in the PDF summary table.
    #[arg(long = "max-report-rows", value_name = "N")]
    pub max_report_rows: Option<usize>,

    /// Skip chart generation (the PDF report is written without charts).
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Skip the PDF report.
    #[arg(long = "no-pdf")]
    pub no_pdf: bool,

    /// Score and summarise without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// TOML config file (default: `bars.toml` in the working directory, if present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TemplateArgs {
    /// Destination file.
    #[arg(long = "output", value_name = "FILE", default_value = "bars_template.csv")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Auto,
    Comma,
    Tab,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
