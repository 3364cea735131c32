//! Presentation and export of scored patient tables.
//!
//! - [`charts`]: slope charts of group means, distribution histograms and box plots
//! - [`export`]: scored, long-form and group-mean tables as CSV or JSON
//! - [`long_form`]: one row per patient, domain and timepoint
//! - [`pdf`]: the downloadable PDF report
//!
//! Nothing here scores data; every function takes already scored rows.

pub mod charts;
pub mod export;
pub mod long_form;
pub mod pdf;

pub use charts::{ChartOptions, RenderedChart, render_charts, write_charts};
pub use export::{
    GROUP_MEANS_CSV, LONG_FORM_CSV, RESPONSE_MEAN_COLUMN, RESPONSE_SCORE_COLUMN, SCORED_CSV,
    SCORED_JSON, group_means_frame, long_form_frame, scored_frame, write_csv, write_json,
};
pub use long_form::{LongFormRow, long_form};
pub use pdf::{ReportOptions, SummaryTable, build_report, write_report};

/// File name of the PDF report inside the output directory.
pub const REPORT_PDF: &str = "biologic_report.pdf";
