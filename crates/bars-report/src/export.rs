//! Tabular exports of scored data.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use bars_model::{
    ClinicalDomain, GroupSummary, PATIENT_ID_COLUMN, ScoredRecord, TREATMENT_COLUMN, Timepoint,
};

use crate::long_form::long_form;

pub const RESPONSE_MEAN_COLUMN: &str = "Response_mean";
pub const RESPONSE_SCORE_COLUMN: &str = "Response_score";

pub const SCORED_CSV: &str = "scored.csv";
pub const SCORED_JSON: &str = "scored.json";
pub const LONG_FORM_CSV: &str = "long_form.csv";
pub const GROUP_MEANS_CSV: &str = "group_means.csv";

/// Input columns followed by the domain scores, response mean and response
/// score. Missing values are nulls.
pub fn scored_frame(rows: &[ScoredRecord]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = vec![
        Series::new(
            PATIENT_ID_COLUMN.into(),
            rows.iter().map(ScoredRecord::patient_id).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            TREATMENT_COLUMN.into(),
            rows.iter().map(ScoredRecord::treatment).collect::<Vec<_>>(),
        )
        .into(),
    ];
    for domain in ClinicalDomain::ALL {
        for timepoint in Timepoint::ALL {
            let values: Vec<Option<f64>> = rows
                .iter()
                .map(|row| row.record.measurement(domain, timepoint).value())
                .collect();
            columns.push(Series::new(domain.column(timepoint).into(), values).into());
        }
    }
    for domain in ClinicalDomain::ALL {
        let grades: Vec<Option<i64>> = rows
            .iter()
            .map(|row| row.grade(domain).map(i64::from))
            .collect();
        columns.push(Series::new(domain.score_column().into(), grades).into());
    }
    let means: Vec<Option<f64>> = rows.iter().map(|row| row.response_mean).collect();
    columns.push(Series::new(RESPONSE_MEAN_COLUMN.into(), means).into());
    let scores: Vec<Option<i64>> = rows
        .iter()
        .map(|row| row.response_score.map(i64::from))
        .collect();
    columns.push(Series::new(RESPONSE_SCORE_COLUMN.into(), scores).into());
    DataFrame::new(columns)
}

pub fn long_form_frame(rows: &[ScoredRecord]) -> PolarsResult<DataFrame> {
    let long = long_form(rows);
    DataFrame::new(vec![
        Series::new(
            PATIENT_ID_COLUMN.into(),
            long.iter().map(|row| row.patient_id.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "Variable".into(),
            long.iter().map(|row| row.variable).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "Type".into(),
            long.iter().map(|row| row.domain.prefix()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "Time".into(),
            long.iter().map(|row| row.timepoint.suffix()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "Value".into(),
            long.iter().map(|row| row.value.value()).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

/// One row per domain and treatment group, in summary order.
pub fn group_means_frame(summaries: &[GroupSummary]) -> PolarsResult<DataFrame> {
    let groups: Vec<(ClinicalDomain, &bars_model::GroupMeans)> = summaries
        .iter()
        .flat_map(|summary| summary.groups.iter().map(move |group| (summary.domain, group)))
        .collect();
    DataFrame::new(vec![
        Series::new(
            "Domain".into(),
            groups.iter().map(|(domain, _)| domain.prefix()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            TREATMENT_COLUMN.into(),
            groups.iter().map(|(_, group)| group.treatment.as_str()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "mean_before".into(),
            groups.iter().map(|(_, group)| group.mean_before).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "mean_after".into(),
            groups.iter().map(|(_, group)| group.mean_after).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "patients".into(),
            groups.iter().map(|(_, group)| group.patients as u64).collect::<Vec<_>>(),
        )
        .into(),
    ])
}

/// Writes a frame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Writes scored rows as a pretty-printed JSON array.
pub fn write_json(rows: &[ScoredRecord], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
