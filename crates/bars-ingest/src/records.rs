//! Conversion of a validated DataFrame into patient records.

use std::collections::BTreeMap;

use polars::prelude::*;

use bars_model::{ClinicalDomain, PATIENT_ID_COLUMN, PatientRecord, TREATMENT_COLUMN, Timepoint};

use crate::coerce::coerce_measurement;
use crate::error::{IngestError, Result};
use crate::input::missing_columns;

/// Patient records extracted from a table, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientTable {
    pub records: Vec<PatientRecord>,
    /// Non-empty numeric cells that could not be parsed, per column.
    pub coerced: BTreeMap<String, usize>,
}

impl PatientTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of cells that fell back to missing.
    pub fn coerced_total(&self) -> usize {
        self.coerced.values().sum()
    }
}

/// Reads a column as trimmed text; nulls become empty strings.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .iter()
        .map(|value| value.map(str::trim).unwrap_or_default().to_string())
        .collect())
}

/// Builds patient records from a frame holding the required columns.
///
/// Numeric cells are coerced with [`coerce_measurement`]; extra columns are
/// ignored. Rows whose required cells are all empty are skipped.
pub fn records_from_frame(df: &DataFrame) -> Result<PatientTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { missing });
    }

    let ids = text_column(df, PATIENT_ID_COLUMN)?;
    let treatments = text_column(df, TREATMENT_COLUMN)?;
    let mut measurements = Vec::with_capacity(6);
    for domain in ClinicalDomain::ALL {
        for timepoint in Timepoint::ALL {
            let name = domain.column(timepoint);
            measurements.push((domain, timepoint, name, text_column(df, name)?));
        }
    }

    // Blank lines come through as rows of empty cells.
    let keep: Vec<bool> = (0..ids.len())
        .map(|row| {
            !ids[row].is_empty()
                || !treatments[row].is_empty()
                || measurements
                    .iter()
                    .any(|(.., cells)| cells.get(row).is_some_and(|cell| !cell.is_empty()))
        })
        .collect();
    let blank = keep.iter().filter(|kept| !**kept).count();
    if blank > 0 {
        tracing::debug!(rows = blank, "skipped blank rows");
    }

    let mut records: Vec<PatientRecord> = ids
        .into_iter()
        .zip(treatments)
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .map(|((id, treatment), _)| PatientRecord::new(id, Some(treatment)))
        .collect();

    let mut coerced = BTreeMap::new();
    for (domain, timepoint, name, cells) in measurements {
        let kept_cells = cells.iter().zip(&keep).filter(|(_, kept)| **kept);
        let mut failed = 0usize;
        for (record, (cell, _)) in records.iter_mut().zip(kept_cells) {
            let value = coerce_measurement(cell);
            if value.is_missing() && !cell.is_empty() {
                failed += 1;
            }
            let pair = record.domain_mut(domain);
            match timepoint {
                Timepoint::Baseline => pair.baseline = value,
                Timepoint::FollowUp => pair.follow_up = value,
            }
        }
        if failed > 0 {
            tracing::debug!(column = name, cells = failed, "non-numeric cells treated as missing");
            coerced.insert(name.to_string(), failed);
        }
    }

    Ok(PatientTable { records, coerced })
}

/// An empty frame with the required columns, for use as an input template.
pub fn template_frame() -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = bars_model::REQUIRED_COLUMNS
        .iter()
        .map(|name| Series::new((*name).into(), Vec::<String>::new()).into())
        .collect();
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bars_model::Measurement;

    fn frame(rows: &[[&str; 8]]) -> DataFrame {
        let columns: Vec<Column> = bars_model::REQUIRED_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<&str> = rows.iter().map(|row| row[idx]).collect();
                Series::new((*name).into(), values).into()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_records_from_frame() {
        // Patient ID, OCS_BL, ACT_BL, Exacerbation_BL, Treatment, OCS_FU, ACT_FU, Exacerbation_FU
        let df = frame(&[
            ["P1", "20", "14", "4", "Dupilumab", "0", "21", "1"],
            ["P2", "abc", "", "2", " ", "5", "18", "x"],
        ]);
        let table = records_from_frame(&df).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records[0];
        assert_eq!(first.patient_id, "P1");
        assert_eq!(first.treatment.as_deref(), Some("Dupilumab"));
        assert_eq!(first.ocs.baseline, Measurement::Present(20.0));
        assert_eq!(first.act.follow_up, Measurement::Present(21.0));

        let second = &table.records[1];
        assert_eq!(second.treatment, None);
        assert_eq!(second.ocs.baseline, Measurement::Missing);
        assert_eq!(second.act.baseline, Measurement::Missing);
        assert_eq!(second.exacerbation.follow_up, Measurement::Missing);

        // empty cells are not counted as coercion failures
        assert_eq!(table.coerced.get("OCS_BL"), Some(&1));
        assert_eq!(table.coerced.get("ACT_BL"), None);
        assert_eq!(table.coerced_total(), 2);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let df = frame(&[
            ["P1", "20", "14", "4", "A", "0", "21", "1"],
            ["", "", "", " ", "", "", "", ""],
            ["P2", "x", "", "", "B", "", "", ""],
        ]);
        let table = records_from_frame(&df).unwrap();
        let ids: Vec<&str> = table.records.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
        assert_eq!(table.records[1].ocs.baseline, Measurement::Missing);
        assert_eq!(table.coerced.get("OCS_BL"), Some(&1));
    }

    #[test]
    fn test_records_from_frame_missing_columns() {
        let df = DataFrame::new(vec![Series::new("Patient ID".into(), vec!["P1"]).into()]).unwrap();
        let err = records_from_frame(&df).unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => assert_eq!(missing.len(), 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_template_frame() {
        let df = template_frame().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 8);
        assert_eq!(df.get_column_names()[0].as_str(), "Patient ID");
    }
}
