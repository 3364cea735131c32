//! Row-wise scoring of a whole patient table.

use bars_model::{ClinicalDomain, PatientRecord, ResponseGrade, ScoredRecord, redact};
use tracing::{debug, trace};

use crate::engine::score_record;

/// Options for scoring a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringOptions {
    /// Include patient identifiers in row-level trace logs.
    pub log_data: bool,
}

/// Count of records per overall response category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseDistribution {
    pub good: usize,
    pub partial: usize,
    pub poor: usize,
    pub undefined: usize,
}

impl ResponseDistribution {
    pub fn count(&self, grade: Option<ResponseGrade>) -> usize {
        match grade {
            Some(ResponseGrade::Good) => self.good,
            Some(ResponseGrade::Partial) => self.partial,
            Some(ResponseGrade::Poor) => self.poor,
            None => self.undefined,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.partial + self.poor + self.undefined
    }

    fn record(&mut self, grade: Option<ResponseGrade>) {
        match grade {
            Some(ResponseGrade::Good) => self.good += 1,
            Some(ResponseGrade::Partial) => self.partial += 1,
            Some(ResponseGrade::Poor) => self.poor += 1,
            None => self.undefined += 1,
        }
    }
}

/// Scored rows in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredTable {
    rows: Vec<ScoredRecord>,
}

impl ScoredTable {
    pub fn rows(&self) -> &[ScoredRecord] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ScoredRecord> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredRecord> {
        self.rows.iter()
    }

    pub fn distribution(&self) -> ResponseDistribution {
        let mut distribution = ResponseDistribution::default();
        for row in &self.rows {
            distribution.record(row.response_score);
        }
        distribution
    }

    /// Records whose grade for `domain` is undefined.
    pub fn undefined_count(&self, domain: ClinicalDomain) -> usize {
        self.rows
            .iter()
            .filter(|row| row.grade(domain).is_none())
            .count()
    }
}

impl<'a> IntoIterator for &'a ScoredTable {
    type Item = &'a ScoredRecord;
    type IntoIter = std::slice::Iter<'a, ScoredRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Score every record with identifiers redacted from logs.
pub fn score_table(records: &[PatientRecord]) -> ScoredTable {
    score_table_with(records, ScoringOptions::default())
}

/// Score every record. One output row per input row, in input order.
pub fn score_table_with(records: &[PatientRecord], options: ScoringOptions) -> ScoredTable {
    let rows: Vec<ScoredRecord> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let scored = score_record(record);
            let patient = redact(scored.patient_id(), options.log_data);
            trace!(
                row = index,
                patient,
                response = ?scored.response_score.map(ResponseGrade::as_i64),
                "scored row"
            );
            scored
        })
        .collect();

    let table = ScoredTable { rows };
    debug!(
        rows = table.len(),
        undefined_response = table.distribution().undefined,
        undefined_ocs = table.undefined_count(ClinicalDomain::Ocs),
        undefined_act = table.undefined_count(ClinicalDomain::Act),
        undefined_exacerbation = table.undefined_count(ClinicalDomain::Exacerbation),
        "scored table"
    );
    table
}
