//! Long-form reshaping of scored rows: one row per patient, domain and
//! timepoint.

use bars_model::{ClinicalDomain, Measurement, ScoredRecord, Timepoint};

#[derive(Debug, Clone, PartialEq)]
pub struct LongFormRow {
    pub patient_id: String,
    /// Source column name, e.g. `OCS_BL`.
    pub variable: &'static str,
    pub domain: ClinicalDomain,
    pub timepoint: Timepoint,
    pub value: Measurement,
}

/// Variable-major order: every `OCS_BL` row, then `OCS_FU`, then `ACT_BL`
/// and so on; patients keep their input order within each variable.
pub fn long_form(rows: &[ScoredRecord]) -> Vec<LongFormRow> {
    let mut out = Vec::with_capacity(rows.len() * 6);
    for domain in ClinicalDomain::ALL {
        for timepoint in Timepoint::ALL {
            out.extend(rows.iter().map(|row| LongFormRow {
                patient_id: row.patient_id().to_string(),
                variable: domain.column(timepoint),
                domain,
                timepoint,
                value: row.record.measurement(domain, timepoint),
            }));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bars_model::{PairedMeasurement, PatientRecord};
    use bars_scoring::score_record;

    #[test]
    fn six_rows_per_patient_in_variable_order() {
        let rows: Vec<ScoredRecord> = ["P1", "P2"]
            .into_iter()
            .map(|id| {
                score_record(
                    &PatientRecord::new(id, None)
                        .with_domain(ClinicalDomain::Ocs, PairedMeasurement::new(20.0, 5.0)),
                )
            })
            .collect();
        let long = long_form(&rows);
        assert_eq!(long.len(), 12);
        let order: Vec<(&str, &str)> = long
            .iter()
            .take(4)
            .map(|row| (row.variable, row.patient_id.as_str()))
            .collect();
        assert_eq!(order, vec![("OCS_BL", "P1"), ("OCS_BL", "P2"), ("OCS_FU", "P1"), ("OCS_FU", "P2")]);
        assert_eq!(long[2].value, Measurement::Present(5.0));
        assert!(long[4].value.is_missing());
        assert_eq!(long[11].variable, "Exacerbation_FU");
    }
}
