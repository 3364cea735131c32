use serde::{Deserialize, Serialize};

use crate::domain::{ClinicalDomain, Timepoint};
use crate::measurement::{Measurement, PairedMeasurement};

/// Logged in place of a patient identifier when patient data logging is off.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Returns `value` when `log_data` is set, otherwise [`REDACTED_VALUE`].
pub fn redact(value: &str, log_data: bool) -> &str {
    if log_data { value } else { REDACTED_VALUE }
}

/// One row of input: a patient with paired baseline/follow-up observations.
///
/// The identifier is opaque and not required to be unique. An empty treatment
/// cell is stored as `None` and excluded from group means.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    pub treatment: Option<String>,
    pub ocs: PairedMeasurement,
    pub act: PairedMeasurement,
    pub exacerbation: PairedMeasurement,
}

impl PatientRecord {
    pub fn new(patient_id: impl Into<String>, treatment: Option<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            treatment: treatment.filter(|label| !label.trim().is_empty()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain: ClinicalDomain, pair: PairedMeasurement) -> Self {
        *self.domain_mut(domain) = pair;
        self
    }

    pub fn domain(&self, domain: ClinicalDomain) -> PairedMeasurement {
        match domain {
            ClinicalDomain::Ocs => self.ocs,
            ClinicalDomain::Act => self.act,
            ClinicalDomain::Exacerbation => self.exacerbation,
        }
    }

    pub fn domain_mut(&mut self, domain: ClinicalDomain) -> &mut PairedMeasurement {
        match domain {
            ClinicalDomain::Ocs => &mut self.ocs,
            ClinicalDomain::Act => &mut self.act,
            ClinicalDomain::Exacerbation => &mut self.exacerbation,
        }
    }

    pub fn measurement(&self, domain: ClinicalDomain, timepoint: Timepoint) -> Measurement {
        let pair = self.domain(domain);
        match timepoint {
            Timepoint::Baseline => pair.baseline,
            Timepoint::FollowUp => pair.follow_up,
        }
    }

    /// Number of missing numeric observations (0 to 6).
    pub fn missing_count(&self) -> usize {
        ClinicalDomain::ALL
            .into_iter()
            .flat_map(|domain| Timepoint::ALL.map(|timepoint| self.measurement(domain, timepoint)))
            .filter(|measurement| measurement.is_missing())
            .count()
    }
}
