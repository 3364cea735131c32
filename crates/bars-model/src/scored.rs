use serde::{Deserialize, Serialize};

use crate::domain::ClinicalDomain;
use crate::grade::ResponseGrade;
use crate::patient::PatientRecord;

/// Per-domain grades of one patient. `None` means the domain is undefined
/// because its required inputs are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainGrades {
    #[serde(rename = "ocs_score")]
    pub ocs: Option<ResponseGrade>,
    #[serde(rename = "act_score")]
    pub act: Option<ResponseGrade>,
    #[serde(rename = "exacerbation_score")]
    pub exacerbation: Option<ResponseGrade>,
}

impl DomainGrades {
    pub fn get(&self, domain: ClinicalDomain) -> Option<ResponseGrade> {
        match domain {
            ClinicalDomain::Ocs => self.ocs,
            ClinicalDomain::Act => self.act,
            ClinicalDomain::Exacerbation => self.exacerbation,
        }
    }

    pub fn set(&mut self, domain: ClinicalDomain, grade: Option<ResponseGrade>) {
        match domain {
            ClinicalDomain::Ocs => self.ocs = grade,
            ClinicalDomain::Act => self.act = grade,
            ClinicalDomain::Exacerbation => self.exacerbation = grade,
        }
    }

    /// Defined grades in domain order.
    pub fn defined(&self) -> Vec<ResponseGrade> {
        ClinicalDomain::ALL
            .into_iter()
            .filter_map(|domain| self.get(domain))
            .collect()
    }

    pub fn undefined_count(&self) -> usize {
        ClinicalDomain::ALL.len() - self.defined().len()
    }
}

/// A patient record with its derived scores. Built once by the scoring
/// engine and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: PatientRecord,
    #[serde(flatten)]
    pub grades: DomainGrades,
    /// Mean of the defined domain grades.
    pub response_mean: Option<f64>,
    /// Overall response score.
    pub response_score: Option<ResponseGrade>,
}

impl ScoredRecord {
    pub fn patient_id(&self) -> &str {
        &self.record.patient_id
    }

    pub fn treatment(&self) -> Option<&str> {
        self.record.treatment.as_deref()
    }

    pub fn grade(&self, domain: ClinicalDomain) -> Option<ResponseGrade> {
        self.grades.get(domain)
    }
}
