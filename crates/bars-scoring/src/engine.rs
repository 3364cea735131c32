//! Record-level scoring: domain grades and the aggregate response score.

use bars_model::{ClinicalDomain, DomainGrades, PatientRecord, ResponseGrade, ScoredRecord};

use crate::domains::evaluate_domain;
use crate::rules::{DecisionTable, Rule};

/// Mean grade at or above which the overall response is good.
pub const GOOD_MEAN: f64 = 1.5;
/// Mean grade below which the overall response is poor.
pub const POOR_MEAN: f64 = 0.5;

fn mean_at_least_good(mean: &f64) -> bool {
    *mean >= GOOD_MEAN
}

fn mean_below_poor(mean: &f64) -> bool {
    *mean < POOR_MEAN
}

fn mean_between(mean: &f64) -> bool {
    mean.is_finite()
}

/// Maps the mean of the defined domain grades to the overall grade.
pub const AGGREGATE_TABLE: DecisionTable<f64> = DecisionTable {
    name: "aggregate",
    rules: &[
        Rule {
            name: "mean_at_least_1_5",
            applies: mean_at_least_good,
            grade: ResponseGrade::Good,
        },
        Rule {
            name: "mean_below_0_5",
            applies: mean_below_poor,
            grade: ResponseGrade::Poor,
        },
        Rule {
            name: "mean_0_5_to_1_5",
            applies: mean_between,
            grade: ResponseGrade::Partial,
        },
    ],
    fallback: None,
    fallback_name: "undefined",
};

/// Mean of the defined grades and the aggregate response score.
///
/// Undefined domains are excluded from the mean. With no defined domain both
/// values are `None`.
pub fn aggregate(grades: &DomainGrades) -> (Option<f64>, Option<ResponseGrade>) {
    let defined = grades.defined();
    if defined.is_empty() {
        return (None, None);
    }
    let total: f64 = defined.iter().map(|grade| grade.as_f64()).sum();
    let mean = total / defined.len() as f64;
    (Some(mean), AGGREGATE_TABLE.evaluate(&mean).grade)
}

/// Score one patient record.
pub fn score_record(record: &PatientRecord) -> ScoredRecord {
    let mut grades = DomainGrades::default();
    for domain in ClinicalDomain::ALL {
        let verdict = evaluate_domain(domain, record.domain(domain));
        tracing::trace!(
            domain = domain.prefix(),
            rule = verdict.rule,
            grade = ?verdict.grade.map(ResponseGrade::as_i64),
            "domain rule fired"
        );
        grades.set(domain, verdict.grade);
    }
    let (response_mean, response_score) = aggregate(&grades);
    ScoredRecord {
        record: record.clone(),
        grades,
        response_mean,
        response_score,
    }
}
