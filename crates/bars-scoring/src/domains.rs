//! Domain scoring rules.
//!
//! Oral corticosteroid dose and exacerbations share the reduction table:
//! complete cessation at follow-up wins outright, then the relative reduction
//! against a positive baseline decides, and an increase from a zero baseline
//! scores poor. The Asthma Control Test uses the absolute follow-up score
//! first and the change from baseline second.
//!
//! Thresholds are inclusive exactly as written in the rule names; rule order
//! is part of the algorithm.

use bars_model::{ClinicalDomain, Measurement, PairedMeasurement, ResponseGrade};

use crate::rules::{DecisionTable, Rule, Verdict};

/// Reduction ratio at or above which the response is good.
pub const GOOD_REDUCTION: f64 = 0.75;
/// Reduction ratio below which the response is poor.
pub const POOR_REDUCTION: f64 = 0.5;
/// ACT score at or above which asthma counts as well controlled.
pub const ACT_WELL_CONTROLLED: f64 = 20.0;
/// ACT improvement at or above which the response is good.
pub const ACT_LARGE_IMPROVEMENT: f64 = 6.0;
/// ACT improvement below which the response is poor.
pub const ACT_MINIMAL_IMPROVEMENT: f64 = 3.0;

fn follow_up_is_zero(pair: &PairedMeasurement) -> bool {
    pair.follow_up.is_zero()
}

fn reduction_at_least_good(pair: &PairedMeasurement) -> bool {
    pair.reduction_ratio()
        .is_some_and(|ratio| ratio >= GOOD_REDUCTION)
}

fn reduction_below_poor(pair: &PairedMeasurement) -> bool {
    pair.reduction_ratio()
        .is_some_and(|ratio| ratio < POOR_REDUCTION)
}

fn reduction_defined(pair: &PairedMeasurement) -> bool {
    pair.reduction_ratio().is_some()
}

fn increase_from_zero(pair: &PairedMeasurement) -> bool {
    matches!(pair.baseline, Measurement::Present(baseline) if baseline == 0.0)
        && pair.follow_up.is_present()
}

/// Shared by the oral corticosteroid and exacerbation domains.
pub const REDUCTION_TABLE: DecisionTable<PairedMeasurement> = DecisionTable {
    name: "reduction",
    rules: &[
        Rule {
            name: "follow_up_zero",
            applies: follow_up_is_zero,
            grade: ResponseGrade::Good,
        },
        Rule {
            name: "reduction_at_least_75pct",
            applies: reduction_at_least_good,
            grade: ResponseGrade::Good,
        },
        Rule {
            name: "reduction_below_50pct",
            applies: reduction_below_poor,
            grade: ResponseGrade::Poor,
        },
        Rule {
            name: "reduction_50_to_75pct",
            applies: reduction_defined,
            grade: ResponseGrade::Partial,
        },
        Rule {
            name: "increase_from_zero",
            applies: increase_from_zero,
            grade: ResponseGrade::Poor,
        },
    ],
    fallback: None,
    fallback_name: "undefined",
};

fn follow_up_well_controlled(pair: &PairedMeasurement) -> bool {
    matches!(pair.follow_up, Measurement::Present(score) if score >= ACT_WELL_CONTROLLED)
}

fn large_improvement(pair: &PairedMeasurement) -> bool {
    pair.delta()
        .is_some_and(|delta| delta >= ACT_LARGE_IMPROVEMENT)
}

fn minimal_improvement(pair: &PairedMeasurement) -> bool {
    pair.delta()
        .is_some_and(|delta| delta < ACT_MINIMAL_IMPROVEMENT)
}

fn delta_defined(pair: &PairedMeasurement) -> bool {
    pair.delta().is_some()
}

/// Asthma Control Test rules: a well-controlled follow-up wins, then the
/// size of the improvement.
pub const ACT_TABLE: DecisionTable<PairedMeasurement> = DecisionTable {
    name: "act",
    rules: &[
        Rule {
            name: "follow_up_at_least_20",
            applies: follow_up_well_controlled,
            grade: ResponseGrade::Good,
        },
        Rule {
            name: "improvement_at_least_6",
            applies: large_improvement,
            grade: ResponseGrade::Good,
        },
        Rule {
            name: "improvement_below_3",
            applies: minimal_improvement,
            grade: ResponseGrade::Poor,
        },
        Rule {
            name: "improvement_3_to_6",
            applies: delta_defined,
            grade: ResponseGrade::Partial,
        },
    ],
    fallback: None,
    fallback_name: "undefined",
};

/// Decision table used for a domain.
pub fn table_for(domain: ClinicalDomain) -> &'static DecisionTable<PairedMeasurement> {
    match domain {
        ClinicalDomain::Ocs | ClinicalDomain::Exacerbation => &REDUCTION_TABLE,
        ClinicalDomain::Act => &ACT_TABLE,
    }
}

/// Evaluate a domain and report which rule fired.
pub fn evaluate_domain(domain: ClinicalDomain, pair: PairedMeasurement) -> Verdict {
    table_for(domain).evaluate(&pair)
}

pub fn score_domain(domain: ClinicalDomain, pair: PairedMeasurement) -> Option<ResponseGrade> {
    evaluate_domain(domain, pair).grade
}

/// Oral corticosteroid dose score.
pub fn score_ocs(pair: PairedMeasurement) -> Option<ResponseGrade> {
    score_domain(ClinicalDomain::Ocs, pair)
}

/// Asthma Control Test score.
pub fn score_act(pair: PairedMeasurement) -> Option<ResponseGrade> {
    score_domain(ClinicalDomain::Act, pair)
}

/// Annual exacerbation count score.
pub fn score_exacerbation(pair: PairedMeasurement) -> Option<ResponseGrade> {
    score_domain(ClinicalDomain::Exacerbation, pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: Measurement = Measurement::Missing;

    fn pair(baseline: impl Into<Measurement>, follow_up: impl Into<Measurement>) -> PairedMeasurement {
        PairedMeasurement::new(baseline, follow_up)
    }

    #[test]
    fn steroid_examples() {
        assert_eq!(score_ocs(pair(20.0, 0.0)), Some(ResponseGrade::Good));
        assert_eq!(score_ocs(pair(20.0, 12.0)), Some(ResponseGrade::Poor));
        assert_eq!(score_ocs(pair(20.0, 4.0)), Some(ResponseGrade::Good));
        assert_eq!(score_ocs(pair(20.0, 8.0)), Some(ResponseGrade::Partial));
    }

    #[test]
    fn reduction_boundaries_are_inclusive_as_stated() {
        // ratio exactly 0.75
        assert_eq!(score_ocs(pair(20.0, 5.0)), Some(ResponseGrade::Good));
        // ratio exactly 0.5
        assert_eq!(score_ocs(pair(20.0, 10.0)), Some(ResponseGrade::Partial));
        // dose increase gives a negative ratio
        assert_eq!(score_ocs(pair(10.0, 15.0)), Some(ResponseGrade::Poor));
    }

    #[test]
    fn cessation_wins_regardless_of_baseline() {
        assert_eq!(score_ocs(pair(0.0, 0.0)), Some(ResponseGrade::Good));
        assert_eq!(score_ocs(pair(MISSING, 0.0)), Some(ResponseGrade::Good));
        let verdict = evaluate_domain(ClinicalDomain::Ocs, pair(0.0, 0.0));
        assert_eq!(verdict.rule, "follow_up_zero");
    }

    #[test]
    fn increase_from_zero_is_poor() {
        assert_eq!(score_exacerbation(pair(0.0, 2.0)), Some(ResponseGrade::Poor));
        let verdict = evaluate_domain(ClinicalDomain::Exacerbation, pair(0.0, 2.0));
        assert_eq!(verdict.rule, "increase_from_zero");
    }

    #[test]
    fn missing_inputs_are_undefined() {
        assert_eq!(score_ocs(pair(MISSING, 5.0)), None);
        assert_eq!(score_ocs(pair(20.0, MISSING)), None);
        assert_eq!(score_ocs(pair(MISSING, MISSING)), None);
        assert_eq!(score_ocs(pair(-5.0, 2.0)), None);
    }

    #[test]
    fn act_absolute_check_precedes_delta() {
        let verdict = evaluate_domain(ClinicalDomain::Act, pair(14.0, 21.0));
        assert_eq!(verdict.grade, Some(ResponseGrade::Good));
        assert_eq!(verdict.rule, "follow_up_at_least_20");
        // delta of 1 would be poor, but follow-up of 20 wins
        assert_eq!(score_act(pair(19.0, 20.0)), Some(ResponseGrade::Good));
        assert_eq!(score_act(pair(MISSING, 22.0)), Some(ResponseGrade::Good));
    }

    #[test]
    fn act_delta_bands() {
        assert_eq!(score_act(pair(8.0, 14.0)), Some(ResponseGrade::Good));
        assert_eq!(score_act(pair(10.0, 13.0)), Some(ResponseGrade::Partial));
        assert_eq!(score_act(pair(10.0, 15.9)), Some(ResponseGrade::Partial));
        assert_eq!(score_act(pair(10.0, 12.0)), Some(ResponseGrade::Poor));
        assert_eq!(score_act(pair(15.0, 10.0)), Some(ResponseGrade::Poor));
        assert_eq!(score_act(pair(MISSING, 15.0)), None);
        assert_eq!(score_act(pair(15.0, MISSING)), None);
    }

    #[test]
    fn exacerbation_uses_reduction_table() {
        assert_eq!(score_exacerbation(pair(4.0, 1.0)), Some(ResponseGrade::Good));
        assert_eq!(score_exacerbation(pair(4.0, 2.0)), Some(ResponseGrade::Partial));
        assert_eq!(score_exacerbation(pair(4.0, 3.0)), Some(ResponseGrade::Poor));
    }
}
