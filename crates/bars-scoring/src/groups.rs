//! Per-treatment mean baseline and follow-up values.

use std::collections::BTreeMap;

use bars_model::{ClinicalDomain, GroupMeans, GroupSummary, ScoredRecord};

#[derive(Default)]
struct Accumulator {
    before: f64,
    after: f64,
    patients: usize,
}

/// Means for one domain.
///
/// Only records with a treatment label and both values present contribute.
/// Groups without such records are omitted. Groups are sorted ascending by
/// mean baseline, ties broken by label.
pub fn group_summary(rows: &[ScoredRecord], domain: ClinicalDomain) -> GroupSummary {
    let mut sums: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for row in rows {
        let Some(treatment) = row.treatment() else {
            continue;
        };
        let Some((before, after)) = row.record.domain(domain).both() else {
            continue;
        };
        let entry = sums.entry(treatment).or_default();
        entry.before += before;
        entry.after += after;
        entry.patients += 1;
    }

    let mut groups: Vec<GroupMeans> = sums
        .into_iter()
        .map(|(treatment, acc)| GroupMeans {
            treatment: treatment.to_string(),
            mean_before: acc.before / acc.patients as f64,
            mean_after: acc.after / acc.patients as f64,
            patients: acc.patients,
        })
        .collect();
    // Stable sort keeps the label order from the map for equal baselines.
    groups.sort_by(|a, b| a.mean_before.total_cmp(&b.mean_before));

    GroupSummary { domain, groups }
}

/// One summary per domain, in domain order.
pub fn group_summaries(rows: &[ScoredRecord]) -> Vec<GroupSummary> {
    ClinicalDomain::ALL
        .into_iter()
        .map(|domain| group_summary(rows, domain))
        .collect()
}
