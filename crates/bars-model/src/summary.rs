use serde::{Deserialize, Serialize};

use crate::domain::ClinicalDomain;

/// Mean baseline and follow-up values of one treatment group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeans {
    pub treatment: String,
    pub mean_before: f64,
    pub mean_after: f64,
    /// Number of records that contributed to the means.
    pub patients: usize,
}

impl GroupMeans {
    pub fn delta(&self) -> f64 {
        self.mean_after - self.mean_before
    }
}

/// Per-treatment means for one domain, sorted ascending by `mean_before`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub domain: ClinicalDomain,
    pub groups: Vec<GroupMeans>,
}

impl GroupSummary {
    pub fn get(&self, treatment: &str) -> Option<&GroupMeans> {
        self.groups.iter().find(|group| group.treatment == treatment)
    }

    /// `(mean_before, mean_after)` for a treatment label.
    pub fn means(&self, treatment: &str) -> Option<(f64, f64)> {
        self.get(treatment)
            .map(|group| (group.mean_before, group.mean_after))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.treatment.as_str())
    }
}
